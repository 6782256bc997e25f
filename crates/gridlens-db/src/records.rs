use async_trait::async_trait;
use gridlens_core::models::ImageRecord;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

/// Record store operation errors
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record store backend error: {0}")]
    Backend(String),
}

/// Metadata-record persistence seam for the upload pipeline.
///
/// The pipeline treats the write as best-effort; implementations report
/// failures normally and the caller decides what to suppress.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the metadata record for a freshly stored image.
    async fn create(&self, record: &ImageRecord) -> Result<(), RecordStoreError>;
}

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS image_records (
    id UUID PRIMARY KEY,
    media_url TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    exif_capture_date TEXT,
    exif_capture_time TEXT,
    exif_lat_gps DOUBLE PRECISION,
    exif_long_gps DOUBLE PRECISION,
    ocr_text TEXT,
    has_high_voltage_sign BOOLEAN,
    has_live_electrical_sign BOOLEAN,
    has_live_wires_sign BOOLEAN,
    tags TEXT,
    dominant_colours TEXT,
    accent_colour TEXT,
    is_on_fire BOOLEAN,
    contains_transformer BOOLEAN,
    contains_pole BOOLEAN
)
"#;

/// Postgres-backed record store
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool sized from configuration.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RecordStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the records table if absent. Idempotent; run at startup.
    pub async fn ensure_schema(&self) -> Result<(), RecordStoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        tracing::debug!(table = "image_records", "Record schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(
        skip(self, record),
        fields(
            db.table = "image_records",
            db.operation = "insert",
            record_id = %record.id
        )
    )]
    async fn create(&self, record: &ImageRecord) -> Result<(), RecordStoreError> {
        sqlx::query(
            r#"
            INSERT INTO image_records (
                id, media_url, created_at,
                exif_capture_date, exif_capture_time, exif_lat_gps, exif_long_gps,
                ocr_text, has_high_voltage_sign, has_live_electrical_sign,
                has_live_wires_sign, tags, dominant_colours, accent_colour,
                is_on_fire, contains_transformer, contains_pole
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(record.id)
        .bind(&record.media_url)
        .bind(record.created_at)
        .bind(&record.exif_capture_date)
        .bind(&record.exif_capture_time)
        .bind(record.exif_lat_gps)
        .bind(record.exif_long_gps)
        .bind(&record.ocr_text)
        .bind(record.has_high_voltage_sign)
        .bind(record.has_live_electrical_sign)
        .bind(record.has_live_wires_sign)
        .bind(&record.tags)
        .bind(&record.dominant_colours)
        .bind(&record.accent_colour)
        .bind(record.is_on_fire)
        .bind(record.contains_transformer)
        .bind(record.contains_pole)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
