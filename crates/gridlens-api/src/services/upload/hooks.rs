use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use uuid::Uuid;

/// Observable result of a best-effort post-commit hook. Callers may log
/// or meter it, but it never changes the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Run a best-effort secondary effect after the upload committed.
///
/// The attempt is bounded: a hook that neither completes nor fails
/// within `bound` is abandoned so it cannot hold the client response.
/// Failures and timeouts are logged with the record id for external
/// reconciliation; nothing retries.
pub async fn post_commit<F, E>(
    hook: &'static str,
    record_id: Uuid,
    bound: Duration,
    attempt: F,
) -> HookOutcome
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(bound, attempt).await {
        Ok(Ok(())) => {
            tracing::debug!(hook, record_id = %record_id, "Post-commit hook completed");
            HookOutcome::Completed
        }
        Ok(Err(e)) => {
            tracing::warn!(
                hook,
                record_id = %record_id,
                error = %e,
                "Post-commit hook failed; upload response unaffected"
            );
            HookOutcome::Failed
        }
        Err(_) => {
            tracing::warn!(
                hook,
                record_id = %record_id,
                bound_ms = bound.as_millis() as u64,
                "Post-commit hook timed out; upload response unaffected"
            );
            HookOutcome::TimedOut
        }
    }
}
