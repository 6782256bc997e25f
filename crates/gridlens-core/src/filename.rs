//! Filename sanitization and extension derivation
//!
//! Pure helpers; the object storage key is always built from the
//! generated record id plus the extension produced here.

/// Characters invalid in file system names, in addition to ASCII
/// control characters.
const INVALID_FILENAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Strip every invalid-filename character from a client-declared name.
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() && !INVALID_FILENAME_CHARS.contains(c))
        .collect()
}

/// Extension of a name as the substring from the last `.` to the end,
/// separator included. Empty when no `.` is present.
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(index) => name[index..].to_string(),
        None => String::new(),
    }
}

/// Extension derived from the sanitized client-declared filename.
/// Extensions are never invented: a name without a dot yields `""`.
pub fn sanitized_extension(raw: &str) -> String {
    file_extension(&sanitize_filename(raw))
}

/// File name stem (sanitized name without its extension). Used when the
/// filename policy honors client-supplied names.
pub fn sanitized_stem(raw: &str) -> String {
    let sanitized = sanitize_filename(raw);
    match sanitized.rfind('.') {
        Some(index) => sanitized[..index].to_string(),
        None => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(sanitize_filename("bad:name*.jpg"), "badname.jpg");
        assert_eq!(sanitize_filename("a<b>c|d"), "abcd");
        assert_eq!(sanitize_filename("..\\evil/path.png"), "..evilpath.png");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_filename("pic\u{0}ture\n.jpg"), "picture.jpg");
    }

    #[test]
    fn extension_includes_separator() {
        assert_eq!(sanitized_extension("bad:name*.jpg"), ".jpg");
        assert_eq!(sanitized_extension("photo.JPEG"), ".JPEG");
        assert_eq!(sanitized_extension("archive.tar.gz"), ".gz");
    }

    #[test]
    fn extension_empty_without_dot() {
        assert_eq!(sanitized_extension("noextension"), "");
        assert_eq!(sanitized_extension(""), "");
    }

    #[test]
    fn stem_drops_extension() {
        assert_eq!(sanitized_stem("bad:name*.jpg"), "badname");
        assert_eq!(sanitized_stem("noextension"), "noextension");
        assert_eq!(sanitized_stem(""), "");
    }
}
