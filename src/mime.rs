/// Content type served when extension lookup fails
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for a file extension (with or without the leading dot)
pub fn content_type_for(ext: &str) -> String {
    let trimmed = ext.trim_start_matches('.');
    mime_guess::from_ext(trimmed)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extension() {
        assert_eq!(content_type_for(".png"), "image/png");
        assert_eq!(content_type_for("png"), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for(".zzzz"), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(""), FALLBACK_CONTENT_TYPE);
    }
}
