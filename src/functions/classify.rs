//! Image request classification.
//!
//! # Design Decisions
//! - Suffix match on the full path, case-sensitive (`.PNG` is not an image)
//! - Equivalent to `^.*(\.png|\.jpg)$`; since `.` never matches a line
//!   terminator, paths containing one are not images either
//! - No regex: a suffix check plus a terminator scan is O(n)

use crate::functions::event::FieldMap;

/// Extensions that mark a request as an image request.
pub const IMAGE_EXTENSIONS: [&str; 2] = [".png", ".jpg"];

/// Query string parameter carrying the content hash.
pub const HASH_PARAM: &str = "h";

/// Returns true if `uri` names a `.png` or `.jpg` asset.
pub fn is_image_request(uri: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| uri.ends_with(ext))
        && !uri.chars().any(is_line_terminator)
}

/// Returns true if the hash parameter is present, whatever its value.
pub fn has_hash(querystring: &FieldMap) -> bool {
    querystring.contains_key(HASH_PARAM)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::event::FieldValue;

    #[test]
    fn test_image_extensions() {
        assert!(is_image_request("/a/b/photo.png"));
        assert!(is_image_request("/photo.jpg"));
        assert!(is_image_request(".png"));

        assert!(!is_image_request("/index.html"));
        assert!(!is_image_request("/photo.jpeg"));
        assert!(!is_image_request("/photo.gif"));
        assert!(!is_image_request("/photo.png/"));
        assert!(!is_image_request("/photopng"));
        assert!(!is_image_request(""));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_image_request("/logo.PNG"));
        assert!(!is_image_request("/logo.Jpg"));
    }

    #[test]
    fn test_line_terminators_never_match() {
        assert!(!is_image_request("/a\n/photo.png"));
        assert!(!is_image_request("/a\r.png"));
        assert!(!is_image_request("/a\u{2028}.jpg"));
        assert!(is_image_request("/a\t.jpg"));
    }

    #[test]
    fn test_has_hash() {
        let mut qs = FieldMap::new();
        assert!(!has_hash(&qs));

        qs.insert("hash".into(), FieldValue::new("x"));
        assert!(!has_hash(&qs));

        qs.insert("h".into(), FieldValue::new(""));
        assert!(has_hash(&qs)); // Empty value still counts
    }
}
