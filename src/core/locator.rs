//! Resolve platform file locators to filesystem paths
//!
//! The OS hands files to us in a few shapes: plain paths from the open
//! dialog and drag-and-drop, and `file://` URLs when a file is opened with
//! the app. Anything that does not map to an absolute local path is
//! rejected.

use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";

/// Resolve a locator to an absolute filesystem path
pub fn resolve_locator(locator: &str) -> Option<PathBuf> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }

    let raw = if let Some(rest) = strip_prefix_ignore_case(locator, FILE_SCHEME) {
        // file://localhost/path and file:///path are both local
        let rest = strip_prefix_ignore_case(rest, "localhost").unwrap_or(rest);
        percent_decode(rest)?
    } else if locator.contains("://") {
        log::debug!("Unsupported locator scheme: {}", locator);
        return None;
    } else {
        locator.to_string()
    };

    let path = PathBuf::from(raw);
    if path.is_absolute() {
        Some(path)
    } else {
        None
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Decode `%XX` escapes. Returns None on malformed escapes or invalid UTF-8.
fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_plain_absolute_path() {
        assert_eq!(
            resolve_locator("/home/user/song.m4a"),
            Some(PathBuf::from("/home/user/song.m4a"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_with_escapes() {
        assert_eq!(
            resolve_locator("file:///home/user/My%20Song.m4a"),
            Some(PathBuf::from("/home/user/My Song.m4a"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_localhost() {
        assert_eq!(
            resolve_locator("FILE://localhost/tmp/a.m4a"),
            Some(PathBuf::from("/tmp/a.m4a"))
        );
    }

    #[test]
    fn test_rejects_relative_path() {
        assert_eq!(resolve_locator("music/song.m4a"), None);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(resolve_locator("content://media/external/audio/42"), None);
        assert_eq!(resolve_locator("https://example.com/a.mp3"), None);
    }

    #[test]
    fn test_rejects_malformed_escape() {
        assert_eq!(resolve_locator("file:///tmp/bad%2"), None);
        assert_eq!(resolve_locator("file:///tmp/bad%zz"), None);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(resolve_locator("   "), None);
    }
}
