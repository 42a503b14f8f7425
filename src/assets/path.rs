//! Request path normalization

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use super::INDEX_FILE;

/// Percent-decode a request path without normalizing it
///
/// Invalid UTF-8 sequences become U+FFFD.
pub fn decode(request_path: &str) -> Cow<'_, str> {
    percent_decode_str(request_path).decode_utf8_lossy()
}

/// Turn a request path into a bundle key
///
/// Percent-decodes, drops empty and `.` segments and resolves `..` without
/// climbing above the bundle root. Paths naming a directory (empty, or
/// ending in `/`) map to that directory's index file. Returns `None` when
/// the path does not decode to UTF-8.
pub fn normalize(request_path: &str) -> Option<String> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() || decoded.ends_with('/') {
        segments.push(INDEX_FILE);
    }

    Some(segments.join("/"))
}
