//! Request path translation
//!
//! Maps a URI path onto the filesystem below the served root. The result is
//! always inside the root: `..` never climbs above it and segments that
//! would be interpreted as absolute paths or drive prefixes are discarded.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Percent-decode a URI path, falling back to the raw text when the decoded
/// bytes are not UTF-8.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Translate a request path into a filesystem path below `root`
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = decode_path(request_path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_segment(s) => segments.push(s),
            _ => {}
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}

/// A segment is usable only if it is one normal path component
fn is_plain_segment(segment: &str) -> bool {
    if segment.contains(['\\', '\0']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
