//! HTTP date handling for `Last-Modified` / `If-Modified-Since`

use chrono::{DateTime, TimeZone, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header; `None` for anything unparseable
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    Some(parsed.with_timezone(&Utc))
}

/// Whether a file last modified at `mtime` is unchanged relative to the
/// client's `If-Modified-Since` value. Sub-second precision is discarded.
pub fn not_modified_since(mtime: SystemTime, if_modified_since: &str) -> bool {
    let Some(since) = parse_http_date(if_modified_since) else {
        return false;
    };
    let modified: DateTime<Utc> = mtime.into();
    let Some(modified) = Utc.timestamp_opt(modified.timestamp(), 0).single() else {
        return false;
    };
    modified <= since
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_format_http_date() {
        let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(format_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let dt = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(dt.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified_since() {
        let mtime = UNIX_EPOCH + Duration::from_millis(784_111_777_500);
        assert!(not_modified_since(mtime, "Sun, 06 Nov 1994 08:49:37 GMT"));
        assert!(not_modified_since(mtime, "Mon, 07 Nov 1994 00:00:00 GMT"));
        assert!(!not_modified_since(mtime, "Sun, 06 Nov 1994 08:49:36 GMT"));
        assert!(!not_modified_since(mtime, "garbage"));
    }
}
