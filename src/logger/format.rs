//! Access log format module
//!
//! One line per request in Common Log Format:
//! `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`

use chrono::Local;
use std::net::SocketAddr;

/// Access log entry for a single request/response pair
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: SocketAddr,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    /// Request target as sent, including the query string
    pub target: String,
    pub http_version: &'static str,
    pub status: u16,
    /// Body size, `None` when unknown or the body is empty
    pub body_bytes: Option<u64>,
}

impl AccessLogEntry {
    pub fn new(remote_addr: SocketAddr, method: String, target: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            target,
            http_version: "1.1",
            status: 200,
            body_bytes: None,
        }
    }

    pub fn format_common(&self) -> String {
        let size = match self.body_bytes {
            Some(n) if n > 0 => n.to_string(),
            _ => "-".to_string(),
        };
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr.ip(),
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.target,
            self.http_version,
            self.status,
            size,
        )
    }
}

/// Map a hyper version to the token used in the request line
pub fn version_token(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        AccessLogEntry::new(
            "192.168.1.1:54321".parse().unwrap(),
            "GET".to_string(),
            "/css/site.css?v=3".to_string(),
        )
    }

    #[test]
    fn test_format_common() {
        let mut e = entry();
        e.status = 200;
        e.body_bytes = Some(1234);
        let log = e.format_common();
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /css/site.css?v=3 HTTP/1.1\""));
        assert!(log.ends_with(" 200 1234"));
    }

    #[test]
    fn test_empty_body_is_dash() {
        let mut e = entry();
        e.status = 304;
        e.body_bytes = Some(0);
        assert!(e.format_common().ends_with(" 304 -"));
        e.body_bytes = None;
        assert!(e.format_common().ends_with(" 304 -"));
    }

    #[test]
    fn test_version_token() {
        assert_eq!(version_token(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_token(hyper::Version::HTTP_11), "1.1");
    }
}
