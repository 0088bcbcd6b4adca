//! 웹 서버 액세스 로그 규칙 (Apache / Nginx combined)
//!
//! ```text
//! 127.0.0.1 - frank [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 1024
//! ```
//!
//! 메시지는 `"{method} {url} {status}"`로 합성하며, 심각도는 항상 `info`입니다.

use regex::Regex;

use super::{ParsedLog, ParserRule, required};
use crate::error::NormalizeError;

const APACHE_PATTERN: &str = r#"^(?P<ip>\S+) \S+ \S+ \[(?P<timestamp>[^\]]+)\] "(?P<method>\S+) (?P<url>\S+) (?P<protocol>\S+)" (?P<status>[0-9]+) (?P<size>[0-9]+)"#;

/// nginx는 ident 자리에 `-`가 고정됩니다. apache 패턴의 부분집합이라 기본 순서에서는 가려집니다.
const NGINX_PATTERN: &str = r#"^(?P<ip>\S+) - (?P<user>\S+) \[(?P<timestamp>[^\]]+)\] "(?P<method>\S+) (?P<url>\S+) (?P<protocol>\S+)" (?P<status>[0-9]+) (?P<size>[0-9]+)"#;

/// 액세스 로그 규칙
pub struct AccessLogRule {
    name: &'static str,
    pattern: Regex,
}

impl AccessLogRule {
    /// `apache` 규칙을 생성합니다.
    pub fn apache() -> Result<Self, NormalizeError> {
        Ok(Self {
            name: "apache",
            pattern: Regex::new(APACHE_PATTERN)?,
        })
    }

    /// `nginx` 규칙을 생성합니다.
    pub fn nginx() -> Result<Self, NormalizeError> {
        Ok(Self {
            name: "nginx",
            pattern: Regex::new(NGINX_PATTERN)?,
        })
    }
}

impl ParserRule for AccessLogRule {
    fn name(&self) -> &str {
        self.name
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse(self.name, "not an access log line"))?;

        let method = required(&caps, "method", self.name)?;
        let url = required(&caps, "url", self.name)?;
        let status = required(&caps, "status", self.name)?;
        let timestamp = required(&caps, "timestamp", self.name)?;

        Ok(
            ParsedLog::new(self.name, self.name, "info", format!("{method} {url} {status}"))
                .with_timestamp(Some(timestamp.to_owned())),
        )
    }
}
