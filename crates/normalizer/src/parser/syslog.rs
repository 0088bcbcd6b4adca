//! BSD syslog (RFC 3164) 및 pfSense 규칙
//!
//! ```text
//! Oct 10 13:55:36 web-01 sshd: Accepted publickey for deploy
//! Oct 10 13:55:36 pfSense[1234]: block in on em0
//! ```
//!
//! 타임스탬프에 연도가 없으므로 정규화 단계에서 수집 시각 기준으로 추론됩니다.

use regex::Regex;

use super::{ParsedLog, ParserRule, required};
use crate::error::NormalizeError;

const SYSLOG_PATTERN: &str =
    r"^(?P<timestamp>[A-Za-z0-9_]+ +[0-9]+ +[0-9]+:[0-9]+:[0-9]+) (?P<host>\S+) (?P<service>\S+): (?P<message>.+)";

const PFSENSE_PATTERN: &str =
    r"^(?P<timestamp>[A-Za-z0-9_]+ +[0-9]+ +[0-9]+:[0-9]+:[0-9]+) pfSense\[(?P<pid>[0-9]+)\]: (?P<message>.+)$";

/// `syslog` 규칙
///
/// 서비스 이름은 라인의 태그(`sshd`, `CRON[123]` 등)를 그대로 사용합니다.
pub struct SyslogRule {
    pattern: Regex,
}

impl SyslogRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(SYSLOG_PATTERN)?,
        })
    }
}

impl ParserRule for SyslogRule {
    fn name(&self) -> &str {
        "syslog"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse("syslog", "not a syslog line"))?;

        let service = required(&caps, "service", "syslog")?;
        let message = required(&caps, "message", "syslog")?;
        let timestamp = required(&caps, "timestamp", "syslog")?;

        Ok(ParsedLog::new("syslog", service, "info", message)
            .with_timestamp(Some(timestamp.to_owned())))
    }
}

/// `pfsense` 규칙
pub struct PfSenseRule {
    pattern: Regex,
}

impl PfSenseRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(PFSENSE_PATTERN)?,
        })
    }
}

impl ParserRule for PfSenseRule {
    fn name(&self) -> &str {
        "pfsense"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse("pfsense", "not a pfSense line"))?;

        let message = required(&caps, "message", "pfsense")?;
        let timestamp = required(&caps, "timestamp", "pfsense")?;

        Ok(ParsedLog::new("pfsense", "pfsense", "info", message)
            .with_timestamp(Some(timestamp.to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syslog_takes_service_from_tag() {
        let rule = SyslogRule::new().unwrap();
        let line = "Oct 10 13:55:36 web-01 sshd: Accepted publickey for deploy";
        assert!(rule.matches(line));
        let parsed = rule.extract(line).unwrap();
        assert_eq!(parsed.service, "sshd");
        assert_eq!(parsed.level, "info");
        assert_eq!(parsed.message, "Accepted publickey for deploy");
        assert_eq!(parsed.timestamp.as_deref(), Some("Oct 10 13:55:36"));
    }

    #[test]
    fn syslog_accepts_padded_day() {
        let rule = SyslogRule::new().unwrap();
        let parsed = rule.extract("Feb  5 08:00:01 host CRON[991]: job done").unwrap();
        assert_eq!(parsed.service, "CRON[991]");
        assert_eq!(parsed.timestamp.as_deref(), Some("Feb  5 08:00:01"));
    }

    #[test]
    fn syslog_requires_timestamp() {
        let rule = SyslogRule::new().unwrap();
        assert!(!rule.matches("payment-service: critical failure in charge processor"));
    }

    #[test]
    fn syslog_rejects_non_ascii_digits() {
        let rule = SyslogRule::new().unwrap();
        assert!(!rule.matches("Oct ١٠ 13:55:36 web-01 sshd: Accepted publickey"));
        assert!(!rule.matches("Oct 10 ١٣:55:36 web-01 sshd: Accepted publickey"));
        assert!(!rule.matches("Oktöber 10 13:55:36 web-01 sshd: Accepted publickey"));
    }

    #[test]
    fn pfsense_line() {
        let rule = PfSenseRule::new().unwrap();
        let line = "Oct 10 13:55:36 pfSense[1234]: block in on em0 from 10.0.0.9";
        assert!(rule.matches(line));
        let parsed = rule.extract(line).unwrap();
        assert_eq!(parsed.service, "pfsense");
        assert_eq!(parsed.message, "block in on em0 from 10.0.0.9");
    }

    #[test]
    fn pfsense_shape_without_host_does_not_match_syslog() {
        // 호스트 필드가 없어서 syslog 규칙은 매칭되지 않음
        let rule = SyslogRule::new().unwrap();
        assert!(!rule.matches("Oct 10 13:55:36 pfSense[1234]: block"));
    }
}
