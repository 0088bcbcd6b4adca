//! Windows 이벤트 로그 텍스트 내보내기 규칙
//!
//! ```text
//! 10/10/2023 01:55:36 PM  Application  Error  -  The service terminated unexpectedly.
//! ```

use regex::Regex;

use super::{ParsedLog, ParserRule, required};
use crate::error::NormalizeError;

const WINDOWS_PATTERN: &str = r"^(?P<timestamp>[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2} (?:AM|PM))\s+[A-Za-z0-9_]+\s+[A-Za-z0-9_]+\s+-\s+(?P<message>.+)$";

/// `windows-eventlog` 규칙
///
/// 앞쪽의 12시간제 타임스탬프를 후보로 추출합니다. 심각도는 항상 `info`입니다.
pub struct WindowsEventRule {
    pattern: Regex,
}

impl WindowsEventRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(WINDOWS_PATTERN)?,
        })
    }
}

impl ParserRule for WindowsEventRule {
    fn name(&self) -> &str {
        "windows-eventlog"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse("windows-eventlog", "not an event log line"))?;

        let message = required(&caps, "message", "windows-eventlog")?;
        let timestamp = required(&caps, "timestamp", "windows-eventlog")?;

        Ok(
            ParsedLog::new("windows-eventlog", "windows-eventlog", "info", message)
                .with_timestamp(Some(timestamp.to_owned())),
        )
    }
}
