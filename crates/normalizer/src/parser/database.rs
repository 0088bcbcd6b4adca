//! 데이터베이스 서버 로그 규칙 (PostgreSQL / MySQL)
//!
//! 두 형식 모두 라인에 심각도가 포함되어 있어 그대로 (소문자로) 사용합니다.

use regex::Regex;

use super::{ParsedLog, ParserRule, required};
use crate::error::NormalizeError;

/// `2024-01-15 12:00:00.123 UTC [4242] ERROR:  relation "users" does not exist`
const POSTGRES_PATTERN: &str = r"^(?P<timestamp>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+ [A-Z]+) \[(?P<pid>[0-9]+)\] (?P<level>[A-Za-z0-9_]+):  (?P<message>.+)$";

/// `2024-01-15T12:00:00.123456Z 12 [Warning] Aborted connection 12 to db`
const MYSQL_PATTERN: &str = r"^(?P<timestamp>[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+Z)\s+[0-9]+\s+\[(?P<level>[A-Za-z0-9_]+)\]\s+(?P<message>.+)$";

/// `postgresql` 규칙
pub struct PostgresRule {
    pattern: Regex,
}

impl PostgresRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(POSTGRES_PATTERN)?,
        })
    }
}

impl ParserRule for PostgresRule {
    fn name(&self) -> &str {
        "postgresql"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse("postgresql", "not a postgres log line"))?;

        let level = required(&caps, "level", "postgresql")?;
        let message = required(&caps, "message", "postgresql")?;
        let timestamp = required(&caps, "timestamp", "postgresql")?;

        Ok(ParsedLog::new("postgresql", "postgresql", level, message)
            .with_timestamp(Some(timestamp.to_owned())))
    }
}

/// `mysql` 규칙
pub struct MysqlRule {
    pattern: Regex,
}

impl MysqlRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(MYSQL_PATTERN)?,
        })
    }
}

impl ParserRule for MysqlRule {
    fn name(&self) -> &str {
        "mysql"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| NormalizeError::parse("mysql", "not a mysql log line"))?;

        let level = required(&caps, "level", "mysql")?;
        let message = required(&caps, "message", "mysql")?;
        let timestamp = required(&caps, "timestamp", "mysql")?;

        Ok(ParsedLog::new("mysql", "mysql", level, message)
            .with_timestamp(Some(timestamp.to_owned())))
    }
}
