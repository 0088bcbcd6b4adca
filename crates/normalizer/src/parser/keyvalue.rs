//! `key=value` 라인 규칙
//!
//! ```text
//! ts=2024-01-15T12:00:00Z service=auth level=warn message=token_expired user=42
//! ```
//!
//! 각 토큰은 첫 번째 `=`에서 나뉩니다. 같은 키가 반복되면 마지막 값이 사용됩니다.

use std::collections::HashMap;

use regex::Regex;

use super::{ParsedLog, ParserRule};
use crate::error::NormalizeError;

const KEYVALUE_PATTERN: &str = r"^([A-Za-z0-9_]+=\S+ ?)+$";

/// `keyvalue` 규칙
pub struct KeyValueRule {
    pattern: Regex,
}

impl KeyValueRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(KEYVALUE_PATTERN)?,
        })
    }

    /// 값은 첫 `=` 뒤 전체입니다 (`message=a=b` → `a=b`).
    fn pairs(line: &str) -> HashMap<&str, &str> {
        line.split(' ')
            .filter_map(|token| token.split_once('='))
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .collect()
    }
}

impl ParserRule for KeyValueRule {
    fn name(&self) -> &str {
        "keyvalue"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let pairs = Self::pairs(line);
        let service = pairs.get("service").copied().unwrap_or("keyvalue");
        let level = pairs.get("level").copied().unwrap_or("info");
        let message = pairs.get("message").copied().unwrap_or(line);

        Ok(ParsedLog::new("keyvalue", service, level, message)
            .with_timestamp(pairs.get("timestamp").map(|ts| (*ts).to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> KeyValueRule {
        KeyValueRule::new().unwrap()
    }

    #[test]
    fn known_keys_extracted() {
        let line = "timestamp=2024-01-15T12:00:00Z service=auth level=WARN message=token_expired user=42";
        assert!(rule().matches(line));
        let parsed = rule().extract(line).unwrap();
        assert_eq!(parsed.service, "auth");
        assert_eq!(parsed.level, "warn");
        assert_eq!(parsed.message, "token_expired");
        assert_eq!(parsed.timestamp.as_deref(), Some("2024-01-15T12:00:00Z"));
    }

    #[test]
    fn defaults_when_keys_missing() {
        let line = "user=42 action=login";
        let parsed = rule().extract(line).unwrap();
        assert_eq!(parsed.service, "keyvalue");
        assert_eq!(parsed.level, "info");
        assert_eq!(parsed.message, line);
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let parsed = rule().extract("message=a=b service=x").unwrap();
        assert_eq!(parsed.message, "a=b");
    }

    #[test]
    fn last_duplicate_wins() {
        let parsed = rule().extract("level=info level=error").unwrap();
        assert_eq!(parsed.level, "error");
    }

    #[test]
    fn non_ascii_key_does_not_match() {
        assert!(!rule().matches("niveau=info clé=valeur"));
    }

    #[test]
    fn free_text_does_not_match() {
        assert!(!rule().matches("info test"));
        assert!(!rule().matches("level=error something broke"));
        assert!(!rule().matches(""));
    }
}
