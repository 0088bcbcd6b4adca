//! 구조화 JSON 규칙 (generic JSON / AWS CloudWatch) 및 JSON 필드 헬퍼
//!
//! 필드 읽기 규칙은 모든 JSON 계열 규칙이 공유합니다.
//! - 문자열, 숫자, 불리언은 텍스트로 변환
//! - 빈 문자열, `null`, 배열, 객체는 없는 것으로 취급

use regex::Regex;
use serde_json::{Map, Value};

use super::{ParsedLog, ParserRule};
use crate::error::NormalizeError;

const JSON_PATTERN: &str = r"^\{.*\}$";
const CLOUDWATCH_PATTERN: &str = r#"^\{.*"logStream":.*\}$"#;

/// 라인을 JSON 객체로 파싱합니다.
pub(crate) fn parse_object(line: &str, format: &str) -> Result<Map<String, Value>, NormalizeError> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(NormalizeError::parse(format, "expected a JSON object")),
        Err(e) => Err(NormalizeError::parse(format, e.to_string())),
    }
}

/// 스칼라 값을 텍스트로 변환합니다. 빈 문자열은 없는 것으로 취급합니다.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 객체 필드를 텍스트로 읽습니다.
pub(crate) fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_text)
}

/// 여러 후보 키 중 처음으로 값이 있는 필드를 읽습니다.
pub(crate) fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text_field(obj, key))
}

/// `json` 규칙
///
/// `timestamp` | `time`, `service` | `json`, `level` | `info`, `message` | 원본 라인
pub struct GenericJsonRule {
    pattern: Regex,
}

impl GenericJsonRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(JSON_PATTERN)?,
        })
    }
}

impl ParserRule for GenericJsonRule {
    fn name(&self) -> &str {
        "json"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let obj = parse_object(line, "json")?;
        let service = text_field(&obj, "service").unwrap_or_else(|| "json".to_owned());
        let level = text_field(&obj, "level").unwrap_or_else(|| "info".to_owned());
        let message = text_field(&obj, "message").unwrap_or_else(|| line.to_owned());

        Ok(ParsedLog::new("json", &service, &level, message)
            .with_timestamp(first_text(&obj, &["timestamp", "time"])))
    }
}

/// `aws-cloudwatch` 규칙
///
/// 서비스 이름은 `logStream`을 사용합니다. 기본 순서에서는 `json` 규칙에 가려집니다.
pub struct CloudWatchRule {
    pattern: Regex,
}

impl CloudWatchRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(CLOUDWATCH_PATTERN)?,
        })
    }
}

impl ParserRule for CloudWatchRule {
    fn name(&self) -> &str {
        "aws-cloudwatch"
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let obj = parse_object(line, "aws-cloudwatch")?;
        let service = text_field(&obj, "logStream").unwrap_or_else(|| "aws-cloudwatch".to_owned());
        let level = text_field(&obj, "level").unwrap_or_else(|| "info".to_owned());
        let message = text_field(&obj, "message").unwrap_or_else(|| line.to_owned());

        Ok(ParsedLog::new("aws-cloudwatch", &service, &level, message)
            .with_timestamp(text_field(&obj, "timestamp")))
    }
}
