//! Cloudflare Logpush 규칙
//!
//! 이벤트는 최상위 객체이거나 `Event` 래퍼 안에 있습니다.
//!
//! ```text
//! {"RayID":"7d1a","EdgeStartTimestamp":1705320000000000000,"ClientRequestHost":"example.com",
//!  "ClientRequestMethod":"GET","ClientRequestURI":"/login","EdgeResponseStatus":403,"WAFAction":"block"}
//! ```

use chrono::DateTime;
use regex::Regex;
use serde_json::{Map, Value};

use super::json::{first_text, parse_object, text_field};
use super::{ParsedLog, ParserRule};
use crate::error::NormalizeError;
use crate::timestamp::canonical;

const FORMAT: &str = "cloudflare-logpush";

const CLOUDFLARE_PATTERN: &str = r#"^\{.*("Event"\s*:\s*\{.*"RayID"|"RayID"\s*:)"#;

/// `cloudflare-logpush` 규칙
///
/// - 타임스탬프: `EdgeStartTimestamp` (정수 = 나노초, 문자열 = 그대로)
/// - 서비스: `Host` | `ClientRequestHost` | `ZoneID` | `cloudflare-logpush`
/// - 심각도: `WAFAction` | `Outcome` | `info`
/// - 메시지: `"{method} {uri} {status}"`, 요청 URI가 없으면 이벤트 직렬화
pub struct CloudflareRule {
    pattern: Regex,
}

impl CloudflareRule {
    /// 새 규칙을 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            pattern: Regex::new(CLOUDFLARE_PATTERN)?,
        })
    }
}

impl ParserRule for CloudflareRule {
    fn name(&self) -> &str {
        FORMAT
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn extract(&self, line: &str) -> Result<ParsedLog, NormalizeError> {
        let root = parse_object(line, FORMAT)?;
        let event = match root.get("Event") {
            Some(Value::Object(inner)) => inner,
            _ => &root,
        };

        let service = first_text(event, &["Host", "ClientRequestHost", "ZoneID"])
            .unwrap_or_else(|| FORMAT.to_owned());
        let level = first_text(event, &["WAFAction", "Outcome"]).unwrap_or_else(|| "info".to_owned());

        Ok(ParsedLog::new(FORMAT, &service, &level, request_summary(event)?)
            .with_timestamp(edge_start(event)?))
    }
}

/// `EdgeStartTimestamp`를 타임스탬프 후보로 변환합니다.
fn edge_start(event: &Map<String, Value>) -> Result<Option<String>, NormalizeError> {
    match event.get("EdgeStartTimestamp") {
        Some(Value::Number(n)) => {
            let millis = match n.as_i64() {
                Some(nanos) => nanos / 1_000_000,
                None => n
                    .as_f64()
                    .map(|nanos| (nanos / 1_000_000.0) as i64)
                    .ok_or_else(|| NormalizeError::parse(FORMAT, "EdgeStartTimestamp out of range"))?,
            };
            if millis == 0 {
                return Ok(None);
            }
            let instant = DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| NormalizeError::parse(FORMAT, "EdgeStartTimestamp out of range"))?;
            Ok(Some(canonical(instant)))
        }
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        _ => Ok(None),
    }
}

fn request_summary(event: &Map<String, Value>) -> Result<String, NormalizeError> {
    if let Some(uri) = text_field(event, "ClientRequestURI") {
        let method = text_field(event, "ClientRequestMethod").unwrap_or_else(|| "GET".to_owned());
        let status = first_text(event, &["EdgeResponseStatus", "OriginResponseStatus"])
            .unwrap_or_default();
        return Ok(format!("{method} {uri} {status}").trim().to_owned());
    }
    serde_json::to_string(event).map_err(|e| NormalizeError::parse(FORMAT, e.to_string()))
}
