//! 페이로드 정규화
//!
//! 요청 본문을 [`RawPayload`]로 분류한 뒤, 객체의 모양에 따라 한 갈래를 선택해
//! 라인 또는 구조화 레코드를 만들고, 타임스탬프를 확정해 [`LogEntry`]를 반환합니다.
//!
//! # 객체 분기 (먼저 해당하는 것 하나)
//! 1. `raw` 키 존재 → 중첩된 `{"raw": ...}` 문자열을 최대 깊이까지 벗겨낸 라인
//! 2. `raw_b64` 문자열 → base64 디코드한 라인 (실패 시 요청 거부)
//! 3. `message` 존재, `service`/`level` 중 하나라도 없음 → `message`를 라인으로
//! 4. `service`, `level`, `message` 모두 존재 → 구조화 레코드 그대로
//! 5. 그 외 → 단일 미지 키의 값 또는 객체 전체 직렬화를 라인으로
//!
//! 객체가 아닌 본문은 평문으로 취급하며, 인쇄 가능한 ASCII로 디코드되는 base64이면
//! 디코드 결과를 라인으로 사용합니다.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use sentryedge_core::types::LogEntry;

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::parser::{ParsedLog, ParserRegistry};
use crate::timestamp::normalize_timestamp_at;

/// 구조화 레코드의 형식 이름
pub const STRUCTURED_FORMAT: &str = "structured";

/// 키 하나짜리 객체에서 값 승격을 막는 예약 키
const RESERVED_KEYS: &[&str] = &["raw_b64", "raw", "message", "service", "level"];

/// 패딩 유무와 남는 비트에 관대한 표준 알파벳 디코더
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 요청 본문 분류 결과
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// JSON으로 파싱된 본문
    Structured(Value),
    /// JSON이 아닌 본문
    Text(String),
}

impl RawPayload {
    /// 요청 본문을 분류합니다.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Text(body.to_owned()),
        }
    }
}

/// 정규화 결과 (엔트리 + 생성한 형식 이름)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// 정규화된 엔트리
    pub entry: LogEntry,
    /// 형식 규칙 이름, `fallback` 또는 `structured`
    pub format: String,
}

/// 객체 본문의 모양
enum ObjectShape<'a> {
    Raw(&'a Value),
    RawBase64(&'a str),
    MessageLine(&'a Value),
    Structured {
        service: &'a Value,
        level: &'a Value,
        message: &'a Value,
    },
    Other,
}

impl<'a> ObjectShape<'a> {
    fn of(obj: &'a Map<String, Value>) -> Self {
        if let Some(raw) = obj.get("raw") {
            return Self::Raw(raw);
        }
        if let Some(Value::String(encoded)) = obj.get("raw_b64") {
            return Self::RawBase64(encoded);
        }

        let present = move |key: &str| obj.get(key).filter(|value| is_truthy(value));
        match (present("service"), present("level"), present("message")) {
            (Some(service), Some(level), Some(message)) => Self::Structured {
                service,
                level,
                message,
            },
            (_, _, Some(message)) => Self::MessageLine(message),
            _ => Self::Other,
        }
    }
}

/// 페이로드 정규화기
///
/// 레지스트리와 설정을 소유하며, 요청 간 공유 상태가 없어 `&self`로 동시에 호출할 수 있습니다.
pub struct Normalizer {
    registry: ParserRegistry,
    config: NormalizerConfig,
}

impl Normalizer {
    /// 주어진 설정과 기본 레지스트리로 정규화기를 생성합니다.
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizeError> {
        Self::with_registry(config, ParserRegistry::with_defaults()?)
    }

    /// 사용자 정의 레지스트리로 정규화기를 생성합니다.
    pub fn with_registry(
        config: NormalizerConfig,
        registry: ParserRegistry,
    ) -> Result<Self, NormalizeError> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// 레지스트리를 반환합니다.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// 설정을 반환합니다.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// 요청 본문을 정규화합니다.
    ///
    /// 유일한 에러는 [`NormalizeError::InvalidBase64`]입니다.
    pub fn normalize(&self, body: &str) -> Result<LogEntry, NormalizeError> {
        self.normalize_payload(RawPayload::from_body(body))
            .map(|normalized| normalized.entry)
    }

    /// 분류된 페이로드를 현재 시각 기준으로 정규화합니다.
    pub fn normalize_payload(&self, payload: RawPayload) -> Result<Normalized, NormalizeError> {
        self.normalize_at(payload, Utc::now())
    }

    /// 분류된 페이로드를 주어진 수집 시각 기준으로 정규화합니다.
    pub fn normalize_at(
        &self,
        payload: RawPayload,
        now: DateTime<Utc>,
    ) -> Result<Normalized, NormalizeError> {
        let parsed = self.resolve(payload)?;
        let timestamp = normalize_timestamp_at(parsed.timestamp.as_deref(), now);

        Ok(Normalized {
            entry: LogEntry::new(parsed.service, parsed.level, parsed.message, timestamp),
            format: parsed.format,
        })
    }

    fn resolve(&self, payload: RawPayload) -> Result<ParsedLog, NormalizeError> {
        match payload {
            RawPayload::Structured(Value::Object(obj)) => self.resolve_object(&obj),
            RawPayload::Structured(Value::String(text)) | RawPayload::Text(text) => {
                Ok(self.resolve_text(&text))
            }
            RawPayload::Structured(_) => {
                debug!("non-object JSON body, parsing as empty line");
                Ok(self.registry.parse_line(""))
            }
        }
    }

    fn resolve_object(&self, obj: &Map<String, Value>) -> Result<ParsedLog, NormalizeError> {
        match ObjectShape::of(obj) {
            ObjectShape::Raw(raw) => {
                debug!("raw wrapper payload");
                Ok(self.registry.parse_line(&self.unwrap_raw(raw)))
            }
            ObjectShape::RawBase64(encoded) => {
                debug!("raw_b64 payload");
                let bytes = decode_base64(encoded).ok_or(NormalizeError::InvalidBase64)?;
                // 바이트마다 한 문자 (Latin-1), 어떤 바이트도 버리지 않음
                let line: String = bytes.iter().copied().map(char::from).collect();
                Ok(self.registry.parse_line(&line))
            }
            ObjectShape::MessageLine(message) => {
                debug!("message-only payload, parsing message as line");
                Ok(self.registry.parse_line(&value_line(message)))
            }
            ObjectShape::Structured {
                service,
                level,
                message,
            } => {
                debug!("pre-structured payload");
                Ok(ParsedLog::new(
                    STRUCTURED_FORMAT,
                    &value_line(service),
                    &value_line(level),
                    value_line(message),
                )
                .with_timestamp(obj.get("timestamp").and_then(timestamp_candidate)))
            }
            ObjectShape::Other => Ok(self.registry.parse_line(&other_line(obj))),
        }
    }

    /// 중첩된 `{"raw": ...}` 문자열을 최대 깊이까지 벗겨냅니다.
    fn unwrap_raw(&self, raw: &Value) -> String {
        let mut current = raw.clone();
        for depth in 1..=self.config.max_unwrap_depth {
            let Value::String(text) = &current else {
                break;
            };
            let next = match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(mut inner)) => match inner.remove("raw") {
                    Some(next) => next,
                    None => break,
                },
                _ => break,
            };
            trace!(depth, "unwrapped nested raw payload");
            current = next;
        }

        match current {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// 평문 본문. 인쇄 가능한 ASCII로 디코드되는 base64이면 디코드 결과를 사용합니다.
    fn resolve_text(&self, text: &str) -> ParsedLog {
        match decode_printable(text) {
            Some(decoded) => {
                debug!("plain body decoded as base64");
                self.registry.parse_line(&decoded)
            }
            None => self.registry.parse_line(text),
        }
    }
}

/// 공백을 무시하고 base64를 디코드합니다.
fn decode_base64(encoded: &str) -> Option<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64.decode(compact.as_bytes()).ok()
}

/// 디코드 결과가 비어 있지 않고 모두 인쇄 가능한 ASCII (탭/CR/LF 포함)일 때만 반환합니다.
fn decode_printable(text: &str) -> Option<String> {
    let bytes = decode_base64(text)?;
    let printable = !bytes.is_empty()
        && bytes
            .iter()
            .all(|&b| matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0x7e));
    if !printable {
        return None;
    }
    String::from_utf8(bytes).ok()
}

/// 분기 5: 예약되지 않은 키 하나뿐이면 그 값, 아니면 객체 전체 직렬화
fn other_line(obj: &Map<String, Value>) -> String {
    if obj.len() == 1 {
        if let Some((key, value)) = obj.iter().next() {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                return value_line(value);
            }
        }
    }
    Value::Object(obj.clone()).to_string()
}

/// 문자열은 그대로, 그 외 값은 JSON 직렬화
fn value_line(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn timestamp_candidate(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `null`, `false`, `0`, 빈 문자열은 값이 없는 것으로 봅니다.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
