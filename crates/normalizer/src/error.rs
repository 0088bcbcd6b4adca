//! 정규화 엔진 에러 타입
//!
//! [`NormalizeError`]는 엔진 내부에서 발생하는 모든 에러를 표현합니다.
//! 호출자에게 전파되는 것은 [`NormalizeError::InvalidBase64`]뿐이며,
//! 나머지는 레지스트리 안에서 최소 레코드로 강등되거나 초기화 시점에만 발생합니다.
//! `From<NormalizeError> for SentryEdgeError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use sentryedge_core::error::{ConfigError, IngestError, SentryEdgeError};

/// 정규화 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// 호출자가 `raw_b64`로 주장한 인코딩이 유효하지 않음 (요청 거부)
    #[error("Invalid base64 in raw_b64")]
    InvalidBase64,

    /// 추출기 재파싱 실패
    #[error("parse error: {format}: {reason}")]
    Parse {
        /// 규칙 이름 (docker-json, postgresql 등)
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// 등록되지 않은 형식 이름
    #[error("unsupported log format: {0}")]
    UnsupportedFormat(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl NormalizeError {
    /// 규칙 이름과 사유로 파싱 에러를 생성합니다.
    pub(crate) fn parse(format: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            format: format.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<NormalizeError> for SentryEdgeError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::InvalidBase64 => SentryEdgeError::Ingest(IngestError::InvalidBase64),
            NormalizeError::Config { field, reason } => {
                SentryEdgeError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => SentryEdgeError::Ingest(IngestError::InitFailed(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = NormalizeError::parse("docker-json", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("docker-json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn invalid_base64_maps_to_ingest_error() {
        let err: SentryEdgeError = NormalizeError::InvalidBase64.into();
        assert!(matches!(
            err,
            SentryEdgeError::Ingest(IngestError::InvalidBase64)
        ));
    }

    #[test]
    fn config_error_maps_to_config() {
        let err: SentryEdgeError = NormalizeError::Config {
            field: "max_unwrap_depth".to_owned(),
            reason: "must be 1-32".to_owned(),
        }
        .into();
        assert!(matches!(err, SentryEdgeError::Config(_)));
    }

    #[test]
    fn regex_error_converts() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: NormalizeError = regex_err.into();
        assert!(err.to_string().starts_with("regex error"));
    }
}
