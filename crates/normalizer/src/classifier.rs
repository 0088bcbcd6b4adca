//! 폴백 심각도 분류기
//!
//! 어떤 형식 규칙에도 매칭되지 않은 라인에 대해 심각도만 추정합니다.
//!
//! 1. 명시적 `level=`/`level:` 토큰이 있으면 그 값을 소문자로 그대로 사용
//! 2. 실패 계열 키워드 (`fatal`, `fail`, `error`, `critical`, `panic` ...) → `error`
//! 3. 경고 키워드 (`warn`, `warning`) → `warning`
//! 4. 그 외 → `info`

use regex::Regex;

use crate::error::NormalizeError;
use crate::parser::ParsedLog;

/// 분류기가 만든 레코드의 형식 이름
pub const FALLBACK_FORMAT: &str = "fallback";

const EXPLICIT_LEVEL_PATTERN: &str =
    r"(?i)\blevel\s*[=:]?\s*(error|warn|warning|info|debug|fatal|critical|panic)\b";

/// 실패 계열 키워드 (소문자 부분 문자열 검사)
const ERROR_KEYWORDS: &[&str] = &["fatal", "fail", "error", "critical", "panic"];

/// 경고 키워드
const WARNING_KEYWORDS: &[&str] = &["warn"];

/// 폴백 심각도 분류기
///
/// 정규식은 생성 시 한 번만 컴파일됩니다.
pub struct SeverityClassifier {
    explicit_level: Regex,
}

impl SeverityClassifier {
    /// 새 분류기를 생성합니다.
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            explicit_level: Regex::new(EXPLICIT_LEVEL_PATTERN)?,
        })
    }

    /// 라인의 심각도를 결정합니다.
    pub fn severity(&self, line: &str) -> String {
        if let Some(token) = self.explicit_level.captures(line).and_then(|caps| caps.get(1)) {
            return token.as_str().to_ascii_lowercase();
        }

        let lowered = line.to_lowercase();
        let level = if ERROR_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            "error"
        } else if WARNING_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            "warning"
        } else {
            "info"
        };
        level.to_owned()
    }

    /// 라인 전체를 메시지로 하는 폴백 레코드를 생성합니다.
    pub fn classify(&self, line: &str) -> ParsedLog {
        ParsedLog::new(FALLBACK_FORMAT, "unknown", &self.severity(line), line)
    }
}
