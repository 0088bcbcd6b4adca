//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 정규화 엔진이 생성하고, 저장소가 보관하며, 조회 API가 반환하는
//! 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `service` 필드가 비어 있을 때 사용하는 기본값
pub const DEFAULT_SERVICE: &str = "unknown";

/// `level` 필드가 비어 있을 때 사용하는 기본값
pub const DEFAULT_LEVEL: &str = "info";

/// 조회 시 기본 페이지 크기
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// 정규화된 로그 엔트리
///
/// 모든 수집 경로(웹 서버, 컨테이너, 데이터베이스, 엣지 네트워크 등)의 로그가
/// 이 네 필드로 통합됩니다. 저장 시점에 네 필드는 모두 채워져 있어야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 로그를 생성한 서비스 (소문자 정규화)
    pub service: String,
    /// 심각도 (소문자 정규화)
    pub level: String,
    /// 로그 메시지
    pub message: String,
    /// 정규화된 시각 (RFC 3339 UTC, 밀리초, `Z` 접미사)
    pub timestamp: String,
}

impl LogEntry {
    /// 필드를 정규화하여 엔트리를 생성합니다.
    ///
    /// `service`와 `level`은 공백 제거 후 소문자로 변환되며,
    /// 비어 있으면 각각 `"unknown"`, `"info"`로 대체됩니다.
    pub fn new(
        service: impl AsRef<str>,
        level: impl AsRef<str>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            service: normalize_label(service.as_ref(), DEFAULT_SERVICE),
            level: normalize_label(level.as_ref(), DEFAULT_LEVEL),
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.timestamp, self.level, self.service, self.message,
        )
    }
}

/// 필터링용 레이블을 정규화합니다 (trim + 소문자, 비어 있으면 `fallback`).
///
/// 저장과 조회가 같은 규칙을 써야 정확 일치 필터가 동작합니다.
pub fn normalize_label(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_lowercase()
    }
}

/// 저장소에 기록된 로그 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLog {
    /// 저장소가 부여한 단조 증가 ID
    pub id: u64,
    /// 정규화된 엔트리
    #[serde(flatten)]
    pub entry: LogEntry,
}

/// 로그 조회 조건
///
/// 결과는 타임스탬프 내림차순으로 정렬된 뒤 `offset`/`limit`이 적용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// 서비스 정확 일치 필터
    pub service: Option<String>,
    /// 레벨 정확 일치 필터
    pub level: Option<String>,
    /// 최대 반환 개수
    pub limit: usize,
    /// 건너뛸 개수
    pub offset: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            service: None,
            level: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl LogQuery {
    /// 행이 필터 조건에 부합하는지 확인합니다.
    ///
    /// 빈 필터 값은 조건 없음으로 취급합니다.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let service_ok = match self.service.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => entry.service == s.to_lowercase(),
            _ => true,
        };
        let level_ok = match self.level.as_deref().map(str::trim) {
            Some(l) if !l.is_empty() => entry.level == l.to_lowercase(),
            _ => true,
        };
        service_ok && level_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_labels() {
        let entry = LogEntry::new(" API ", "ERROR", "timeout", "2024-01-15T12:00:00.000Z");
        assert_eq!(entry.service, "api");
        assert_eq!(entry.level, "error");
        assert_eq!(entry.message, "timeout");
    }

    #[test]
    fn new_fills_missing_labels() {
        let entry = LogEntry::new("", "  ", "msg", "2024-01-15T12:00:00.000Z");
        assert_eq!(entry.service, DEFAULT_SERVICE);
        assert_eq!(entry.level, DEFAULT_LEVEL);
    }

    #[test]
    fn display_contains_all_fields() {
        let entry = LogEntry::new("nginx", "info", "GET / 200", "2024-01-15T12:00:00.000Z");
        let s = entry.to_string();
        assert!(s.contains("nginx"));
        assert!(s.contains("[info]"));
        assert!(s.contains("GET / 200"));
    }

    #[test]
    fn stored_log_serializes_flat() {
        let row = StoredLog {
            id: 7,
            entry: LogEntry::new("api", "warn", "slow", "2024-01-15T12:00:00.000Z"),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["service"], "api");
        assert_eq!(json["timestamp"], "2024-01-15T12:00:00.000Z");
    }

    #[test]
    fn query_filters_case_insensitively() {
        let entry = LogEntry::new("api", "error", "x", "2024-01-15T12:00:00.000Z");
        let query = LogQuery {
            service: Some("API".to_owned()),
            level: Some("Error".to_owned()),
            ..Default::default()
        };
        assert!(query.matches(&entry));

        let query = LogQuery {
            level: Some("info".to_owned()),
            ..Default::default()
        };
        assert!(!query.matches(&entry));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let entry = LogEntry::new("api", "error", "x", "2024-01-15T12:00:00.000Z");
        let query = LogQuery {
            service: Some(String::new()),
            ..Default::default()
        };
        assert!(query.matches(&entry));
    }
}
