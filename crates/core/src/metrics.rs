//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 컴포넌트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `sentryedge_`
//! - 영역: `ingest_`, `parser_`, `storage_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(sentryedge_core::metrics::INGEST_REQUESTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 파서 형식 레이블 키 (apache, syslog, json, fallback 등)
pub const LABEL_FORMAT: &str = "format";

/// 심각도 레이블 키
pub const LABEL_LEVEL: &str = "level";

/// 저장소 백엔드 레이블 키 (memory, jsonl)
pub const LABEL_BACKEND: &str = "backend";

// ─── Ingest 메트릭 ──────────────────────────────────────────────────

/// Ingest: 수신된 전체 수집 요청 수 (counter)
pub const INGEST_REQUESTS_TOTAL: &str = "sentryedge_ingest_requests_total";

/// Ingest: 거부된 수집 요청 수 (counter, 잘못된 raw_b64)
pub const INGEST_REJECTED_TOTAL: &str = "sentryedge_ingest_rejected_total";

/// Ingest: 정규화 지연 시간 (histogram, 초)
pub const NORMALIZE_DURATION_SECONDS: &str = "sentryedge_normalize_duration_seconds";

// ─── Parser 메트릭 ──────────────────────────────────────────────────

/// Parser: 형식별 매칭 수 (counter, label: format)
pub const PARSER_MATCHES_TOTAL: &str = "sentryedge_parser_matches_total";

// ─── Storage 메트릭 ─────────────────────────────────────────────────

/// Storage: 저장 실패 수 (counter, label: backend)
pub const STORAGE_ERRORS_TOTAL: &str = "sentryedge_storage_errors_total";

/// Storage: 저장된 로그 수 (gauge)
pub const STORED_LOGS: &str = "sentryedge_stored_logs";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 정규화 지연 시간 히스토그램 버킷 (초)
///
/// 10us ~ 100ms 범위, 요청 단위 분포
pub const NORMALIZE_DURATION_BUCKETS: [f64; 8] =
    [0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.1];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `sentryedge-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        INGEST_REQUESTS_TOTAL,
        "Total number of POST /logs requests received"
    );
    describe_counter!(
        INGEST_REJECTED_TOTAL,
        "Total number of ingest requests rejected for invalid raw_b64"
    );
    describe_histogram!(
        NORMALIZE_DURATION_SECONDS,
        "Time to normalize a single payload in seconds"
    );
    describe_counter!(
        PARSER_MATCHES_TOTAL,
        "Normalized payloads per matching format (fallback included)"
    );
    describe_counter!(
        STORAGE_ERRORS_TOTAL,
        "Total number of failed store inserts"
    );
    describe_gauge!(STORED_LOGS, "Number of log rows currently stored");
}
