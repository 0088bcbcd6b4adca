//! 에러 타입: 도메인별 에러 정의

/// SentryEdge 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SentryEdgeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 수집(정규화) 에러
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 수집 요청 처리 에러
///
/// 정규화 엔진은 전체(total) 함수이므로 호출자가 명시적으로 주장한 인코딩이
/// 잘못된 경우에만 요청이 거부됩니다.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// `raw_b64` 값이 올바른 base64가 아님
    #[error("Invalid base64 in raw_b64")]
    InvalidBase64,

    /// 엔진 초기화 실패 (정규식 컴파일, 설정 검증 등)
    #[error("engine init failed: {0}")]
    InitFailed(String),
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 저장소 열기 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쓰기 실패
    #[error("insert failed: {0}")]
    Insert(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),
}
