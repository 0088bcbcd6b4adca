//! SentryEdge 공통 크레이트
//!
//! 로그 수집 서비스의 모든 크레이트가 공유하는 도메인 타입, 저장소 확장 포인트,
//! 에러 계층, 설정, 메트릭 이름을 정의합니다.
//!
//! # 모듈 구성
//!
//! - [`types`]: 정규화된 로그 레코드 ([`LogEntry`]), 조회 조건, 저장 행
//! - [`pipeline`]: 영속화 협력자 trait ([`LogStore`])
//! - [`error`]: 도메인별 에러 타입
//! - [`config`]: `sentryedge.toml` 설정
//! - [`metrics`]: Prometheus 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, IngestError, SentryEdgeError, StorageError};

// 설정
pub use config::SentryEdgeConfig;

// 저장소 trait
pub use pipeline::{BoxFuture, HealthStatus, LogStore};

// 도메인 타입
pub use types::{LogEntry, LogQuery, StoredLog};
