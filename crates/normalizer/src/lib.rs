//! SentryEdge 정규화 엔진
//!
//! 임의 형태의 로그 수집 요청 본문을 하나의 정규화된 [`LogEntry`](sentryedge_core::LogEntry)로
//! 변환합니다. 저장과 전송은 이 크레이트의 관심사가 아닙니다.
//!
//! # 모듈 구성
//!
//! - [`payload`]: 본문 분류, 래퍼 언랩, base64 디코드, 분기 선택 ([`Normalizer`])
//! - [`parser`]: 우선순위 기반 형식 규칙 레지스트리 ([`ParserRegistry`])
//! - [`classifier`]: 매칭 실패 시 심각도 추정 ([`SeverityClassifier`])
//! - [`timestamp`]: 타임스탬프 후보 정규화
//! - [`config`]: 엔진 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! body -> RawPayload -> Normalizer --line--> ParserRegistry --miss--> SeverityClassifier
//!                          |                      |                        |
//!                     structured             ParsedLog  <------------------+
//!                          |                      |
//!                          +------> timestamp normalization -> LogEntry
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod parser;
pub mod payload;
pub mod timestamp;

// --- 주요 타입 re-export ---

// 정규화기
pub use payload::{Normalized, Normalizer, RawPayload};

// 설정
pub use config::{NormalizerConfig, NormalizerConfigBuilder};

// 에러
pub use error::NormalizeError;

// 파서
pub use parser::{ParsedLog, ParserRegistry, ParserRule};

// 분류기
pub use classifier::SeverityClassifier;

// 타임스탬프
pub use timestamp::{normalize_timestamp, normalize_timestamp_at, parse_timestamp};
