//! SentryEdge 저장소
//!
//! core의 [`LogStore`](sentryedge_core::LogStore) trait 구현체를 제공합니다.
//!
//! - [`MemoryLogStore`]: 프로세스 메모리에만 보관 (테스트, 단기 실행)
//! - [`JsonlLogStore`]: 한 줄에 하나의 JSON 객체를 덧붙이는 파일 저장소
//!
//! [`open_store`]는 `[storage]` 설정에 따라 적절한 백엔드를 엽니다.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlLogStore;
pub use memory::MemoryLogStore;

use std::sync::Arc;

use sentryedge_core::config::StorageConfig;
use sentryedge_core::error::StorageError;
use sentryedge_core::pipeline::LogStore;

/// 설정된 백엔드로 저장소를 엽니다.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn LogStore>, StorageError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryLogStore::new())),
        "jsonl" => Ok(Arc::new(JsonlLogStore::open(&config.path).await?)),
        other => Err(StorageError::Connection(format!(
            "unknown storage backend: {other}"
        ))),
    }
}
