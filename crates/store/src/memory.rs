//! 인메모리 저장소

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use sentryedge_core::error::StorageError;
use sentryedge_core::pipeline::{BoxFuture, LogStore, sort_and_page};
use sentryedge_core::types::{LogEntry, LogQuery, StoredLog};

/// 인메모리 저장소
///
/// 재시작하면 내용이 사라집니다.
pub struct MemoryLogStore {
    rows: RwLock<Vec<StoredLog>>,
    next_id: AtomicU64,
}

impl MemoryLogStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore for MemoryLogStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    fn insert(&self, entry: LogEntry) -> BoxFuture<'_, Result<StoredLog, StorageError>> {
        Box::pin(async move {
            let row = StoredLog {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                entry,
            };
            self.rows.write().await.push(row.clone());
            Ok(row)
        })
    }

    fn list(&self, query: LogQuery) -> BoxFuture<'_, Result<Vec<StoredLog>, StorageError>> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            let matched = rows
                .iter()
                .filter(|row| query.matches(&row.entry))
                .cloned()
                .collect();
            Ok(sort_and_page(matched, &query))
        })
    }

    fn count(&self) -> BoxFuture<'_, Result<usize, StorageError>> {
        Box::pin(async move { Ok(self.rows.read().await.len()) })
    }
}
