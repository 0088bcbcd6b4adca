//! 저장소 trait: 영속화 협력자 확장 포인트 정의
//!
//! 정규화 엔진은 저장소를 알지 못합니다. 수집 핸들러가 완성된 [`LogEntry`]를
//! [`LogStore::insert`]로 넘기고, 조회 API가 [`LogStore::list`]를 호출합니다.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::types::{LogEntry, LogQuery, StoredLog};

/// `dyn` 호환 비동기 메서드를 위한 boxed future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 영속화 협력자 trait
///
/// 새로운 저장소 백엔드를 지원하려면 이 trait을 구현합니다.
/// `Arc<dyn LogStore>`로 핸들러 간에 공유되므로 `Send + Sync`여야 합니다.
pub trait LogStore: Send + Sync {
    /// 백엔드 이름 (memory, jsonl 등)
    fn backend_name(&self) -> &str;

    /// 정규화된 엔트리를 저장하고 부여된 행을 반환합니다.
    fn insert(&self, entry: LogEntry) -> BoxFuture<'_, Result<StoredLog, StorageError>>;

    /// 조건에 맞는 행을 타임스탬프 내림차순으로 반환합니다.
    fn list(&self, query: LogQuery) -> BoxFuture<'_, Result<Vec<StoredLog>, StorageError>>;

    /// 저장된 전체 행 수
    fn count(&self) -> BoxFuture<'_, Result<usize, StorageError>>;
}

/// 컴포넌트 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HealthStatus {
    /// 정상
    Healthy,
    /// 일부 기능 저하
    Degraded(String),
    /// 동작 불가
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 동작 불가 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

/// 조회 결과를 정렬하고 페이지를 자릅니다.
///
/// 타임스탬프 내림차순, 같은 시각이면 ID 내림차순입니다. 정규화된 타임스탬프는
/// 고정 폭 RFC 3339 문자열이므로 사전순 비교가 시간순과 같습니다.
pub fn sort_and_page(mut rows: Vec<StoredLog>, query: &LogQuery) -> Vec<StoredLog> {
    rows.sort_by(|a, b| {
        b.entry
            .timestamp
            .cmp(&a.entry.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    rows.into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect()
}
