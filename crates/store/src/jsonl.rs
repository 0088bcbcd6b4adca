//! JSON Lines 파일 저장소
//!
//! 행마다 `{"id":1,"service":...,"level":...,"message":...,"timestamp":...}` 한 줄을 덧붙입니다.
//! 열 때 기존 파일을 재생해 메모리 인덱스를 만들며, 손상된 줄은 경고 후 건너뜁니다.
//! 쓰기가 중간에 실패하면 파일을 쓰기 전 길이로 되돌려 다음 행이 붙지 않게 합니다.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

use sentryedge_core::error::StorageError;
use sentryedge_core::pipeline::{BoxFuture, LogStore, sort_and_page};
use sentryedge_core::types::{LogEntry, LogQuery, StoredLog};

struct JsonlState {
    file: File,
    rows: Vec<StoredLog>,
    next_id: u64,
    /// 마지막으로 온전히 기록된 파일 길이 (바이트)
    len: u64,
    /// 파일 끝이 줄바꿈으로 끝나지 않음 (잘린 줄이 남아 있음)
    needs_newline: bool,
}

/// JSON Lines 파일 저장소
///
/// 쓰기는 뮤텍스로 직렬화되어 ID 순서와 파일 내 줄 순서가 일치합니다.
pub struct JsonlLogStore {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlLogStore {
    /// 파일을 열고 (없으면 생성) 기존 행을 재생합니다.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Connection(format!("{}: {}", parent.display(), e))
            })?;
        }

        let content = Self::read_content(&path).await?;
        let rows = Self::parse_rows(&path, &content);
        let needs_newline = !content.is_empty() && !content.ends_with('\n');
        if needs_newline {
            warn!(path = %path.display(), "store file ends with a partial line");
        }
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::Connection(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), rows = rows.len(), "jsonl store opened");

        Ok(Self {
            path,
            state: Mutex::new(JsonlState {
                file,
                rows,
                next_id,
                len: content.len() as u64,
                needs_newline,
            }),
        })
    }

    /// 파일의 모든 행을 읽습니다. 파일이 없으면 빈 목록입니다.
    ///
    /// 저장소를 열지 않고 조회만 할 때 (CLI) 사용합니다.
    pub async fn read_all(path: impl AsRef<Path>) -> Result<Vec<StoredLog>, StorageError> {
        let path = path.as_ref();
        let content = Self::read_content(path).await?;
        Ok(Self::parse_rows(path, &content))
    }

    async fn read_content(path: &Path) -> Result<String, StorageError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StorageError::Query(format!("{}: {}", path.display(), e))),
        }
    }

    fn parse_rows(path: &Path, content: &str) -> Vec<StoredLog> {
        let mut rows = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredLog>(line) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping corrupt store line"
                ),
            }
        }
        rows
    }

    /// 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStore for JsonlLogStore {
    fn backend_name(&self) -> &str {
        "jsonl"
    }

    fn insert(&self, entry: LogEntry) -> BoxFuture<'_, Result<StoredLog, StorageError>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let row = StoredLog {
                id: state.next_id,
                entry,
            };

            let json =
                serde_json::to_string(&row).map_err(|e| StorageError::Insert(e.to_string()))?;
            let mut line = String::with_capacity(json.len() + 2);
            if state.needs_newline {
                line.push('\n');
            }
            line.push_str(&json);
            line.push('\n');

            let written = match state.file.write_all(line.as_bytes()).await {
                Ok(()) => state.file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                let len = state.len;
                match state.file.set_len(len).await {
                    Ok(()) => warn!(
                        path = %self.path.display(),
                        error = %e,
                        "store write failed, rolled back"
                    ),
                    Err(truncate) => {
                        // 잘린 줄이 남았을 수 있으므로 다음 행은 새 줄에서 시작
                        state.needs_newline = true;
                        warn!(
                            path = %self.path.display(),
                            error = %e,
                            truncate_error = %truncate,
                            "store write failed, rollback failed"
                        );
                    }
                }
                return Err(StorageError::Insert(e.to_string()));
            }

            state.len += line.len() as u64;
            state.needs_newline = false;
            state.next_id += 1;
            state.rows.push(row.clone());
            Ok(row)
        })
    }

    fn list(&self, query: LogQuery) -> BoxFuture<'_, Result<Vec<StoredLog>, StorageError>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            let matched = state
                .rows
                .iter()
                .filter(|row| query.matches(&row.entry))
                .cloned()
                .collect();
            Ok(sort_and_page(matched, &query))
        })
    }

    fn count(&self) -> BoxFuture<'_, Result<usize, StorageError>> {
        Box::pin(async move { Ok(self.state.lock().await.rows.len()) })
    }
}
