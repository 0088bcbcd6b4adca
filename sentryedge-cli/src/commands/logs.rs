//! `sentryedge logs` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use sentryedge_core::pipeline::sort_and_page;
use sentryedge_core::{LogQuery, StoredLog};
use sentryedge_store::JsonlLogStore;

use crate::cli::LogsArgs;
use crate::commands::parse::colored_level;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `logs` command.
///
/// Reads the store file without opening it for append, so it is safe to run
/// next to a live daemon.
pub async fn execute(
    args: LogsArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let path = match args.path.clone() {
        Some(path) => path,
        None => PathBuf::from(super::load_or_default(config_path).await?.storage.path),
    };
    let query = LogQuery {
        service: args.service,
        level: args.level,
        limit: args.limit,
        offset: args.offset,
    };

    let report = query_file(&path, query).await?;
    writer.render(&report)
}

async fn query_file(path: &Path, query: LogQuery) -> Result<LogsReport, CliError> {
    info!(path = %path.display(), "reading log store");

    let rows = JsonlLogStore::read_all(path).await?;
    let total = rows.len();
    let matched: Vec<StoredLog> = rows
        .into_iter()
        .filter(|row| query.matches(&row.entry))
        .collect();
    let matched_count = matched.len();

    Ok(LogsReport {
        source: path.display().to_string(),
        total,
        matched: matched_count,
        rows: sort_and_page(matched, &query),
    })
}

#[derive(Serialize)]
pub struct LogsReport {
    pub source: String,
    pub total: usize,
    pub matched: usize,
    pub rows: Vec<StoredLog>,
}

impl Render for LogsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.rows.is_empty() {
            return writeln!(w, "No logs found ({} stored in {}).", self.total, self.source);
        }
        for row in &self.rows {
            writeln!(
                w,
                "{:>6} {} {:<8} {:<16} {}",
                row.id,
                row.entry.timestamp,
                colored_level(&row.entry.level),
                row.entry.service,
                row.entry.message
            )?;
        }
        writeln!(
            w,
            "\nShowing {} of {} matching ({} stored).",
            self.rows.len(),
            self.matched,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_store(dir: &Path) -> PathBuf {
        let path = dir.join("logs.jsonl");
        let lines = [
            r#"{"id":1,"service":"api","level":"info","message":"a","timestamp":"2024-01-15T10:00:01.000Z"}"#,
            r#"{"id":2,"service":"api","level":"error","message":"b","timestamp":"2024-01-15T10:00:02.000Z"}"#,
            r#"{"id":3,"service":"db","level":"error","message":"c","timestamp":"2024-01-15T10:00:03.000Z"}"#,
        ];
        std::fs::write(&path, lines.join("\n") + "\n").expect("write store");
        path
    }

    #[tokio::test]
    async fn query_filters_and_orders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_store(dir.path());

        let query = LogQuery {
            level: Some("ERROR".to_owned()),
            ..LogQuery::default()
        };
        let report = query_file(&path, query).await.expect("query");

        assert_eq!(report.total, 3);
        assert_eq!(report.matched, 2);
        let ids: Vec<u64> = report.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn query_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_store(dir.path());

        let query = LogQuery {
            limit: 1,
            offset: 1,
            ..LogQuery::default()
        };
        let report = query_file(&path, query).await.expect("query");
        assert_eq!(report.matched, 3);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].id, 2);
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = query_file(&dir.path().join("absent.jsonl"), LogQuery::default())
            .await
            .expect("query");
        assert_eq!(report.total, 0);

        let mut buf = Vec::new();
        report.render_text(&mut buf).expect("render");
        assert!(String::from_utf8(buf).expect("utf8").starts_with("No logs found"));
    }
}
