//! `sentryedge parse` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::info;

use sentryedge_core::LogEntry;
use sentryedge_normalizer::{Normalizer, NormalizerConfig, RawPayload, normalize_timestamp};

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
pub async fn execute(
    args: ParseArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_or_default(config_path).await?;
    let normalizer = Normalizer::new(NormalizerConfig::from_core(&config.normalizer))?;

    let body = read_payload(&args).await?;
    info!(bytes = body.len(), rule = ?args.rule, "normalizing payload");

    let report = match &args.rule {
        Some(rule) => apply_rule(&normalizer, rule, &body)?,
        None => normalize(&normalizer, &body)?,
    };
    writer.render(&report)
}

async fn read_payload(args: &ParseArgs) -> Result<String, CliError> {
    let raw = if let Some(payload) = &args.payload {
        payload.clone()
    } else if let Some(file) = &args.file {
        let bytes = tokio::fs::read(file).await?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        let mut bytes = Vec::new();
        tokio::io::stdin().read_to_end(&mut bytes).await?;
        String::from_utf8_lossy(&bytes).into_owned()
    };
    Ok(raw.trim_end_matches(['\r', '\n']).to_owned())
}

fn normalize(normalizer: &Normalizer, body: &str) -> Result<ParseReport, CliError> {
    let normalized = normalizer.normalize_payload(RawPayload::from_body(body))?;
    Ok(ParseReport::new(normalized.format, normalized.entry))
}

fn apply_rule(normalizer: &Normalizer, rule: &str, line: &str) -> Result<ParseReport, CliError> {
    let parsed = normalizer.registry().parse_with(rule, line)?;
    let timestamp = normalize_timestamp(parsed.timestamp.as_deref());
    let entry = LogEntry::new(&parsed.service, &parsed.level, parsed.message, timestamp);
    Ok(ParseReport::new(parsed.format, entry))
}

/// Normalized record plus the branch or rule that produced it.
#[derive(Serialize)]
pub struct ParseReport {
    pub format: String,
    #[serde(flatten)]
    pub entry: LogEntry,
}

impl ParseReport {
    fn new(format: String, entry: LogEntry) -> Self {
        Self { format, entry }
    }
}

impl Render for ParseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{:<10} {}", "format:".bold(), self.format)?;
        writeln!(w, "{:<10} {}", "service:".bold(), self.entry.service)?;
        writeln!(w, "{:<10} {}", "level:".bold(), colored_level(&self.entry.level))?;
        writeln!(w, "{:<10} {}", "timestamp:".bold(), self.entry.timestamp)?;
        writeln!(w, "{:<10} {}", "message:".bold(), self.entry.message)
    }
}

pub(crate) fn colored_level(level: &str) -> colored::ColoredString {
    match level {
        "error" | "fatal" | "critical" | "panic" => level.red(),
        "warn" | "warning" => level.yellow(),
        "debug" | "trace" => level.dimmed(),
        _ => level.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizerConfig::default()).expect("normalizer")
    }

    #[test]
    fn normalize_structured_payload() {
        let report = normalize(
            &normalizer(),
            r#"{"service":"API","level":"ERROR","message":"down"}"#,
        )
        .expect("normalize");
        assert_eq!(report.entry.service, "api");
        assert_eq!(report.entry.level, "error");
        assert_eq!(report.entry.message, "down");
    }

    #[test]
    fn normalize_invalid_raw_b64_fails() {
        let err = normalize(&normalizer(), r#"{"raw_b64":"@@@"}"#)
            .err()
            .expect("invalid base64 must fail");
        assert!(matches!(err, CliError::Normalize(_)));
    }

    #[test]
    fn apply_rule_forces_format() {
        let report = apply_rule(&normalizer(), "keyvalue", "level=warn msg=slow")
            .expect("keyvalue rule");
        assert_eq!(report.format, "keyvalue");
        assert_eq!(report.entry.level, "warn");
    }

    #[test]
    fn apply_rule_normalizes_timestamp() {
        let report = apply_rule(
            &normalizer(),
            "mysql",
            "2024-01-15T10:30:00.123456Z 12 [Warning] Aborted connection",
        )
        .expect("mysql rule");
        assert_eq!(report.entry.timestamp, "2024-01-15T10:30:00.123Z");
        assert_eq!(report.entry.level, "warning");
    }

    #[test]
    fn apply_unknown_rule_fails() {
        assert!(apply_rule(&normalizer(), "nope", "x").is_err());
    }

    #[test]
    fn report_json_is_flat() {
        let report = ParseReport::new(
            "syslog".to_owned(),
            LogEntry::new("sshd", "info", "hello", "2024-01-15T10:30:00.000Z"),
        );
        let value = serde_json::to_value(&report).expect("json");
        assert_eq!(value["format"], "syslog");
        assert_eq!(value["service"], "sshd");
        assert_eq!(value["timestamp"], "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn text_render_lists_fields() {
        colored::control::set_override(false);
        let report = ParseReport::new(
            "fallback".to_owned(),
            LogEntry::new("unknown", "error", "boom", "2024-01-15T10:30:00.000Z"),
        );
        let mut buf = Vec::new();
        report.render_text(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("fallback"));
        assert!(text.contains("boom"));
    }
}
