//! `sentryedge formats` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use sentryedge_normalizer::ParserRegistry;
use sentryedge_normalizer::classifier::FALLBACK_FORMAT;

use crate::cli::FormatsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `formats` command.
pub fn execute(args: FormatsArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let registry = ParserRegistry::with_defaults()?;
    let report = build_report(&registry, args.detect.as_deref());
    writer.render(&report)
}

fn build_report(registry: &ParserRegistry, detect: Option<&str>) -> FormatsReport {
    let formats = registry
        .registered_formats()
        .into_iter()
        .enumerate()
        .map(|(i, name)| FormatEntry {
            priority: i + 1,
            name: name.to_owned(),
        })
        .collect();

    FormatsReport {
        formats,
        detected: detect.map(|line| {
            registry
                .detect(line)
                .unwrap_or(FALLBACK_FORMAT)
                .to_owned()
        }),
    }
}

/// Registered formats in match order.
#[derive(Serialize)]
pub struct FormatsReport {
    pub formats: Vec<FormatEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<String>,
}

#[derive(Serialize)]
pub struct FormatEntry {
    pub priority: usize,
    pub name: String,
}

impl Render for FormatsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if let Some(detected) = &self.detected {
            return writeln!(w, "{}", detected.bold());
        }
        writeln!(w, "{:<9} {}", "PRIORITY".bold(), "FORMAT".bold())?;
        for entry in &self.formats {
            writeln!(w, "{:<9} {}", entry.priority, entry.name)?;
        }
        writeln!(w, "{:<9} {}", "-", FALLBACK_FORMAT.dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ParserRegistry {
        ParserRegistry::with_defaults().expect("default registry")
    }

    #[test]
    fn report_lists_priority_order() {
        let report = build_report(&registry(), None);
        assert_eq!(report.formats.len(), 13);
        assert_eq!(report.formats[0].name, "apache");
        assert_eq!(report.formats[0].priority, 1);
        assert_eq!(report.formats[12].name, "pfsense");
        assert!(report.detected.is_none());
    }

    #[test]
    fn detect_reports_claiming_rule() {
        let report = build_report(&registry(), Some("user=alice action=login"));
        assert_eq!(report.detected.as_deref(), Some("keyvalue"));
    }

    #[test]
    fn detect_unmatched_reports_fallback() {
        let report = build_report(&registry(), Some("just some words"));
        assert_eq!(report.detected.as_deref(), Some(FALLBACK_FORMAT));
    }

    #[test]
    fn text_render_includes_every_format() {
        colored::control::set_override(false);
        let report = build_report(&registry(), None);
        let mut buf = Vec::new();
        report.render_text(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(
            text.lines()
                .any(|line| line.starts_with('1') && line.ends_with("apache"))
        );
        assert!(text.contains("fallback"));
    }
}
