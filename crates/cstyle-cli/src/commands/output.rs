//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use cstyle_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// Violation paths are relative to `root`; the pretty format reads the
/// files again from there to show source snippets.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).context("Failed to serialize")?;
            format!("{json}\n")
        }
        OutputFormat::Compact => render_compact(result),
        OutputFormat::Pretty => render_pretty(result, root, GraphicalTheme::default()),
    };
    print!("{rendered}");
    Ok(())
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut out = String::new();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let _ = writeln!(out, "  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    for (rule, count) in result.count_by_rule() {
        let _ = writeln!(out, "  {rule}: {count}");
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    out
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(
            out,
            "{}:{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.severity,
            violation.code,
            violation.message,
        );
    }
    out
}

fn render_pretty(result: &LintResult, root: &Path, theme: GraphicalTheme) -> String {
    let handler = GraphicalReportHandler::new_themed(theme);
    let mut sources: HashMap<PathBuf, String> = HashMap::new();
    let mut out = String::new();

    for violation in &result.violations {
        let content = source_for(&mut sources, root, violation);
        let diagnostic = ViolationDiagnostic::new(violation, content);
        let mut report = String::new();
        if handler.render_report(&mut report, &diagnostic).is_ok() {
            out.push_str(&report);
        } else {
            let _ = writeln!(out, "{}", violation.format());
        }
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let _ = writeln!(
        out,
        "Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
        errors, warnings, infos, result.files_checked
    );
    out
}

/// File text for `violation`, read once per file.
fn source_for<'a>(
    cache: &'a mut HashMap<PathBuf, String>,
    root: &Path,
    violation: &Violation,
) -> &'a str {
    cache
        .entry(violation.location.file.clone())
        .or_insert_with(|| {
            std::fs::read_to_string(root.join(&violation.location.file)).unwrap_or_default()
        })
}
