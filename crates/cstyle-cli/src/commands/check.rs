//! Check command implementation.

use anyhow::{Context, Result};
use cstyle_core::{Analyzer, Config, RuleBox};
use cstyle_rules::{all_rules, recommended_rules, Preset};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line options of `cstyle check`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run instead of the preset.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Tab width override.
    pub tab_width: Option<usize>,
}

/// Runs the check command.
///
/// Returns `true` when the result reaches the configured `fail_on` severity.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let fail_on = config.fail_on_severity();

    let rules = match &options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            select_rules(&names)
        }
        None => preset_rules(config.preset.as_deref()),
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned());
    if let Some(width) = options.tab_width {
        builder = builder.tab_width(width);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    tracing::info!("Using configuration: {source}");
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn preset_rules(preset: Option<&str>) -> Vec<RuleBox> {
    let Some(name) = preset else {
        return recommended_rules();
    };
    if let Some(preset) = Preset::from_name(name) {
        return preset.rules();
    }
    tracing::warn!("Unknown preset '{}', using recommended", name);
    recommended_rules()
}

/// Picks rules by name or code, warning about names that match nothing.
fn select_rules(names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        let known = all_rules()
            .iter()
            .any(|rule| rule.name() == *name || rule.code() == *name);
        if !known {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    all_rules()
        .into_iter()
        .filter(|rule| {
            names
                .iter()
                .any(|name| rule.name() == *name || rule.code() == *name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn codes(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn select_rules_by_name_or_code() {
        let rules = select_rules(&["line-length", "CS011", "no-such-rule"]);
        assert_eq!(codes(&rules), vec!["CS001", "CS011"]);
    }

    #[test]
    fn preset_falls_back_to_recommended() {
        assert_eq!(preset_rules(Some("minimal")).len(), 3);
        assert_eq!(
            preset_rules(Some("bogus")).len(),
            recommended_rules().len()
        );
        assert_eq!(preset_rules(None).len(), recommended_rules().len());
    }

    #[test]
    fn run_reports_failure_at_threshold() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.c"), "int a = 1; \n").unwrap();

        let options = CheckOptions {
            format: OutputFormat::Compact,
            rules: Some("trailing-whitespace".to_string()),
            ..CheckOptions::default()
        };
        assert!(run(tmp.path(), &options, &ConfigSource::Default).unwrap());

        fs::write(tmp.path().join("a.c"), "int a = 1;\n").unwrap();
        assert!(!run(tmp.path(), &options, &ConfigSource::Default).unwrap());
    }

    #[test]
    fn run_honors_fail_on_from_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.h"), "class A {\n};\n").unwrap();
        let config = tmp.path().join("cstyle.toml");
        fs::write(&config, "fail_on = \"error\"\n").unwrap();

        let options = CheckOptions {
            format: OutputFormat::Compact,
            rules: Some("CS004".to_string()),
            ..CheckOptions::default()
        };
        let source = ConfigSource::Project(config.clone());
        assert!(!run(tmp.path(), &options, &source).unwrap());

        fs::write(&config, "fail_on = \"warning\"\n").unwrap();
        assert!(run(tmp.path(), &options, &source).unwrap());
    }
}
