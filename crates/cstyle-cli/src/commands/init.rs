//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "cstyle.toml";

const DEFAULT_CONFIG: &str = r#"# cstyle configuration

# Rule preset: "recommended", "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `cstyle check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/third_party/**",
]

# File extensions to check
extensions = ["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx"]

# Respect .gitignore files
respect_gitignore = true

# Columns per tab stop for line length and alignment
tab_width = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.line-length]
max_columns = 120
# severity = "warning"  # Override default severity

[rules.call-paren-spacing]
exempt = ["foreach", "FOREACH"]

[rules.max-parameters]
max = 6

[rules.initializer-spacing]
brace_padding = "none"

# [rules.class-doc-comment]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_NAME), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: cstyle check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.analyzer.tab_width, 4);
        assert_eq!(
            config.rules["line-length"].get_usize("max_columns", 0),
            120
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_NAME);
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
