//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::cursor::Cursor;
use crate::declaration::{ContextKind, ContextNode, DeclarationTracker};
use crate::error::InvariantError;
use crate::lexer::tokenize;
use crate::rule::{Rule, RuleBox, RuleKind, RuleRegistry, SourceLine};
use crate::types::{LintResult, Severity, Suggestion, Violation};
use crate::utils::allowance::{allow_in_lines, AllowCheck};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule or engine component broke a structural contract.
    #[error("Invariant violated while checking {path}: {source}")]
    Invariant {
        /// File being checked.
        path: PathBuf,
        /// The broken contract.
        source: InvariantError,
    },

    /// Directory walk error.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    tab_width: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the configured tab width.
    #[must_use]
    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = Some(width);
        self
    }

    /// Builds the analyzer.
    ///
    /// Disabled rules are dropped here and the remaining ones receive
    /// their options through [`Rule::configure`].
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        for pattern in &exclude_patterns {
            glob::Pattern::new(pattern)?;
        }

        let mut registry = RuleRegistry::new();
        for mut rule in self.rules {
            if !config.is_rule_enabled(rule.name(), rule.code()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            if let Some(rule_config) = config.rule_config(rule.name(), rule.code()) {
                rule.configure(rule_config);
            }
            registry.register(rule);
        }

        Ok(Analyzer {
            root,
            registry,
            exclude_patterns,
            tab_width: self.tab_width.unwrap_or(config.analyzer.tab_width).max(1),
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    registry: RuleRegistry,
    exclude_patterns: Vec<String>,
    tab_width: usize,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the effective tab width.
    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// Files are checked in parallel. Unreadable files are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails or an invariant is violated.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes: Vec<Result<Option<Vec<Violation>>, AnalyzerError>> =
            match self.config.analyzer.parallelism {
                Some(threads) => rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?
                    .install(|| files.par_iter().map(|f| self.analyze_file(f)).collect()),
                None => files.par_iter().map(|f| self.analyze_file(f)).collect(),
            };

        let mut result = LintResult::new();
        for outcome in outcomes {
            if let Some(violations) = outcome? {
                result.violations.extend(violations);
                result.files_checked += 1;
            }
        }
        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Lints in-memory source text as if it were the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Invariant`] if a rule breaks an engine contract.
    pub fn check_source(
        &self,
        path: impl AsRef<Path>,
        content: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let path = path.as_ref();
        let mut violations =
            self.check_tokens(path, content)
                .map_err(|source| AnalyzerError::Invariant {
                    path: path.to_path_buf(),
                    source,
                })?;
        violations.sort_by_key(|v| (v.location.line, v.location.column));
        Ok(violations)
    }

    /// Analyzes a single file; `None` when it could not be read.
    fn analyze_file(&self, path: &Path) -> Result<Option<Vec<Violation>>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        self.check_source(path, &content).map(Some)
    }

    /// Runs every registered rule over one file's tokens.
    fn check_tokens(&self, path: &Path, content: &str) -> Result<Vec<Violation>, InvariantError> {
        let stream = tokenize(content);
        let tokens = stream.tokens();
        let ctx = FileContext::new(path, content, tokens, &self.root, self.tab_width);
        let lines: Vec<&str> = content.lines().collect();
        let mut violations = Vec::new();

        if self.registry.has_kind(RuleKind::Line) {
            for line in source_lines(content) {
                for rule in self.registry.for_kind(RuleKind::Line) {
                    let found = rule.check_line(&ctx, &line)?;
                    violations.extend(self.finalize(rule, &lines, found));
                }
            }
        }

        let mut tracker = DeclarationTracker::new(tokens, self.tab_width);
        for token in tokens {
            if token.kind.is_blank() {
                continue;
            }
            if token.is_significant() {
                if let Some(decl) = tracker.observe(token.index)? {
                    violations.extend(self.dispatch_declaration(&ctx, &lines, &decl)?);
                }
            }
            for rule in self.registry.for_kind(RuleKind::Token) {
                let mut cursor = Cursor::at(tokens, token.index);
                let found = rule.check_token(&ctx, &mut cursor)?;
                cursor.ensure_balanced()?;
                violations.extend(self.finalize(rule, &lines, found));
            }
        }

        Ok(violations)
    }

    fn dispatch_declaration(
        &self,
        ctx: &FileContext<'_>,
        lines: &[&str],
        decl: &ContextNode,
    ) -> Result<Vec<Violation>, InvariantError> {
        let kind = if decl.kind == ContextKind::Function {
            RuleKind::FunctionDeclaration
        } else {
            RuleKind::TypeDeclaration
        };

        let mut violations = Vec::new();
        for rule in self.registry.for_kind(kind) {
            let mut cursor = Cursor::at(ctx.tokens, decl.anchor);
            let found = match kind {
                RuleKind::FunctionDeclaration => rule.check_function(ctx, decl, &mut cursor)?,
                _ => rule.check_type(ctx, decl, &mut cursor)?,
            };
            cursor.ensure_balanced()?;
            violations.extend(self.finalize(rule, lines, found));
        }
        Ok(violations)
    }

    /// Applies severity overrides and allow directives to one rule's findings.
    fn finalize(&self, rule: &dyn Rule, lines: &[&str], found: Vec<Violation>) -> Vec<Violation> {
        let severity = self.config.rule_severity(rule.name(), rule.code());
        let mut kept = Vec::with_capacity(found.len());
        let mut missing_reason = HashSet::new();

        for mut violation in found {
            if let Some(severity) = severity {
                violation.severity = severity;
            }
            let line = violation.location.line;
            match allow_in_lines(lines, line, &[rule.name(), rule.code()]) {
                AllowCheck::Denied => kept.push(violation),
                AllowCheck::Allowed { reason: None }
                    if rule.requires_allow_reason() && missing_reason.insert(line) =>
                {
                    kept.push(
                        Violation::new(
                            rule.code(),
                            rule.name(),
                            Severity::Warning,
                            violation.location,
                            format!("Allow directive for '{}' is missing a reason", rule.name()),
                        )
                        .with_suggestion(Suggestion::new(
                            "Add reason=\"...\" to the cstyle: allow(...) comment",
                        )),
                    );
                }
                AllowCheck::Allowed { .. } => {
                    debug!("Suppressed {} at line {}", rule.name(), line);
                }
            }
        }
        kept
    }

    /// Discovers all source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.has_source_extension(path)
            {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .analyzer
                    .extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/build/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}

/// Splits `content` into lines with their numbers and byte offsets.
fn source_lines(content: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut offset = 0;
    content
        .split_inclusive('\n')
        .enumerate()
        .map(move |(i, raw)| {
            let line = SourceLine {
                number: i + 1,
                text: raw.trim_end_matches('\n').trim_end_matches('\r'),
                offset,
            };
            offset += raw.len();
            line
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::ContextNode;
    use crate::token::TokenKind;

    /// Flags every `goto`.
    struct NoGoto;

    impl Rule for NoGoto {
        fn name(&self) -> &'static str {
            "no-goto"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn triggers(&self) -> &'static [RuleKind] {
            &[RuleKind::Token]
        }
        fn check_token(
            &self,
            ctx: &FileContext<'_>,
            cursor: &mut Cursor<'_>,
        ) -> Result<Vec<Violation>, InvariantError> {
            let Some(token) = cursor.current() else {
                return Ok(Vec::new());
            };
            if token.text != "goto" {
                return Ok(Vec::new());
            }
            Ok(vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                ctx.location(token.index),
                "goto",
            )])
        }
    }

    /// Reports every function definition and every line containing `XXX`.
    struct Recorder;

    impl Rule for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn default_severity(&self) -> Severity {
            Severity::Info
        }
        fn triggers(&self) -> &'static [RuleKind] {
            &[RuleKind::Line, RuleKind::FunctionDeclaration]
        }
        fn check_line(
            &self,
            ctx: &FileContext<'_>,
            line: &SourceLine<'_>,
        ) -> Result<Vec<Violation>, InvariantError> {
            Ok(line
                .text
                .find("XXX")
                .map(|col| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.location_at(line.number, col + 1, 3),
                        "marker",
                    )
                })
                .into_iter()
                .collect())
        }
        fn check_function(
            &self,
            ctx: &FileContext<'_>,
            decl: &ContextNode,
            cursor: &mut Cursor<'_>,
        ) -> Result<Vec<Violation>, InvariantError> {
            assert_eq!(cursor.current().map(|t| t.kind), Some(TokenKind::FunctionName));
            Ok(vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                ctx.location(decl.anchor),
                decl.qualified_name.clone(),
            )])
        }
    }

    /// Leaves a checkpoint behind.
    struct Leaky;

    impl Rule for Leaky {
        fn name(&self) -> &'static str {
            "leaky"
        }
        fn code(&self) -> &'static str {
            "T003"
        }
        fn triggers(&self) -> &'static [RuleKind] {
            &[RuleKind::Token]
        }
        fn check_token(
            &self,
            _ctx: &FileContext<'_>,
            cursor: &mut Cursor<'_>,
        ) -> Result<Vec<Violation>, InvariantError> {
            cursor.checkpoint();
            Ok(Vec::new())
        }
    }

    fn analyzer_with(config: Config) -> Analyzer {
        Analyzer::builder()
            .root(".")
            .rule(NoGoto)
            .rule(Recorder)
            .config(config)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/out/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.tab_width(), 4);
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/third_party/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/build/main.c")));
        assert!(analyzer.should_exclude(Path::new("/foo/third_party/zlib.h")));
        assert!(!analyzer.should_exclude(Path::new("/foo/src/main.c")));
    }

    #[test]
    fn test_check_source_dispatches_all_kinds() {
        let analyzer = analyzer_with(Config::default());
        let source = "void run() {\n    goto done; // XXX\ndone:\n    return;\n}\n";
        let violations = analyzer.check_source("main.c", source).unwrap();
        let summary: Vec<(&str, usize, &str)> = violations
            .iter()
            .map(|v| (v.code.as_str(), v.location.line, v.message.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("T002", 1, "run"),
                ("T001", 2, "goto"),
                ("T002", 2, "marker"),
            ]
        );
    }

    #[test]
    fn test_unbalanced_checkpoint_aborts() {
        let analyzer = Analyzer::builder()
            .root(".")
            .rule(Leaky)
            .build()
            .unwrap();
        let err = analyzer.check_source("a.c", "int x;\n").unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Invariant {
                source: InvariantError::UnbalancedCheckpoint { depth: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_allow_directives() {
        let analyzer = analyzer_with(Config::default());
        let source = "void f() {\n    // cstyle: allow(no-goto) reason=\"state machine\"\n    goto a;\n    goto b; // cstyle: allow(T001)\n    goto c; // NS\n}\n";
        let violations = analyzer.check_source("a.c", source).unwrap();
        let gotos: Vec<_> = violations.iter().filter(|v| v.code == "T001").collect();
        assert_eq!(gotos.len(), 1);
        assert_eq!(gotos[0].location.line, 4);
        assert_eq!(gotos[0].severity, Severity::Warning);
        assert!(gotos[0].message.contains("missing a reason"));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::parse(
            "[rules.no-goto]\nseverity = \"warning\"\n\n[rules.T002]\nenabled = false\n",
        )
        .unwrap();
        let analyzer = analyzer_with(config);
        assert_eq!(analyzer.rule_count(), 1);

        let violations = analyzer.check_source("a.c", "void f() { goto x; }\n").unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
    }

    #[test]
    fn test_source_lines() {
        let lines: Vec<SourceLine<'_>> = source_lines("a\r\nbc\n\nd").collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "a");
        assert_eq!((lines[1].text, lines[1].offset), ("bc", 3));
        assert_eq!((lines[3].number, lines[3].offset), (4, 7));
    }
}
