//! Integration test: token walk and file discovery end-to-end via Analyzer.

use cstyle_core::{
    check_alignment, Analyzer, Config, ContextKind, ContextNode, Cursor, FileContext,
    InvariantError, Rule, RuleKind, Severity, TokenKind, Violation,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Reports every misaligned continuation of a function parameter list.
struct ParameterAlignment;

impl Rule for ParameterAlignment {
    fn name(&self) -> &'static str {
        "parameter-alignment"
    }

    fn code(&self) -> &'static str {
        "IT001"
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::FunctionDeclaration]
    }

    fn check_function(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let mut violations = Vec::new();
        if let Some((open, _)) = decl.parameters {
            check_alignment(ctx.tokens, open, ctx.tab_width, |m| {
                violations.push(Violation::new(
                    self.code(),
                    self.name(),
                    self.default_severity(),
                    ctx.location(m.token_index),
                    format!("expected column {}", m.expected_column),
                ));
            })?;
        }
        Ok(violations)
    }
}

/// Reports every class declaration, forward or not.
struct ClassCounter;

impl Rule for ClassCounter {
    fn name(&self) -> &'static str {
        "class-counter"
    }

    fn code(&self) -> &'static str {
        "IT002"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::TypeDeclaration, RuleKind::Token]
    }

    fn check_type(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        if decl.kind != ContextKind::Class {
            return Ok(Vec::new());
        }
        // Speculative look-ahead must leave the cursor where it found it.
        let start = cursor.position();
        let has_body = cursor.speculate(|c| {
            c.advance_to(&[TokenKind::LBrace, TokenKind::Semicolon])
                .is_some_and(|t| t.kind == TokenKind::LBrace)
        })?;
        assert_eq!(cursor.position(), start);
        assert_eq!(has_body, decl.is_definition());

        Ok(vec![Violation::new(
            self.code(),
            self.name(),
            self.default_severity(),
            ctx.location(decl.anchor),
            decl.qualified_name.clone(),
        )])
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, content).expect("write fixture");
}

fn fixture_tree() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path();
    write(
        root,
        "src/widget.cpp",
        "namespace ui {\nclass Widget {\n};\n}\n\nvoid draw(int x,\n        int y);\n",
    );
    write(
        root,
        "src/widget.h",
        "class Gadget;\nvoid place(int x,\n    int y);\n",
    );
    write(root, "build/generated.c", "void skipped(int a,\n int b);\n");
    write(root, "README.md", "class NotCode {};\n");
    dir
}

fn analyzer_for(root: &Path, config: Config) -> Analyzer {
    Analyzer::builder()
        .root(root)
        .config(config)
        .rule(ParameterAlignment)
        .rule(ClassCounter)
        .build()
        .expect("analyzer should build")
}

#[test]
fn analyzes_source_tree() {
    let dir = fixture_tree();
    let analyzer = analyzer_for(dir.path(), Config::default());
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 2);

    let summary: Vec<(String, usize, &str)> = result
        .violations
        .iter()
        .map(|v| {
            (
                v.location.file.display().to_string(),
                v.location.line,
                v.message.as_str(),
            )
        })
        .collect();
    let widget_cpp = Path::new("src").join("widget.cpp").display().to_string();
    let widget_h = Path::new("src").join("widget.h").display().to_string();
    assert_eq!(
        summary,
        vec![
            (widget_cpp.clone(), 2, "ui::Widget"),
            (widget_cpp, 7, "expected column 11"),
            (widget_h, 1, "Gadget"),
        ]
    );
}

#[test]
fn honors_rule_configuration() {
    let dir = fixture_tree();
    let config = Config::parse(
        "[analyzer]\nextensions = [\"h\"]\n\n[rules.class-counter]\nenabled = false\n",
    )
    .expect("config should parse");
    let analyzer = analyzer_for(dir.path(), config);
    assert_eq!(analyzer.rule_count(), 1);

    let result = analyzer.analyze().expect("analysis should succeed");
    assert_eq!(result.files_checked, 1);
    assert!(result.violations.is_empty(), "{:#?}", result.violations);
}

#[test]
fn wider_tab_width_changes_expected_columns() {
    let analyzer = Analyzer::builder()
        .root(".")
        .tab_width(8)
        .rule(ParameterAlignment)
        .build()
        .expect("analyzer should build");

    let aligned = analyzer
        .check_source("a.c", "\tint f(int a,\n\t      int b);\n")
        .expect("check should succeed");
    assert!(aligned.is_empty(), "{aligned:#?}");

    let misaligned = analyzer
        .check_source("a.c", "\tint f(int a,\n\t   int b);\n")
        .expect("check should succeed");
    assert_eq!(misaligned.len(), 1);
    assert_eq!(misaligned[0].message, "expected column 15");
}
