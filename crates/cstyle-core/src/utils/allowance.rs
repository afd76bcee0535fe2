//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // cstyle: allow(operator-spacing) reason="generated table"
//! /* cstyle: allow(all) */
//! ```
//! on the violating line or the line above, and a bare `// NS` marker at the
//! end of a line, which silences every rule on that line.

use std::collections::HashSet;

/// Reason recorded for lines silenced by the `NS` marker.
pub const NS_MARKER_REASON: &str = "NS marker";

/// State of allowance for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowState {
    /// Rule is not allowed (default).
    Denied,
    /// Rule is explicitly allowed.
    Allowed,
}

impl AllowState {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Checks source code for allowance comments, ignoring reasons.
#[must_use]
pub fn check_allow_comment(content: &str, line: usize, rule_name: &str) -> AllowState {
    match check_allow_with_reason(content, line, rule_name) {
        AllowCheck::Allowed { .. } => AllowState::Allowed,
        AllowCheck::Denied => AllowState::Denied,
    }
}

/// Checks source code for allowance comments with reason.
///
/// `line` is 1-indexed. `rule_name` matches either the rule name or its code.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();
    allow_in_lines(&lines, line, &[rule_name])
}

/// Like [`check_allow_with_reason`] over pre-split lines, matching any of `names`.
#[must_use]
pub fn allow_in_lines(lines: &[&str], line: usize, names: &[&str]) -> AllowCheck {
    if line >= 1 && line <= lines.len() && has_ns_marker(lines[line - 1]) {
        return AllowCheck::Allowed {
            reason: Some(NS_MARKER_REASON.to_string()),
        };
    }

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }
        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            let matches = directive.rules.contains("all")
                || names.iter().any(|name| directive.rules.contains(*name));
            if matches {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Text of each comment on the line, without its delimiters.
fn comments(line: &str) -> impl Iterator<Item = &str> {
    line.match_indices("//")
        .chain(line.match_indices("/*"))
        .map(move |(at, _)| {
            let body = &line[at + 2..];
            body.split("*/").next().unwrap_or(body).trim()
        })
}

fn has_ns_marker(line: &str) -> bool {
    line.rfind("//")
        .is_some_and(|at| line[at + 2..].trim() == "NS")
        || line.trim_end().ends_with("/* NS */")
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
struct AllowDirective {
    /// Rule names or codes that are allowed.
    rules: HashSet<String>,
    /// Optional reason for the allowance.
    reason: Option<String>,
}

/// Parses an allowance directive from a comment on the line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    comments(line).find_map(parse_directive_body)
}

fn parse_directive_body(comment: &str) -> Option<AllowDirective> {
    let comment = comment.trim_start_matches(['/', '!', '*']).trim();
    let directive = comment.strip_prefix("cstyle:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest.strip_prefix("reason=").and_then(|reason_part| {
        let quoted = reason_part.trim().strip_prefix('"')?;
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    });

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// cstyle: allow(line-length)").unwrap();
        assert!(directive.rules.contains("line-length"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("/* cstyle: allow(CS002) reason=\"lookup table\" */").unwrap();
        assert!(directive.rules.contains("CS002"));
        assert_eq!(directive.reason, Some("lookup table".to_string()));
    }

    #[test]
    fn test_parse_trailing_directive() {
        let directive =
            parse_allow_directive("int k=b; // cstyle: allow(operator-spacing, CS005)").unwrap();
        assert!(directive.rules.contains("operator-spacing"));
        assert!(directive.rules.contains("CS005"));
    }

    #[test]
    fn test_plain_comments_are_not_directives() {
        assert!(parse_allow_directive("// allow(everything)").is_none());
        assert!(parse_allow_directive("int x; /* cstyle: allow() */").is_none());
        assert!(parse_allow_directive("int x;").is_none());
    }

    #[test]
    fn test_check_allow_comment() {
        let content = "void f() {\n    // cstyle: allow(operator-spacing)\n    k=b;\n}";
        assert_eq!(
            check_allow_comment(content, 3, "operator-spacing"),
            AllowState::Allowed
        );
        assert_eq!(
            check_allow_comment(content, 3, "line-length"),
            AllowState::Denied
        );
        assert_eq!(
            check_allow_comment(content, 4, "operator-spacing"),
            AllowState::Denied
        );
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content = "// cstyle: allow(all) reason=\"vendored\"\nk=b;";
        let result = check_allow_with_reason(content, 2, "anything");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("vendored"));
    }

    #[test]
    fn test_ns_marker() {
        let content = "k=b; // NS\nk=b;\nk=b; // NSA";
        assert_eq!(
            check_allow_with_reason(content, 1, "operator-spacing").reason(),
            Some(NS_MARKER_REASON)
        );
        assert!(!check_allow_with_reason(content, 2, "operator-spacing").is_allowed());
        assert!(!check_allow_with_reason(content, 3, "operator-spacing").is_allowed());
    }

    #[test]
    fn test_allow_in_lines_matches_code_or_name() {
        let lines = ["// cstyle: allow(CS001)", "very long line"];
        assert!(allow_in_lines(&lines, 2, &["line-length", "CS001"]).is_allowed());
        assert!(!allow_in_lines(&lines, 2, &["final-newline", "CS006"]).is_allowed());
    }
}
