//! Directive line parsing.
//!
//! Directives live in line comments inside a JSONC document:
//! ```text
//! // @sync os=linux host=workstation env=WORK_PROFILE
//! // @sync-ignore
//! ```
//!
//! Conditions are order-flexible `key=value` tokens. Tokens with unknown keys
//! are ignored, so a directive with nothing recognizable applies everywhere.

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Matches a whole directive line. The `ignore` group is set for ignore
/// directives (hyphenated or space separated), `conditions` holds the tail of
/// a sync directive.
static DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*//\s*@sync(?:(?:-|[ \t]+)(?P<ignore>ignore)\b|(?:[ \t]+(?P<conditions>.*?))?\s*$)")
        .expect("Invalid directive regex")
});

/// Matches a single `key=value` condition token, tolerating whitespace around `=`.
/// A token starts at the beginning of the text or after a blank.
static CONDITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<lead>^|[ \t])(?P<key>os|host|env)[ \t]*=[ \t]*(?P<value>[^\s=]+)")
        .expect("Invalid condition regex")
});

/// Matches the ignore marker anywhere in a line, not only as a directive.
static IGNORE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//\s*@sync-ignore").expect("Invalid ignore marker regex"));

/// Matches the space separated spelling of the ignore directive.
static IGNORE_SPELLING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<lead>[ \t]*//[ \t]*)@sync[ \t]+ignore\b")
        .expect("Invalid ignore spelling regex")
});

/// Which family a directive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    /// `// @sync ...`, toggled per machine.
    Sync,
    /// `// @sync-ignore`, never uploaded.
    Ignore,
}

/// One `key=value` clause of a sync directive, value kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", content = "value", rename_all = "lowercase")]
pub enum Condition {
    Os(String),
    Host(String),
    Env(String),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os(value) => write!(f, "os={value}"),
            Self::Host(value) => write!(f, "host={value}"),
            Self::Env(value) => write!(f, "env={value}"),
        }
    }
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Conditions in source order. Always empty for ignore directives.
    pub conditions: Vec<Condition>,
}

impl Directive {
    pub fn sync(conditions: Vec<Condition>) -> Self {
        Self {
            kind: DirectiveKind::Sync,
            conditions,
        }
    }

    pub fn ignore() -> Self {
        Self {
            kind: DirectiveKind::Ignore,
            conditions: Vec::new(),
        }
    }

    pub fn is_ignore(&self) -> bool {
        self.kind == DirectiveKind::Ignore
    }
}

/// Renders the canonical directive text without the comment marker.
impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DirectiveKind::Ignore => f.write_str("@sync-ignore"),
            DirectiveKind::Sync => {
                f.write_str("@sync")?;
                for condition in &self.conditions {
                    write!(f, " {condition}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parses a single line as a directive.
///
/// Returns `None` for anything that is not a directive line, including
/// directives trailing other content on the same line.
///
/// # Example
/// ```
/// use sync_directives::directive::{parse_directive, Condition, DirectiveKind};
///
/// let directive = parse_directive("  // @sync os=mac env=WORK").unwrap();
/// assert_eq!(directive.kind, DirectiveKind::Sync);
/// assert_eq!(
///     directive.conditions,
///     vec![Condition::Os("mac".into()), Condition::Env("WORK".into())]
/// );
/// ```
pub fn parse_directive(line: &str) -> Option<Directive> {
    let caps = DIRECTIVE_REGEX.captures(line)?;

    if caps.name("ignore").is_some() {
        return Some(Directive::ignore());
    }

    let conditions = caps
        .name("conditions")
        .map(|tail| parse_conditions(tail.as_str()))
        .unwrap_or_default();

    Some(Directive::sync(conditions))
}

/// Checks whether a line is a directive line of any kind.
pub fn is_directive(line: &str) -> bool {
    DIRECTIVE_REGEX.is_match(line)
}

fn parse_conditions(tail: &str) -> Vec<Condition> {
    CONDITION_REGEX
        .captures_iter(tail)
        .filter_map(|caps| {
            let value = caps["value"].to_string();
            match &caps["key"] {
                "os" => Some(Condition::Os(value)),
                "host" => Some(Condition::Host(value)),
                "env" => Some(Condition::Env(value)),
                _ => None,
            }
        })
        .collect()
}

/// Collapses whitespace around `=` inside condition tokens.
///
/// `// @sync os = linux  host= box` becomes `// @sync os=linux  host=box`.
pub fn normalize_conditions(line: &str) -> Cow<'_, str> {
    CONDITION_REGEX.replace_all(line, "${lead}${key}=${value}")
}

/// Whether the line contains the ignore marker at any position, such as a
/// trailing `"key": 1, // @sync-ignore`.
pub fn carries_ignore_marker(line: &str) -> bool {
    IGNORE_MARKER_REGEX.is_match(line)
}

/// Rewrites `// @sync ignore` into the canonical `// @sync-ignore`.
pub fn normalize_ignore_spelling(document: &str) -> Cow<'_, str> {
    IGNORE_SPELLING_REGEX.replace_all(document, "${lead}@sync-ignore")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directive_display() {
        let directive = parse_directive("  //@sync   host=box1  os=mac").unwrap();
        assert_eq!(directive.to_string(), "@sync host=box1 os=mac");
        assert_eq!(Directive::ignore().to_string(), "@sync-ignore");
    }

    #[test]
    fn test_parse_bare_sync_directive() {
        let directive = parse_directive("// @sync").unwrap();
        assert_eq!(directive, Directive::sync(Vec::new()));
    }

    #[test]
    fn test_parse_conditions_in_any_order() {
        let directive = parse_directive("// @sync env=FOO host=box1 os=linux").unwrap();
        assert_eq!(
            directive.conditions,
            vec![
                Condition::Env("FOO".into()),
                Condition::Host("box1".into()),
                Condition::Os("linux".into()),
            ]
        );
    }

    #[test]
    fn test_parse_tolerates_spaces_around_equals() {
        let directive = parse_directive("//@sync os = mac").unwrap();
        assert_eq!(directive.conditions, vec![Condition::Os("mac".into())]);
    }

    #[test]
    fn test_condition_keys_need_a_leading_blank() {
        let directive = parse_directive("// @sync x-os=linux hostos=mac env=FOO").unwrap();
        assert_eq!(directive.conditions, vec![Condition::Env("FOO".into())]);
    }

    #[test]
    fn test_normalize_conditions_keeps_separators() {
        assert_eq!(
            normalize_conditions("  // @sync os = linux\thost= box x-os = mac"),
            "  // @sync os=linux\thost=box x-os = mac"
        );
    }

    #[test]
    fn test_carries_ignore_marker() {
        assert!(carries_ignore_marker("\"apiKey\": \"secret\", // @sync-ignore"));
        assert!(carries_ignore_marker("\"a\": 1, /* x */ //@sync-ignorex"));
        assert!(!carries_ignore_marker("\"a\": 1, // @sync os=mac"));
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let directive = parse_directive("// @sync shell=zsh").unwrap();
        assert!(directive.conditions.is_empty());
    }

    #[test]
    fn test_parse_ignore_spellings() {
        assert!(parse_directive("// @sync-ignore").unwrap().is_ignore());
        assert!(parse_directive("    //@sync ignore").unwrap().is_ignore());
    }

    #[test]
    fn test_non_directives() {
        assert!(parse_directive("\"theme\": \"dark\", // @sync os=mac").is_none());
        assert!(parse_directive("// @syncing is fun").is_none());
        assert!(parse_directive("// @sync-other").is_none());
        assert!(parse_directive("# @sync os=mac").is_none());
    }

    #[test]
    fn test_crlf_line_is_a_directive() {
        let directive = parse_directive("// @sync os=windows\r").unwrap();
        assert_eq!(directive.conditions, vec![Condition::Os("windows".into())]);
    }

    #[test]
    fn test_normalize_conditions() {
        assert_eq!(
            normalize_conditions("  // @sync os = linux  host=  box1"),
            "  // @sync os=linux  host=box1"
        );
    }

    #[test]
    fn test_normalize_ignore_spelling() {
        let document = "{\n  // @sync ignore\n  \"a\": 1\n}";
        assert_eq!(
            normalize_ignore_spelling(document),
            "{\n  // @sync-ignore\n  \"a\": 1\n}"
        );
    }
}
