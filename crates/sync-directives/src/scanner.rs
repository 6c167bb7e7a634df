//! Region scanning.
//!
//! Walks a document line by line and turns each directive of the requested
//! family into a [`GuardedRegion`], or a [`SkippedDirective`] when the
//! directive is malformed.
//!
//! ```text
//! Scanning --directive--> InRegion --opens { or [--> InExtendedRegion
//!    ^                       |                             |
//!    +------ primary line ---+------- closing token -------+
//! ```
//!
//! Extension stops at the first line containing a closing bracket of the same
//! family, without counting depth. A nested object inside an object-valued
//! region therefore ends the region early.

use crate::directive::{Directive, DirectiveKind, is_directive, parse_directive};
use crate::error::SkipReason;
use regex::Regex;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Matches `"key": {` or `"key": [` and captures the bracket.
static OPENER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"\s*:\s*(?P<open>[{\[])"#).expect("Invalid opener regex")
});

/// Bracket family of an extended region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bracket {
    Object,
    Array,
}

impl Bracket {
    pub fn open(&self) -> char {
        match self {
            Self::Object => '{',
            Self::Array => '[',
        }
    }

    pub fn close(&self) -> char {
        match self {
            Self::Object => '}',
            Self::Array => ']',
        }
    }

    fn from_open(c: &str) -> Option<Self> {
        match c {
            "{" => Some(Self::Object),
            "[" => Some(Self::Array),
            _ => None,
        }
    }
}

/// A directive line plus the lines it governs.
///
/// All indices are 0-based line indices into the scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedRegion {
    pub directive: Directive,
    pub directive_index: usize,
    /// Offset from the directive line to the single line that gets toggled.
    /// Lines of an extended region past this one are never toggled.
    pub primary_line_offset: usize,
    /// Last governed line, inclusive.
    pub end_index: usize,
    pub extension: Option<Bracket>,
}

impl GuardedRegion {
    pub fn primary_index(&self) -> usize {
        self.directive_index + self.primary_line_offset
    }

    pub fn line_range(&self) -> RangeInclusive<usize> {
        self.directive_index..=self.end_index
    }

    /// The region's text, directive line included.
    pub fn text(&self, lines: &[&str]) -> String {
        lines[self.line_range()].join("\n")
    }
}

/// A directive that could not be resolved into a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirective {
    pub directive: Directive,
    pub directive_index: usize,
    pub reason: SkipReason,
}

/// Either a resolved region or the reason its directive was skipped.
pub type RegionCandidate = Result<GuardedRegion, SkippedDirective>;

enum ScanState {
    Scanning,
    InRegion {
        directive: Directive,
        start: usize,
    },
    InExtendedRegion {
        directive: Directive,
        start: usize,
        bracket: Bracket,
    },
}

/// Splits a document into lines, keeping `\r` on CRLF lines so that joining
/// with `\n` restores the input byte for byte.
pub fn split_lines(document: &str) -> Vec<&str> {
    document.split('\n').collect()
}

/// Scans lines for directives of one family.
///
/// Directives of the other family are treated as plain content, except that a
/// directive never counts as a governed line. After a skip, scanning resumes
/// on the line following the skipped directive.
pub fn scan_lines(lines: &[&str], kind: DirectiveKind) -> Vec<RegionCandidate> {
    let mut candidates = Vec::new();
    let mut state = ScanState::Scanning;
    let mut index = 0;

    loop {
        let line = lines.get(index).copied();
        state = match (state, line) {
            (ScanState::Scanning, None) => break,
            (ScanState::Scanning, Some(line)) => {
                index += 1;
                match parse_directive(line) {
                    Some(directive) if directive.kind == kind => ScanState::InRegion {
                        directive,
                        start: index - 1,
                    },
                    _ => ScanState::Scanning,
                }
            }
            (ScanState::InRegion { directive, start }, None) => {
                candidates.push(Err(SkippedDirective {
                    directive,
                    directive_index: start,
                    reason: SkipReason::MissingContentLine,
                }));
                break;
            }
            (ScanState::InRegion { directive, start }, Some(line)) => {
                if is_directive(line) {
                    candidates.push(Err(SkippedDirective {
                        directive,
                        directive_index: start,
                        reason: SkipReason::DirectiveFollowsDirective { line: index + 1 },
                    }));
                    // Re-read this line as a potential directive.
                    ScanState::Scanning
                } else if let Some(bracket) = opened_bracket(line) {
                    index += 1;
                    ScanState::InExtendedRegion {
                        directive,
                        start,
                        bracket,
                    }
                } else {
                    candidates.push(Ok(GuardedRegion {
                        directive,
                        directive_index: start,
                        primary_line_offset: 1,
                        end_index: index,
                        extension: None,
                    }));
                    index += 1;
                    ScanState::Scanning
                }
            }
            (ScanState::InExtendedRegion { directive, start, bracket }, None) => {
                candidates.push(Err(SkippedDirective {
                    directive,
                    directive_index: start,
                    reason: SkipReason::UnterminatedBlock {
                        open: bracket.open(),
                    },
                }));
                index = start + 1;
                ScanState::Scanning
            }
            (ScanState::InExtendedRegion { directive, start, bracket }, Some(line)) => {
                index += 1;
                if line.contains(bracket.close()) {
                    candidates.push(Ok(GuardedRegion {
                        directive,
                        directive_index: start,
                        primary_line_offset: 1,
                        end_index: index - 1,
                        extension: Some(bracket),
                    }));
                    ScanState::Scanning
                } else {
                    ScanState::InExtendedRegion {
                        directive,
                        start,
                        bracket,
                    }
                }
            }
        };
    }

    candidates
}

/// Scans a whole document for directives of one family.
pub fn find_regions(document: &str, kind: DirectiveKind) -> Vec<RegionCandidate> {
    scan_lines(&split_lines(document), kind)
}

/// Returns the text of every resolved region of one family, in order.
///
/// # Example
/// ```
/// use sync_directives::directive::DirectiveKind;
/// use sync_directives::scanner::region_texts;
///
/// let document = "{\n  // @sync os=mac\n  \"a\": [\n    1\n  ],\n  \"b\": 2\n}";
/// assert_eq!(
///     region_texts(document, DirectiveKind::Sync),
///     vec!["  // @sync os=mac\n  \"a\": [\n    1\n  ],"]
/// );
/// ```
pub fn region_texts(document: &str, kind: DirectiveKind) -> Vec<String> {
    let lines = split_lines(document);
    scan_lines(&lines, kind)
        .into_iter()
        .filter_map(Result::ok)
        .map(|region| region.text(&lines))
        .collect()
}

/// The bracket a line leaves open after a quoted key, if any.
///
/// A value opened and closed on the same line does not extend the region.
fn opened_bracket(line: &str) -> Option<Bracket> {
    let caps = OPENER_REGEX.captures(line)?;
    let open = caps.name("open")?;
    let bracket = Bracket::from_open(open.as_str())?;

    if line[open.end()..].contains(bracket.close()) {
        None
    } else {
        Some(bracket)
    }
}
