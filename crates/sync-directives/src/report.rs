//! Read-only directive reports.
//!
//! Describes what the processor would do with each directive of a document
//! without rewriting anything.

use crate::condition::{MachineFacts, Verdict, evaluate};
use crate::directive::{Directive, DirectiveKind};
use crate::scanner::{Bracket, scan_lines, split_lines};
use serde::Serialize;

/// One directive found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveReport {
    /// 1-based line of the directive.
    pub line: usize,
    pub directive: Directive,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReportOutcome {
    Region {
        /// 1-based line that gets toggled.
        primary_line: usize,
        /// 1-based last governed line.
        end_line: usize,
        extension: Option<Bracket>,
        /// `None` for ignore regions, which are never evaluated.
        verdict: Option<Verdict>,
    },
    Skipped {
        reason: String,
    },
}

/// Lists every directive of both families in line order.
pub fn inspect(document: &str, facts: &MachineFacts) -> Vec<DirectiveReport> {
    let lines = split_lines(document);

    let mut reports: Vec<DirectiveReport> = [DirectiveKind::Sync, DirectiveKind::Ignore]
        .into_iter()
        .flat_map(|kind| scan_lines(&lines, kind))
        .map(|candidate| match candidate {
            Ok(region) => {
                let verdict = match region.directive.kind {
                    DirectiveKind::Sync => Some(evaluate(&region.directive, facts)),
                    DirectiveKind::Ignore => None,
                };
                DirectiveReport {
                    line: region.directive_index + 1,
                    outcome: ReportOutcome::Region {
                        primary_line: region.primary_index() + 1,
                        end_line: region.end_index + 1,
                        extension: region.extension,
                        verdict,
                    },
                    directive: region.directive,
                }
            }
            Err(skipped) => DirectiveReport {
                line: skipped.directive_index + 1,
                directive: skipped.directive,
                outcome: ReportOutcome::Skipped {
                    reason: skipped.reason.to_string(),
                },
            },
        })
        .collect();

    reports.sort_by_key(|report| report.line);
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::OsType;
    use crate::directive::Condition;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inspect_mixed_document() {
        let document = "{\n// @sync-ignore\n\"k\": 1,\n// @sync os=mac\n\"a\": [\n1\n],\n// @sync\n}";
        let reports = inspect(document, &MachineFacts::new(OsType::Mac));

        assert_eq!(
            reports,
            vec![
                DirectiveReport {
                    line: 2,
                    directive: Directive::ignore(),
                    outcome: ReportOutcome::Region {
                        primary_line: 3,
                        end_line: 3,
                        extension: None,
                        verdict: None,
                    },
                },
                DirectiveReport {
                    line: 4,
                    directive: Directive::sync(vec![Condition::Os("mac".into())]),
                    outcome: ReportOutcome::Region {
                        primary_line: 5,
                        end_line: 7,
                        extension: Some(Bracket::Array),
                        verdict: Some(Verdict::Applies),
                    },
                },
                DirectiveReport {
                    line: 8,
                    directive: Directive::sync(Vec::new()),
                    outcome: ReportOutcome::Region {
                        primary_line: 9,
                        end_line: 9,
                        extension: None,
                        verdict: Some(Verdict::Applies),
                    },
                },
            ]
        );
    }

    #[test]
    fn test_inspect_reports_skips() {
        let reports = inspect("// @sync os=mac", &MachineFacts::new(OsType::Linux));
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].outcome,
            ReportOutcome::Skipped {
                reason: "directive has no governed content line".into()
            }
        );
    }

    #[test]
    fn test_report_serializes_flat() {
        let reports = inspect("// @sync os=plan9\n\"a\": 1", &MachineFacts::new(OsType::Linux));
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["line"], 1);
        assert_eq!(json["outcome"], "region");
        assert_eq!(json["verdict"]["verdict"], "unevaluable");
        assert_eq!(json["verdict"]["token"], "os=plan9");
    }
}
