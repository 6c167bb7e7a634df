//! Inspect command implementation
//!
//! Lists every directive of a settings file and what `apply` would do with
//! it on this machine.

use std::path::Path;

use colored::Colorize;
use sync_directives::{DirectiveReport, MachineFacts, ReportOutcome, Verdict, inspect};
use sync_fs::io;

use crate::error::Result;

/// Run the inspect command
pub fn run_inspect(file: &Path, facts: &MachineFacts, json: bool) -> Result<()> {
    let text = io::read_text(file)?;
    let reports = inspect(&text, facts);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Directives".blue().bold(),
        file.display(),
        facts.os.to_string().cyan()
    );
    println!();

    if reports.is_empty() {
        println!("  {}", "None".dimmed());
        return Ok(());
    }

    for report in &reports {
        let marker = match &report.outcome {
            ReportOutcome::Region { verdict: Some(Verdict::Applies), .. } => "+".green(),
            ReportOutcome::Region { verdict: Some(Verdict::Excluded), .. } => "-".red(),
            ReportOutcome::Region { verdict: None, .. } => "=".blue(),
            ReportOutcome::Region { .. } | ReportOutcome::Skipped { .. } => "!".yellow(),
        };
        println!("  {} {}", marker, describe(report));
    }

    Ok(())
}

/// One line of plain text per directive.
pub fn describe(report: &DirectiveReport) -> String {
    let head = format!("line {}: {}", report.line, report.directive);

    match &report.outcome {
        ReportOutcome::Skipped { reason } => format!("{head} -> skipped ({reason})"),
        ReportOutcome::Region {
            primary_line,
            end_line,
            verdict,
            ..
        } => {
            let lines = if primary_line == end_line {
                format!("line {primary_line}")
            } else {
                format!("lines {primary_line}-{end_line}")
            };
            let action = match verdict {
                None => "kept local".to_string(),
                Some(Verdict::Applies) => "active".to_string(),
                Some(Verdict::Excluded) => "commented out".to_string(),
                Some(Verdict::Unevaluable { token }) => format!("left as is, unknown {token}"),
            };
            format!("{head} -> {action} ({lines})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sync_directives::OsType;

    fn describe_all(text: &str, facts: &MachineFacts) -> Vec<String> {
        inspect(text, facts).iter().map(describe).collect()
    }

    #[test]
    fn test_describe() {
        let text = "{\n// @sync-ignore\n\"k\": 1,\n// @sync os=mac\n\"a\": [\n1\n],\n// @sync os=beos\n\"b\": 2,\n// @sync host=box1\n}";
        let facts = MachineFacts::new(OsType::Linux);

        assert_eq!(
            describe_all(text, &facts),
            vec![
                "line 2: @sync-ignore -> kept local (line 3)",
                "line 4: @sync os=mac -> commented out (lines 5-7)",
                "line 8: @sync os=beos -> left as is, unknown os=beos (line 9)",
                "line 10: @sync host=box1 -> commented out (line 11)",
            ]
        );
    }

    #[test]
    fn test_describe_skipped() {
        let facts = MachineFacts::new(OsType::Mac);
        assert_eq!(
            describe_all("{\n// @sync os=mac", &facts),
            vec!["line 2: @sync os=mac -> skipped (directive has no governed content line)"]
        );
    }
}
