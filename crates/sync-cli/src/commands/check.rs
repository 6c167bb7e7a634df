//! Check command implementation

use std::path::Path;

use colored::Colorize;
use sync_directives::{DirectiveKind, check_document, find_regions};
use sync_fs::io;

use crate::error::{CliError, Result};

/// Run the check command
///
/// Fails when the document does not parse once comments and trailing commas
/// are stripped. Malformed directives are listed but do not fail the check.
pub fn run_check(file: &Path) -> Result<()> {
    let text = io::read_text(file)?;

    check_document(&text).map_err(|source| CliError::Malformed {
        path: file.to_path_buf(),
        source,
    })?;

    let skipped = skipped_directives(&text);
    for (line, reason) in &skipped {
        println!("  {} line {}: {}", "!".yellow(), line, reason);
    }

    println!("{} {} is well-formed", "OK".green().bold(), file.display());
    if !skipped.is_empty() {
        println!(
            "{} {} directive(s) will be skipped",
            "Warning:".yellow().bold(),
            skipped.len()
        );
    }

    Ok(())
}

/// 1-based line and reason of every directive that does not form a region.
fn skipped_directives(text: &str) -> Vec<(usize, String)> {
    let mut skipped: Vec<_> = [DirectiveKind::Sync, DirectiveKind::Ignore]
        .into_iter()
        .flat_map(|kind| find_regions(text, kind))
        .filter_map(std::result::Result::err)
        .map(|skip| (skip.directive_index + 1, skip.reason.to_string()))
        .collect();
    skipped.sort();
    skipped
}
