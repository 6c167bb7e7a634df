//! Apply command implementation
//!
//! Rewrites the local settings file from a downloaded copy, under the sync
//! lock so that two runs never interleave their read and write.

use std::path::Path;

use colored::Colorize;
use similar::TextDiff;
use sync_directives::{MachineFacts, apply_on_write};
use sync_fs::{SyncLock, io};

use crate::error::Result;

/// Run the apply command
pub fn run_apply(
    local: &Path,
    incoming: &Path,
    facts: &MachineFacts,
    lock_path: &Path,
    dry_run: bool,
) -> Result<()> {
    let incoming_text = io::read_text(incoming)?;

    if dry_run {
        let (current, written) = rewrite(local, &incoming_text, facts)?;
        print_diff(local, &current, &written);
        return Ok(());
    }

    let _lock = SyncLock::acquire(lock_path)?;
    let (current, written) = rewrite(local, &incoming_text, facts)?;

    if written == current {
        println!("{} {} is already up to date", "OK".green().bold(), local.display());
        return Ok(());
    }

    io::write_text(local, &written)?;
    println!(
        "{} Updated {} for {}",
        "OK".green().bold(),
        local.display(),
        describe_machine(facts).cyan()
    );

    Ok(())
}

/// Current local text (empty when the file does not exist yet) and its
/// rewritten replacement.
fn rewrite(local: &Path, incoming: &str, facts: &MachineFacts) -> Result<(String, String)> {
    let current = match io::read_text_if_exists(local)? {
        Some(current) => current,
        None => {
            tracing::info!(path = %local.display(), "Local settings file does not exist yet");
            String::new()
        }
    };

    let written = apply_on_write(&current, incoming, facts);
    Ok((current, written))
}

fn describe_machine(facts: &MachineFacts) -> String {
    match &facts.host_name {
        Some(host) => format!("{} ({host})", facts.os),
        None => facts.os.to_string(),
    }
}

/// Unified diff of the local file before and after the rewrite.
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let name = path.display().to_string();
    let old_header = format!("a/{name}");
    let new_header = format!("b/{name}");

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string()
}

fn print_diff(path: &Path, old: &str, new: &str) {
    if old == new {
        println!("{} No changes needed for {}", "OK".green().bold(), path.display());
        return;
    }

    for line in unified_diff(path, old, new).lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
