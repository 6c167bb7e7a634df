//! Prepare command implementation
//!
//! Produces the form of a settings file that is safe to upload.

use std::path::Path;

use colored::Colorize;
use sync_directives::prepare_for_upload;
use sync_fs::io;

use crate::error::Result;

/// Run the prepare command
///
/// Prints the upload form to stdout, or writes it to `output`.
pub fn run_prepare(file: &Path, output: Option<&Path>) -> Result<()> {
    let local = io::read_text(file)?;
    let remote = prepare_for_upload(&local);

    match output {
        Some(output) => {
            io::write_text(output, &remote)?;
            println!(
                "{} Wrote upload form of {} to {}",
                "OK".green().bold(),
                file.display(),
                output.display().to_string().cyan()
            );
        }
        None => print!("{remote}"),
    }

    Ok(())
}
