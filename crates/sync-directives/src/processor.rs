//! Upload and write pipelines.
//!
//! Both entry points are pure: they take text, return text, and never fail.
//! Problems are logged through `tracing` and the affected region is left as
//! it was found.

use crate::condition::{MachineFacts, Verdict, evaluate, unevaluable_token};
use crate::directive::{DirectiveKind, normalize_conditions};
use crate::ignore;
use crate::sanity::warn_if_malformed;
use crate::scanner::{GuardedRegion, scan_lines, split_lines};
use crate::toggle::Toggle;
use std::borrow::Cow;

/// Produces the canonical remote form of a local document.
///
/// Ignore regions are removed, every evaluable sync region is uncommented,
/// and whitespace around `=` in directive conditions is collapsed.
///
/// # Example
/// ```
/// use sync_directives::prepare_for_upload;
///
/// let local = "{\n// @sync os = linux\n  //\"theme\": \"dark\",\n// @sync-ignore\n\"apiKey\": \"secret\"\n}";
/// assert_eq!(
///     prepare_for_upload(local),
///     "{\n// @sync os=linux\n\"theme\": \"dark\",\n}"
/// );
/// ```
pub fn prepare_for_upload(local: &str) -> String {
    let stripped = ignore::extract(local);

    let result = rewrite_sync_regions(&stripped, true, |region| {
        match unevaluable_token(&region.directive) {
            Some(token) => {
                tracing::debug!(
                    line = region.directive_index + 1,
                    %token,
                    "Leaving region with unknown OS untouched"
                );
                None
            }
            None => Some(Toggle::Uncomment),
        }
    });

    warn_if_malformed(&result, "upload");
    result
}

/// Rewrites a downloaded document for the current machine.
///
/// Sync regions whose conditions fail are commented out, matching ones are
/// uncommented, and the ignore regions of `local` (the file about to be
/// overwritten) are spliced back in after the opening brace.
///
/// # Example
/// ```
/// use sync_directives::{MachineFacts, OsType, apply_on_write};
///
/// let incoming = "// @sync os=linux host=box1\n\"theme\": \"dark\",";
/// let facts = MachineFacts::new(OsType::Mac);
/// assert_eq!(
///     apply_on_write(incoming, incoming, &facts),
///     "// @sync os=linux host=box1\n  //\"theme\": \"dark\","
/// );
/// ```
pub fn apply_on_write(local: &str, incoming: &str, facts: &MachineFacts) -> String {
    let incoming = ignore::extract(incoming);

    let rewritten = rewrite_sync_regions(&incoming, false, |region| {
        let verdict = evaluate(&region.directive, facts);
        tracing::debug!(
            line = region.directive_index + 1,
            ?verdict,
            "Evaluated sync directive"
        );
        match verdict {
            Verdict::Applies => Some(Toggle::Uncomment),
            Verdict::Excluded => Some(Toggle::Comment),
            Verdict::Unevaluable { .. } => None,
        }
    });

    let result = match ignore::capture(local) {
        Some(captured) => ignore::reinsert(&rewritten, &captured),
        None => rewritten,
    };

    warn_if_malformed(&result, "write");
    result
}

/// Applies `decide` to every well-formed sync region and toggles its primary
/// line accordingly. Skipped directives are logged and left untouched.
fn rewrite_sync_regions<F>(document: &str, normalize_directives: bool, mut decide: F) -> String
where
    F: FnMut(&GuardedRegion) -> Option<Toggle>,
{
    let lines = split_lines(document);
    let mut output: Vec<Cow<'_, str>> = lines.iter().copied().map(Cow::Borrowed).collect();

    for candidate in scan_lines(&lines, DirectiveKind::Sync) {
        let region = match candidate {
            Ok(region) => region,
            Err(skipped) => {
                tracing::warn!(
                    line = skipped.directive_index + 1,
                    reason = %skipped.reason,
                    "Skipping malformed sync directive"
                );
                continue;
            }
        };

        if normalize_directives {
            output[region.directive_index] = normalize_conditions(lines[region.directive_index]);
        }

        if let Some(toggle) = decide(&region) {
            let primary = region.primary_index();
            output[primary] = toggle.apply(lines[primary]);
        }
    }

    output.join("\n")
}
