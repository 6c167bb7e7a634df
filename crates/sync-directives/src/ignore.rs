//! Ignore-region extraction and reinsertion.
//!
//! Content under `// @sync-ignore` never leaves the machine: it is dropped
//! before upload, and the local copy is spliced back after every download.

use crate::directive::{
    DirectiveKind, carries_ignore_marker, is_directive, normalize_ignore_spelling, parse_directive,
};
use crate::error::SkipReason;
use crate::scanner::{scan_lines, split_lines};
use std::ops::RangeInclusive;

/// Removes every ignore region from a document.
///
/// A blank line directly after a region goes with it. Malformed ignore
/// directives are removed too: a lone directive is dropped, and an
/// unterminated block is dropped through the end of the document. Any other
/// line carrying the marker, such as `"key": 1, // @sync-ignore`, is removed
/// whole. A sync directive directly above removed lines is dropped as well,
/// since it would otherwise govern whatever follows them.
///
/// # Example
/// ```
/// use sync_directives::ignore::extract;
///
/// let document = "{\n// @sync-ignore\n\"apiKey\": \"secret\",\n\"theme\": \"dark\"\n}";
/// assert_eq!(extract(document), "{\n\"theme\": \"dark\"\n}");
/// ```
pub fn extract(document: &str) -> String {
    let document = normalize_ignore_spelling(document);
    let lines = split_lines(&document);
    let mut removed = vec![false; lines.len()];

    for candidate in scan_lines(&lines, DirectiveKind::Ignore) {
        let range = match candidate {
            Ok(region) => with_separator(&lines, region.line_range()),
            Err(skipped) => {
                tracing::warn!(
                    line = skipped.directive_index + 1,
                    reason = %skipped.reason,
                    "Removing malformed ignore directive"
                );
                match skipped.reason {
                    SkipReason::UnterminatedBlock { .. } => skipped.directive_index..=lines.len() - 1,
                    _ => skipped.directive_index..=skipped.directive_index,
                }
            }
        };
        removed[range].fill(true);
    }

    let marked: Vec<usize> = (0..lines.len())
        .filter(|&index| !removed[index] && carries_ignore_marker(lines[index]))
        .collect();
    for index in marked {
        tracing::warn!(line = index + 1, "Removing line with a trailing ignore marker");
        removed[with_separator(&lines, index..=index)].fill(true);
    }

    drop_orphaned_sync_directives(&lines, &mut removed);

    lines
        .iter()
        .zip(&removed)
        .filter(|(_, removed)| !**removed)
        .map(|(line, _)| *line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extends a removed range over one blank line after it, the separator
/// `reinsert` adds. The final line is never taken so a trailing newline
/// survives.
fn with_separator(lines: &[&str], range: RangeInclusive<usize>) -> RangeInclusive<usize> {
    let (start, end) = range.into_inner();
    let next = end + 1;
    if next + 1 < lines.len() && lines[next].trim().is_empty() {
        start..=next
    } else {
        start..=end
    }
}

fn drop_orphaned_sync_directives(lines: &[&str], removed: &mut [bool]) {
    let run_starts: Vec<usize> = (0..lines.len())
        .filter(|&index| removed[index] && (index == 0 || !removed[index - 1]))
        .collect();

    for start in run_starts {
        let mut index = start;
        while index > 0
            && !removed[index - 1]
            && parse_directive(lines[index - 1]).is_some_and(|d| d.kind == DirectiveKind::Sync)
        {
            index -= 1;
            tracing::warn!(
                line = index + 1,
                "Dropping sync directive whose governed line is local-only"
            );
            removed[index] = true;
        }
    }
}

/// Collects the text of every well-formed ignore region, and every other
/// non-directive line carrying the marker, in document order.
///
/// Returns `None` when the document has nothing local-only.
pub fn capture(document: &str) -> Option<String> {
    let document = normalize_ignore_spelling(document);
    let lines = split_lines(&document);
    let mut covered = vec![false; lines.len()];

    let mut pieces: Vec<(usize, String)> = Vec::new();
    for region in scan_lines(&lines, DirectiveKind::Ignore)
        .into_iter()
        .filter_map(Result::ok)
    {
        covered[region.line_range()].fill(true);
        pieces.push((region.directive_index, region.text(&lines)));
    }

    pieces.extend(
        lines
            .iter()
            .enumerate()
            .filter(|&(index, line)| {
                !covered[index] && !is_directive(line) && carries_ignore_marker(line)
            })
            .map(|(index, line)| (index, line.to_string())),
    );

    if pieces.is_empty() {
        return None;
    }

    pieces.sort_by_key(|(index, _)| *index);
    Some(
        pieces
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Splices captured ignore regions in right after the document's opening brace.
///
/// A blank document becomes an object holding only the captured regions. A
/// document without an opening brace is returned unchanged.
pub fn reinsert(document: &str, captured: &str) -> String {
    if captured.is_empty() {
        return document.to_string();
    }

    if document.trim().is_empty() {
        return format!("{{\n{captured}\n}}\n");
    }

    let Some(brace) = document.find('{') else {
        tracing::warn!("Document has no opening brace; local ignore regions were not reinserted");
        return document.to_string();
    };

    let after = &document[brace + 1..];
    let leading = &after[..after.len() - after.trim_start().len()];
    let rest = match leading.rfind('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };

    format!("{}{{\n{captured}\n\n{rest}", &document[..brace])
}
