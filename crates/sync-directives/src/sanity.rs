//! Document sanity checking.
//!
//! An early warning only: the processed text is handed back to the caller
//! whether or not it parses.

use crate::error::{Error, Result};
use serde_json::Value;

/// Strips comments and trailing commas from JSONC text.
///
/// Comment markers inside string literals are left alone. Newlines inside
/// block comments are kept so that parse errors still point at the right line.
///
/// # Example
/// ```
/// use sync_directives::sanity::strip_jsonc;
///
/// let text = "{\n  // note\n  \"url\": \"http://a\", /* x */\n}";
/// assert_eq!(strip_jsonc(text), "{\n  \n  \"url\": \"http://a\" \n}");
/// ```
pub fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            '}' | ']' => {
                if let Some(comma) = pending_comma.take() {
                    out.remove(comma);
                }
                out.push(c);
            }
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                if c == '"' {
                    in_string = true;
                }
                out.push(c);
            }
        }
    }

    out
}

/// Checks that a document parses once comments and trailing commas are gone.
///
/// # Errors
/// Returns `Error::Malformed` with the parser's diagnostic.
pub fn check_document(document: &str) -> Result<()> {
    serde_json::from_str::<Value>(&strip_jsonc(document))
        .map(|_| ())
        .map_err(Error::Malformed)
}

/// Runs [`check_document`] and logs a warning on failure.
///
/// Returns whether the document was well-formed.
pub fn warn_if_malformed(document: &str, stage: &str) -> bool {
    match check_document(document) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(stage = %stage, "Processed settings are not valid JSON: {}", e);
            false
        }
    }
}
