//! Comment toggling for governed lines.

use std::borrow::Cow;

/// Line comment marker.
pub const LINE_COMMENT: &str = "//";

/// Prefix written in front of a line when commenting it out.
pub const COMMENT_PREFIX: &str = "  //";

/// Direction of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Comment,
    Uncomment,
}

impl Toggle {
    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match self {
            Self::Comment => comment_line(line),
            Self::Uncomment => uncomment_line(line),
        }
    }
}

/// Whether the line starts with a line comment, ignoring indentation.
pub fn is_commented(line: &str) -> bool {
    line.trim_start().starts_with(LINE_COMMENT)
}

/// Comments a line out unless it already is.
pub fn comment_line(line: &str) -> Cow<'_, str> {
    if is_commented(line) {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(format!("{COMMENT_PREFIX}{line}"))
    }
}

/// Removes one leading line comment marker, if present.
///
/// A line written by [`comment_line`] gets its exact prefix removed, so the
/// original indentation comes back. Hand-commented lines lose only `//`, so a
/// line commented twice by hand needs two calls.
pub fn uncomment_line(line: &str) -> Cow<'_, str> {
    if let Some(rest) = line.strip_prefix(COMMENT_PREFIX) {
        return Cow::Borrowed(rest);
    }

    if !is_commented(line) {
        return Cow::Borrowed(line);
    }

    Cow::Owned(line.replacen(LINE_COMMENT, "", 1))
}

/// Toggles the primary line of region text; the first line is the directive.
fn toggle_region(region: &str, toggle: Toggle) -> String {
    let mut lines: Vec<Cow<'_, str>> = region.split('\n').map(Cow::Borrowed).collect();
    if let Some(primary) = lines.get_mut(1) {
        let toggled = toggle.apply(primary.as_ref()).into_owned();
        *primary = Cow::Owned(toggled);
    }
    lines.join("\n")
}

/// Comments out the primary line of a region.
///
/// # Example
/// ```
/// use sync_directives::toggle::comment;
///
/// assert_eq!(
///     comment("// @sync os=linux\n\"theme\": \"dark\","),
///     "// @sync os=linux\n  //\"theme\": \"dark\","
/// );
/// ```
pub fn comment(region: &str) -> String {
    toggle_region(region, Toggle::Comment)
}

/// Uncomments the primary line of a region.
pub fn uncomment(region: &str) -> String {
    toggle_region(region, Toggle::Uncomment)
}
