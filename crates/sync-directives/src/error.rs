//! Error types for sync-directives

/// Result type for sync-directives operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the directive processor.
///
/// None of these escape [`prepare_for_upload`](crate::prepare_for_upload) or
/// [`apply_on_write`](crate::apply_on_write); those log and carry on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown OS name: {0}")]
    UnknownOs(String),

    #[error("Document is not well-formed after stripping comments: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a candidate directive could not be turned into a region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("directive has no governed content line")]
    MissingContentLine,

    #[error("governed line {line} is itself a directive")]
    DirectiveFollowsDirective { line: usize },

    #[error("block opened with `{open}` is never closed")]
    UnterminatedBlock { open: char },
}
