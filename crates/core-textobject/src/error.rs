use crate::pattern::PatternError;
use thiserror::Error;

/// Failures of a textobject request. "Not found" is not among them: searches
/// report it as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextobjectError {
    #[error(
        "`search_method` should be one of 'cover', 'cover_or_next', 'cover_or_prev', 'cover_or_nearest', got '{0}'"
    )]
    InvalidSearchMethod(String),
    #[error("textobject '{id}' is not a valid textobject pattern: {reason}")]
    InvalidTextobjectPattern { id: char, reason: String },
    #[error(
        "could not extract proper positions (two or four empty captures) from '{matched}' with extraction pattern '{pattern}'"
    )]
    InvalidExtraction { matched: String, pattern: String },
    #[error("`ai_type` should be one of 'a' or 'i', got '{0}'")]
    InvalidAiType(String),
    #[error("`side` should be one of 'left' or 'right', got '{0}'")]
    InvalidSide(String),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

pub type Result<T> = std::result::Result<T, TextobjectError>;
