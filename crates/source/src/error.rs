use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Missing header row")]
    MissingHeader,
    #[error("Header has no item columns")]
    NoItems,
    #[error("Duplicate item column '{0}'")]
    DuplicateItem(String),
    #[error("No rows could be loaded ({rejected} rejected)")]
    NoRows { rejected: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("unreadable record: {message}")]
    Unreadable { message: String },
    #[error("expected at most {expected} fields, found {actual}")]
    TooManyFields { expected: usize, actual: usize },
    #[error("missing user identifier")]
    MissingUser,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedRow {
    /// 1-based line in the source, header included.
    pub line: u64,
    pub reason: RejectReason,
}
