use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Row for user '{user}' has {actual} ratings, expected {expected}")]
    RowWidth {
        user: String,
        expected: usize,
        actual: usize,
    },
    #[error("Target vector has {actual} ratings for {expected} items")]
    TargetWidth { expected: usize, actual: usize },
    #[error("Matrix has no item columns")]
    NoItems,
}
