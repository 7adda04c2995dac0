use palate_source::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Recommender is missing its {0}")]
    Incomplete(&'static str),
}
