pub mod error;
pub mod validate;

pub use error::{LoadError, RejectReason, RejectedRow};
pub use validate::{parse_cell, Cell, RawRecord, Validator};

use palate_domain::RatingMatrix;
use serde::Serialize;

/// The valid subset of a load, plus what was dropped on the way.
#[derive(Clone, Debug, Serialize)]
pub struct LoadedMatrix {
    pub matrix: RatingMatrix,
    pub rejected: Vec<RejectedRow>,
    pub coerced_cells: usize,
}

pub trait RatingSource: Send + Sync {
    fn describe(&self) -> String;

    fn load(&self) -> Result<LoadedMatrix, LoadError>;
}
