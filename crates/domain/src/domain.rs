pub mod error;
pub mod matrix;
pub mod prediction;
pub mod similarity;
pub mod target;

pub use error::DomainError;
pub use matrix::{RatingMatrix, UserRow};
pub use prediction::{Prediction, PredictionMethod, PredictionSet};
pub use similarity::{Confidence, SimilarityBasis, SimilarityVector, UserSimilarity};
pub use target::{Alignment, TargetRatings, TargetVector};

/// A single cell of the rating matrix. `None` means the user has not rated the item.
pub type Rating = Option<f64>;
