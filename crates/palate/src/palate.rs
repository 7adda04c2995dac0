//! User-based collaborative filtering over a sparse user × item rating matrix.
//!
//! [`compute_similarities`] scores every other user against the target over
//! the items both have rated, and [`predict`] turns those scores into ratings
//! for the items the target has not rated yet. [`Recommender`] wires a
//! [`RatingSource`](palate_source::RatingSource) to both.

pub mod error;
pub mod predict;
pub mod recommender;
pub mod similarity;
mod utils;

pub use error::EngineError;
pub use predict::predict;
pub use recommender::{Recommendations, Recommender, RecommenderBuilder};
pub use similarity::{compute_similarities, MIN_COMMON};
pub use utils::similarity::cosine_similarity;
