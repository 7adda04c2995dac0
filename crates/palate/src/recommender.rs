use std::sync::Arc;

use palate_domain::{Confidence, PredictionSet, SimilarityVector, TargetRatings};
use palate_source::{RatingSource, RejectedRow};
use serde::Serialize;

use crate::{
    error::EngineError,
    predict::predict,
    similarity::{compute_similarities, MIN_COMMON},
};

/// Everything a single recommendation pass produced.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendations {
    pub source: String,
    pub users: usize,
    pub items: usize,
    pub rejected: Vec<RejectedRow>,
    pub coerced_cells: usize,
    pub rated: usize,
    pub unrated: usize,
    pub unknown_items: Vec<String>,
    pub similarities: SimilarityVector,
    pub predictions: PredictionSet,
}

impl Recommendations {
    pub fn confidence(&self) -> Confidence {
        self.similarities.confidence()
    }
}

#[derive(Clone)]
pub struct Recommender {
    source: Arc<dyn RatingSource>,
    min_common: usize,
    excluded_users: Vec<String>,
}

impl Recommender {
    pub fn builder() -> RecommenderBuilder {
        RecommenderBuilder {
            source: None,
            min_common: MIN_COMMON,
            excluded_users: Vec::new(),
        }
    }

    pub fn min_common(&self) -> usize {
        self.min_common
    }

    pub fn recommend(&self, ratings: &TargetRatings) -> Result<Recommendations, EngineError> {
        let loaded = self.source.load()?;

        let matrix = loaded.matrix.without_users(&self.excluded_users);
        if matrix.len() < loaded.matrix.len() {
            tracing::info!(
                removed = loaded.matrix.len() - matrix.len(),
                "Dropped excluded users from the matrix"
            );
        }
        for user in matrix.duplicate_users() {
            tracing::warn!(%user, "User appears on more than one row");
        }

        tracing::info!(
            users = matrix.len(),
            items = matrix.item_count(),
            "Loaded {} users and {} items",
            matrix.len(),
            matrix.item_count()
        );

        let alignment = ratings.align(matrix.items());
        for item in &alignment.unknown {
            tracing::warn!(%item, "Rated item is not in the matrix, ignoring");
        }
        let target = alignment.target;
        let unrated = target.unrated().count();

        tracing::info!(
            rated = target.rated_count(),
            unrated,
            "Target has rated {} items, {} unrated",
            target.rated_count(),
            unrated
        );

        let similarities = compute_similarities(&matrix, &target, self.min_common)?;
        let predictions = predict(&matrix, &similarities, &target)?;

        let confidence = similarities.confidence();
        tracing::info!(
            predicted = predictions.len(),
            no_data = predictions.no_data().len(),
            positive = confidence.positive,
            total = confidence.total,
            "Computed recommendations"
        );

        Ok(Recommendations {
            source: self.source.describe(),
            users: matrix.len(),
            items: matrix.item_count(),
            rejected: loaded.rejected,
            coerced_cells: loaded.coerced_cells,
            rated: target.rated_count(),
            unrated,
            unknown_items: alignment.unknown,
            similarities,
            predictions,
        })
    }
}

pub struct RecommenderBuilder {
    source: Option<Arc<dyn RatingSource>>,
    min_common: usize,
    excluded_users: Vec<String>,
}

impl RecommenderBuilder {
    pub fn with_source(mut self, source: Arc<dyn RatingSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_min_common(mut self, min_common: usize) -> Self {
        self.min_common = min_common;
        self
    }

    /// Rows with this identifier are dropped before scoring, e.g. the target's own row.
    pub fn with_excluded_user(mut self, user: impl Into<String>) -> Self {
        self.excluded_users.push(user.into());
        self
    }

    pub fn build(self) -> Result<Recommender, EngineError> {
        Ok(Recommender {
            source: self.source.ok_or(EngineError::Incomplete("source"))?,
            min_common: self.min_common,
            excluded_users: self.excluded_users,
        })
    }
}
