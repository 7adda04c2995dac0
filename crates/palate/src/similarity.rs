use palate_domain::{
    RatingMatrix, SimilarityBasis, SimilarityVector, TargetVector, UserRow, UserSimilarity,
};

use crate::{error::EngineError, utils::similarity::cosine_similarity};

/// Fewest co-rated items for which a cosine score is computed at all.
pub const MIN_COMMON: usize = 3;

pub(crate) fn ensure_same_domain(
    matrix: &RatingMatrix,
    target: &TargetVector,
) -> Result<(), EngineError> {
    if matrix.items() != target.items() {
        return Err(EngineError::ShapeMismatch {
            expected: format!("{} matrix items", matrix.item_count()),
            actual: format!("target over {} differently named items", target.items().len()),
        });
    }
    if target.ratings().len() != target.items().len() {
        return Err(EngineError::ShapeMismatch {
            expected: format!("{} target ratings", target.items().len()),
            actual: format!("{} target ratings", target.ratings().len()),
        });
    }
    Ok(())
}

/// Scores every matrix row against `target` over the items both have rated.
pub fn compute_similarities(
    matrix: &RatingMatrix,
    target: &TargetVector,
    min_common: usize,
) -> Result<SimilarityVector, EngineError> {
    ensure_same_domain(matrix, target)?;

    let entries = matrix
        .rows()
        .iter()
        .map(|row| user_similarity(row, target, min_common))
        .collect();

    Ok(SimilarityVector::new(entries))
}

fn user_similarity(row: &UserRow, target: &TargetVector, min_common: usize) -> UserSimilarity {
    let (ours, theirs): (Vec<f64>, Vec<f64>) = target
        .ratings()
        .iter()
        .zip(row.ratings.iter())
        .filter_map(|(ours, theirs)| Some(((*ours)?, (*theirs)?)))
        .unzip();

    let co_rated = ours.len();
    let (score, basis) = if co_rated < min_common {
        (0.0, SimilarityBasis::InsufficientOverlap)
    } else {
        match cosine_similarity(&ours, &theirs) {
            Some(score) => (score, SimilarityBasis::Cosine),
            None => (0.0, SimilarityBasis::ZeroMagnitude),
        }
    };

    tracing::debug!(user = %row.user, co_rated, score, ?basis, "Computed similarity");

    UserSimilarity {
        user: row.user.clone(),
        score,
        co_rated,
        basis,
    }
}
