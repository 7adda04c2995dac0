use palate_domain::{
    Prediction, PredictionMethod, PredictionSet, RatingMatrix, SimilarityVector, TargetVector,
};

use crate::{error::EngineError, similarity::ensure_same_domain};

/// Predicts a rating for every item `target` has not rated.
///
/// Raters with a positive similarity contribute a similarity-weighted mean.
/// When none of an item's raters is positive the plain mean of all its raters
/// is used instead. Items nobody rated are listed in [`PredictionSet::no_data`].
pub fn predict(
    matrix: &RatingMatrix,
    similarities: &SimilarityVector,
    target: &TargetVector,
) -> Result<PredictionSet, EngineError> {
    ensure_same_domain(matrix, target)?;

    if similarities.len() != matrix.len()
        || similarities
            .iter()
            .zip(matrix.users())
            .any(|(entry, user)| entry.user != user)
    {
        return Err(EngineError::ShapeMismatch {
            expected: format!("{} similarity scores in matrix row order", matrix.len()),
            actual: format!("{} similarity scores", similarities.len()),
        });
    }

    let mut predictions = Vec::new();
    let mut no_data = Vec::new();

    let unrated = matrix
        .items()
        .iter()
        .enumerate()
        .filter(|(index, _)| target.rating(*index).is_none());

    for (index, item) in unrated {
        let raters: Vec<(f64, f64)> = matrix
            .column(index)
            .zip(similarities.iter())
            .filter_map(|(rating, entry)| rating.map(|rating| (rating, entry.score)))
            .collect();

        match predict_item(&raters) {
            Some((rating, method)) => predictions.push(Prediction {
                item: item.clone(),
                rating,
                method,
                raters: raters.len(),
            }),
            None => {
                tracing::debug!(%item, "No ratings for item");
                no_data.push(item.clone());
            }
        }
    }

    Ok(PredictionSet::new(predictions, no_data))
}

fn predict_item(raters: &[(f64, f64)]) -> Option<(f64, PredictionMethod)> {
    if raters.is_empty() {
        return None;
    }

    let (weighted_sum, weight_sum, neighbors) = raters
        .iter()
        .filter(|(_, similarity)| *similarity > 0.0)
        .fold((0.0, 0.0, 0usize), |(sum, weights, count), (rating, similarity)| {
            (sum + rating * similarity, weights + similarity, count + 1)
        });

    if neighbors > 0 {
        return Some((
            weighted_sum / weight_sum,
            PredictionMethod::Weighted { neighbors },
        ));
    }

    let mean = raters.iter().map(|(rating, _)| rating).sum::<f64>() / raters.len() as f64;
    Some((mean, PredictionMethod::Fallback))
}
