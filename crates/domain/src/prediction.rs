use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Similarity-weighted mean over raters with a positive score.
    Weighted { neighbors: usize },
    /// Plain mean over every rater; no rater had a positive score.
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub item: String,
    pub rating: f64,
    pub method: PredictionMethod,
    pub raters: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    predictions: Vec<Prediction>,
    no_data: Vec<String>,
}

impl PredictionSet {
    pub fn new(predictions: Vec<Prediction>, no_data: Vec<String>) -> Self {
        Self {
            predictions,
            no_data,
        }
    }

    /// Predictions in item order.
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Unrated items nobody else rated either.
    pub fn no_data(&self) -> &[String] {
        &self.no_data
    }

    pub fn get(&self, item: &str) -> Option<&Prediction> {
        self.predictions.iter().find(|p| p.item == item)
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Highest predicted rating first. Ties keep item order.
    pub fn ranked(&self) -> Vec<&Prediction> {
        let mut ranked: Vec<_> = self.predictions.iter().collect();
        ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<&Prediction> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(item: &str, rating: f64) -> Prediction {
        Prediction {
            item: item.into(),
            rating,
            method: PredictionMethod::Fallback,
            raters: 1,
        }
    }

    #[test]
    fn ties_keep_item_order() {
        let set = PredictionSet::new(
            vec![
                prediction("Bunz", 7.0),
                prediction("KFC", 8.0),
                prediction("Jollibee", 7.0),
                prediction("Subway", 7.0),
            ],
            Vec::new(),
        );

        let order: Vec<_> = set.ranked().iter().map(|p| p.item.as_str()).collect();
        assert_eq!(order, vec!["KFC", "Bunz", "Jollibee", "Subway"]);
    }

    #[test]
    fn top_truncates_ranked_order() {
        let set = PredictionSet::new(
            vec![prediction("a", 1.0), prediction("b", 3.0), prediction("c", 2.0)],
            vec!["d".into()],
        );

        let top: Vec<_> = set.top(2).iter().map(|p| p.item.as_str()).collect();
        assert_eq!(top, vec!["b", "c"]);
        assert_eq!(set.no_data(), &["d".to_string()]);
        assert!(set.get("d").is_none());
    }

    #[test]
    fn method_serializes_with_a_type_tag() {
        let json = serde_json::to_value(PredictionMethod::Weighted { neighbors: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "weighted", "neighbors": 4}));
    }
}
