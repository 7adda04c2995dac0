use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBasis {
    Cosine,
    /// Fewer co-rated items than the configured minimum; score is 0.
    InsufficientOverlap,
    /// One side rated every shared item 0; score is 0.
    ZeroMagnitude,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSimilarity {
    pub user: String,
    pub score: f64,
    pub co_rated: usize,
    pub basis: SimilarityBasis,
}

impl UserSimilarity {
    pub fn is_positive(&self) -> bool {
        self.score > 0.0
    }
}

/// One entry per matrix row, in row order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityVector(Vec<UserSimilarity>);

impl SimilarityVector {
    pub fn new(entries: Vec<UserSimilarity>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[UserSimilarity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn score(&self, row: usize) -> Option<f64> {
        self.0.get(row).map(|entry| entry.score)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserSimilarity> {
        self.0.iter()
    }

    /// Highest score first. Equal scores keep row order.
    pub fn ranked(&self) -> Vec<&UserSimilarity> {
        let mut ranked: Vec<_> = self.0.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<&UserSimilarity> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    pub fn confidence(&self) -> Confidence {
        let positive: Vec<f64> = self
            .0
            .iter()
            .filter(|entry| entry.is_positive())
            .map(|entry| entry.score)
            .collect();

        Confidence {
            mean_positive: (!positive.is_empty())
                .then(|| positive.iter().sum::<f64>() / positive.len() as f64),
            positive: positive.len(),
            total: self.0.len(),
        }
    }
}

impl<'a> IntoIterator for &'a SimilarityVector {
    type Item = &'a UserSimilarity;
    type IntoIter = std::slice::Iter<'a, UserSimilarity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub mean_positive: Option<f64>,
    pub positive: usize,
    pub total: usize,
}
