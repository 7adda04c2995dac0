use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::DomainError, Rating};

/// Known ratings of the user receiving recommendations, keyed by item name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetRatings(BTreeMap<String, f64>);

impl TargetRatings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: impl Into<String>, rating: f64) -> Option<f64> {
        self.0.insert(item.into(), rating)
    }

    pub fn get(&self, item: &str) -> Option<f64> {
        self.0.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(item, rating)| (item.as_str(), *rating))
    }

    /// Lays the ratings out over `items`. Names outside the domain are
    /// returned in `unknown` rather than failing.
    pub fn align(&self, items: &[String]) -> Alignment {
        let target = TargetVector {
            items: items.to_vec(),
            ratings: items.iter().map(|item| self.get(item)).collect(),
        };

        let unknown = self
            .0
            .keys()
            .filter(|name| !items.contains(*name))
            .cloned()
            .collect();

        Alignment { target, unknown }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TargetRatings {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Clone, Debug)]
pub struct Alignment {
    pub target: TargetVector,
    pub unknown: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TargetVectorFields")]
pub struct TargetVector {
    items: Vec<String>,
    ratings: Vec<Rating>,
}

#[derive(Deserialize)]
struct TargetVectorFields {
    items: Vec<String>,
    ratings: Vec<Rating>,
}

impl TryFrom<TargetVectorFields> for TargetVector {
    type Error = DomainError;

    fn try_from(fields: TargetVectorFields) -> Result<Self, Self::Error> {
        TargetVector::new(fields.items, fields.ratings)
    }
}

impl TargetVector {
    pub fn new(items: Vec<String>, ratings: Vec<Rating>) -> Result<Self, DomainError> {
        if items.len() != ratings.len() {
            return Err(DomainError::TargetWidth {
                expected: items.len(),
                actual: ratings.len(),
            });
        }
        Ok(Self { items, ratings })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn rating(&self, index: usize) -> Rating {
        self.ratings.get(index).copied().flatten()
    }

    pub fn rated_count(&self) -> usize {
        self.ratings.iter().filter(|r| r.is_some()).count()
    }

    /// Column indices the target has not rated, in item order.
    pub fn unrated(&self) -> impl Iterator<Item = usize> + '_ {
        self.ratings
            .iter()
            .enumerate()
            .filter_map(|(index, rating)| rating.is_none().then_some(index))
    }
}
