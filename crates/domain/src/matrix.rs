use serde::{Deserialize, Serialize};

use crate::{error::DomainError, Rating};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub user: String,
    pub ratings: Vec<Rating>,
}

impl UserRow {
    pub fn new(user: impl Into<String>, ratings: Vec<Rating>) -> Self {
        Self {
            user: user.into(),
            ratings,
        }
    }

    pub fn rated_count(&self) -> usize {
        self.ratings.iter().filter(|r| r.is_some()).count()
    }
}

/// Users (rows) by items (columns). Every row carries exactly one cell per item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatingMatrix {
    items: Vec<String>,
    rows: Vec<UserRow>,
}

impl RatingMatrix {
    pub fn new(items: Vec<String>, rows: Vec<UserRow>) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::NoItems);
        }

        if let Some(row) = rows.iter().find(|row| row.ratings.len() != items.len()) {
            return Err(DomainError::RowWidth {
                user: row.user.clone(),
                expected: items.len(),
                actual: row.ratings.len(),
            });
        }

        Ok(Self { items, rows })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.user.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ratings for a single item, one entry per row in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Rating> + '_ {
        self.rows.iter().map(move |row| row.ratings[index])
    }

    pub fn without_users<S: AsRef<str>>(&self, users: &[S]) -> Self {
        Self {
            items: self.items.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| !users.iter().any(|u| u.as_ref() == row.user))
                .cloned()
                .collect(),
        }
    }

    /// User identifiers that appear on more than one row, in first-seen order.
    pub fn duplicate_users(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for user in self.users() {
            if seen.contains(&user) {
                if !duplicates.contains(&user) {
                    duplicates.push(user);
                }
            } else {
                seen.push(user);
            }
        }
        duplicates
    }
}
