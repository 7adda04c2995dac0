use palate_domain::{Rating, RatingMatrix, UserRow};

use crate::{
    error::{LoadError, RejectReason, RejectedRow},
    LoadedMatrix,
};

/// A record as produced by the permissive first stage of a load.
#[derive(Clone, Debug)]
pub enum RawRecord {
    Fields { line: u64, fields: Vec<String> },
    Unreadable { line: u64, message: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    Rating(f64),
    Missing,
    /// Present but not a finite number; treated as missing.
    Coerced,
}

impl Cell {
    pub fn rating(self) -> Rating {
        match self {
            Cell::Rating(value) => Some(value),
            Cell::Missing | Cell::Coerced => None,
        }
    }
}

const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "-"];

pub fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Cell::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Rating(value),
        _ => Cell::Coerced,
    }
}

/// Second stage of a load: checks each raw record against the header and
/// keeps the rows that pass. Never aborts on a single bad row.
#[derive(Debug)]
pub struct Validator {
    items: Vec<String>,
    rows: Vec<UserRow>,
    rejected: Vec<RejectedRow>,
    coerced_cells: usize,
}

impl Validator {
    pub fn from_header<I, S>(header: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = header.into_iter();
        if fields.next().is_none() {
            return Err(LoadError::MissingHeader);
        }

        let mut items: Vec<String> = Vec::new();
        for field in fields {
            let item = field.as_ref().trim().to_string();
            if items.contains(&item) {
                return Err(LoadError::DuplicateItem(item));
            }
            items.push(item);
        }

        if items.is_empty() {
            return Err(LoadError::NoItems);
        }

        Ok(Self {
            items,
            rows: Vec::new(),
            rejected: Vec::new(),
            coerced_cells: 0,
        })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn push(&mut self, record: RawRecord) {
        match record {
            RawRecord::Unreadable { line, message } => {
                self.reject(line, RejectReason::Unreadable { message })
            }
            RawRecord::Fields { line, fields } => self.push_fields(line, fields),
        }
    }

    fn push_fields(&mut self, line: u64, fields: Vec<String>) {
        let expected = self.items.len() + 1;
        if fields.len() > expected {
            return self.reject(
                line,
                RejectReason::TooManyFields {
                    expected,
                    actual: fields.len(),
                },
            );
        }

        let mut fields = fields.into_iter();
        let user = match fields.next().map(|u| u.trim().to_string()) {
            Some(user) if !user.is_empty() => user,
            _ => return self.reject(line, RejectReason::MissingUser),
        };

        let mut ratings: Vec<Rating> = Vec::with_capacity(self.items.len());
        for raw in fields {
            let cell = parse_cell(&raw);
            if cell == Cell::Coerced {
                tracing::debug!(line, %user, value = %raw, "Coercing non-numeric cell to missing");
                self.coerced_cells += 1;
            }
            ratings.push(cell.rating());
        }

        if ratings.len() < self.items.len() {
            tracing::debug!(
                line,
                %user,
                fields = ratings.len(),
                "Short row, padding with missing ratings"
            );
            ratings.resize(self.items.len(), None);
        }

        self.rows.push(UserRow::new(user, ratings));
    }

    fn reject(&mut self, line: u64, reason: RejectReason) {
        tracing::warn!(line, %reason, "Skipping row");
        self.rejected.push(RejectedRow { line, reason });
    }

    pub fn finish(self) -> Result<LoadedMatrix, LoadError> {
        if self.rows.is_empty() {
            return Err(LoadError::NoRows {
                rejected: self.rejected.len(),
            });
        }

        let matrix = RatingMatrix::new(self.items, self.rows)
            .map_err(|e| LoadError::Parse(e.to_string()))?;

        Ok(LoadedMatrix {
            matrix,
            rejected: self.rejected,
            coerced_cells: self.coerced_cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn fields(line: u64, values: &[&str]) -> RawRecord {
        RawRecord::Fields {
            line,
            fields: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn parse_cell_handles_markers_and_garbage() {
        assert_eq!(parse_cell(" 7.5 "), Cell::Rating(7.5));
        assert_eq!(parse_cell(""), Cell::Missing);
        assert_eq!(parse_cell("NaN"), Cell::Missing);
        assert_eq!(parse_cell("n/a"), Cell::Missing);
        assert_eq!(parse_cell("great"), Cell::Coerced);
        assert_eq!(parse_cell("inf"), Cell::Coerced);
    }

    #[test]
    fn header_needs_items() {
        assert!(matches!(
            Validator::from_header(["User"]),
            Err(LoadError::NoItems)
        ));
        assert!(matches!(
            Validator::from_header(Vec::<String>::new()),
            Err(LoadError::MissingHeader)
        ));
        assert!(matches!(
            Validator::from_header(["User", "KFC", " KFC"]),
            Err(LoadError::DuplicateItem(item)) if item == "KFC"
        ));
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let mut validator = Validator::from_header(["User", "KFC", "Bunz"]).unwrap();
        validator.push(fields(2, &["ana", "8", "7"]));
        validator.push(fields(3, &["ben", "8", "7", "6"]));
        validator.push(fields(4, &["", "1", "2"]));
        validator.push(RawRecord::Unreadable {
            line: 5,
            message: "invalid utf-8".into(),
        });
        validator.push(fields(6, &["cy", "tasty", ""]));
        validator.push(fields(7, &["dee", "4"]));

        let loaded = validator.finish().unwrap();

        assert_eq!(
            loaded.matrix.users().collect::<Vec<_>>(),
            vec!["ana", "cy", "dee"]
        );
        assert_eq!(
            loaded.rejected.iter().map(|r| r.line).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        assert_eq!(
            loaded.rejected[0].reason,
            RejectReason::TooManyFields {
                expected: 3,
                actual: 4
            }
        );
        assert_eq!(loaded.coerced_cells, 1);
        assert_eq!(loaded.matrix.rows()[1].ratings, vec![None, None]);
        assert_eq!(loaded.matrix.rows()[2].ratings, vec![Some(4.0), None]);
    }

    #[test]
    fn no_surviving_rows_is_fatal() {
        let mut validator = Validator::from_header(["User", "KFC"]).unwrap();
        validator.push(fields(2, &["", "3"]));

        assert!(matches!(
            validator.finish(),
            Err(LoadError::NoRows { rejected: 1 })
        ));
    }

    proptest! {
        #[test]
        fn finite_numbers_always_parse(value in -1.0e6f64..1.0e6) {
            prop_assert_eq!(parse_cell(&value.to_string()), Cell::Rating(value));
        }
    }
}
