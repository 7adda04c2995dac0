use palate_source::{LoadError, LoadedMatrix, RatingSource, RawRecord, Validator};

/// Ratings table held in memory, validated the same way a file would be.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[allow(unused)]
impl InMemorySource {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RatingSource for InMemorySource {
    fn describe(&self) -> String {
        format!("in-memory table ({} rows)", self.rows.len())
    }

    fn load(&self) -> Result<LoadedMatrix, LoadError> {
        let mut validator = Validator::from_header(&self.header)?;

        for (index, row) in self.rows.iter().enumerate() {
            validator.push(RawRecord::Fields {
                line: index as u64 + 2,
                fields: row.clone(),
            });
        }

        let loaded = validator.finish()?;
        tracing::debug!(
            users = loaded.matrix.len(),
            rejected = loaded.rejected.len(),
            "Loaded in-memory ratings"
        );
        Ok(loaded)
    }
}
