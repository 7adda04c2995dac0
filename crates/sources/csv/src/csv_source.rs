use std::{
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use palate_source::{LoadError, LoadedMatrix, RatingSource, RawRecord, Validator};

pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<LoadedMatrix, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header = reader.headers().map_err(csv_error)?.clone();
        let mut validator = Validator::from_header(header.iter())?;

        let mut record = ByteRecord::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(false) => break,
                Ok(true) => validator.push(decode(&record)),
                Err(e) if e.is_io_error() => return Err(csv_error(e)),
                Err(e) => validator.push(RawRecord::Unreadable {
                    line: e.position().map(|p| p.line()).unwrap_or_default(),
                    message: e.to_string(),
                }),
            }
        }

        validator.finish()
    }
}

fn decode(record: &ByteRecord) -> RawRecord {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    match StringRecord::from_byte_record(record.clone()) {
        Ok(fields) => RawRecord::Fields {
            line,
            fields: fields.iter().map(str::to_owned).collect(),
        },
        Err(e) => RawRecord::Unreadable {
            line,
            message: e.to_string(),
        },
    }
}

fn csv_error(e: csv::Error) -> LoadError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => LoadError::Io(io),
            other => LoadError::Parse(format!("{other:?}")),
        }
    } else {
        LoadError::Parse(e.to_string())
    }
}

impl RatingSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<LoadedMatrix, LoadError> {
        let file = std::fs::File::open(&self.path)?;
        let loaded = self.load_from_reader(file)?;

        tracing::info!(
            path = %self.path.display(),
            users = loaded.matrix.len(),
            items = loaded.matrix.item_count(),
            rejected = loaded.rejected.len(),
            coerced_cells = loaded.coerced_cells,
            "Loaded ratings"
        );

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use palate_source::RejectReason;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn loads_a_sparse_table() {
        let data = indoc! {"
            User,Taco Bell,Del Taco,Chipotle
            ana,8,,6
            ben, 7 ,5,
            You,8,7,6
        "};

        let loaded = CsvSource::new("unused")
            .load_from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(
            loaded.matrix.items(),
            &["Taco Bell", "Del Taco", "Chipotle"]
        );
        assert_eq!(
            loaded.matrix.users().collect::<Vec<_>>(),
            vec!["ana", "ben", "You"]
        );
        assert_eq!(loaded.matrix.rows()[0].ratings, vec![Some(8.0), None, Some(6.0)]);
        assert_eq!(loaded.matrix.rows()[1].ratings, vec![Some(7.0), Some(5.0), None]);
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    fn skips_bad_lines_and_keeps_going() {
        let data = indoc! {"
            User,KFC,Popeyes
            ana,8,9
            ben,1,2,3,4
            ,5,5
            cy,meh,6
        "};

        let loaded = CsvSource::new("unused")
            .load_from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(loaded.matrix.users().collect::<Vec<_>>(), vec!["ana", "cy"]);
        assert_eq!(loaded.rejected.len(), 2);
        assert_eq!(loaded.rejected[0].line, 3);
        assert_eq!(loaded.rejected[1].reason, RejectReason::MissingUser);
        assert_eq!(loaded.coerced_cells, 1);
    }

    #[test]
    fn invalid_utf8_rejects_only_that_row() {
        let mut data = b"User,KFC\nana,8\n".to_vec();
        data.extend_from_slice(b"b\xffn,3\n");
        data.extend_from_slice(b"cy,4\n");

        let loaded = CsvSource::new("unused")
            .load_from_reader(data.as_slice())
            .unwrap();

        assert_eq!(loaded.matrix.users().collect::<Vec<_>>(), vec!["ana", "cy"]);
        assert!(matches!(
            loaded.rejected[0].reason,
            RejectReason::Unreadable { .. }
        ));
        assert_eq!(loaded.rejected[0].line, 3);
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = CsvSource::new("unused")
            .load_from_reader("".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader));
    }

    #[test]
    fn header_only_has_no_rows() {
        let err = CsvSource::new("unused")
            .load_from_reader("User,KFC\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::NoRows { rejected: 0 }));
    }

    #[test]
    fn loads_from_disk_with_custom_delimiter() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "User;Bunz;Jollibee").expect("write header");
        writeln!(file, "ana;7;").expect("write row");
        writeln!(file, "ben;;6.5").expect("write row");

        let source = CsvSource::new(file.path()).with_delimiter(b';');
        let loaded = source.load().unwrap();

        assert_eq!(loaded.matrix.len(), 2);
        assert_eq!(loaded.matrix.rows()[1].ratings, vec![None, Some(6.5)]);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CsvSource::new("/definitely/not/here.csv").load().unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
