use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, ValueEnum};
use palate::MIN_COMMON;
use palate_domain::TargetRatings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Recommend restaurants from other people's ratings.
#[derive(Parser, Debug)]
#[clap(name = "palate", version)]
pub struct Cli {
    /// CSV file: a header of `User,<item>,...` followed by one row per user.
    #[clap(long, env = "PALATE_RATINGS")]
    pub ratings: PathBuf,
    /// JSON object of your own ratings, e.g. `{"Taco Bell": 8}`.
    #[clap(long, env = "PALATE_TARGET")]
    pub target: Option<PathBuf>,
    /// A single rating as `ITEM=RATING`; wins over the same item in --target.
    #[clap(long = "rate", value_name = "ITEM=RATING", value_parser = parse_rating)]
    pub rates: Vec<(String, f64)>,
    /// Rows to drop from the matrix before scoring.
    #[clap(long = "exclude-user", value_name = "NAME", default_value = "You")]
    pub exclude_users: Vec<String>,
    #[clap(long, env = "PALATE_MIN_COMMON", default_value_t = MIN_COMMON)]
    pub min_common: usize,
    #[clap(long, default_value_t = 10)]
    pub top: usize,
    /// Top of the rating scale; only used when printing.
    #[clap(long, default_value_t = 10.0)]
    pub scale: f64,
    #[clap(long, default_value = ",")]
    pub delimiter: char,
    #[clap(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl Cli {
    pub fn delimiter_byte(&self) -> Result<u8> {
        ensure!(
            self.delimiter.is_ascii(),
            "Delimiter must be a single ASCII character, got '{}'",
            self.delimiter
        );
        Ok(self.delimiter as u8)
    }

    pub fn target_ratings(&self) -> Result<TargetRatings> {
        let mut ratings = match &self.target {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read target ratings {}", path.display()))?;
                serde_json::from_str::<TargetRatings>(&raw)
                    .with_context(|| format!("Failed to parse target ratings {}", path.display()))?
            }
            None => TargetRatings::new(),
        };

        for (item, rating) in &self.rates {
            ratings.insert(item.clone(), *rating);
        }

        if ratings.is_empty() {
            bail!("No target ratings given; pass --target <FILE> or --rate ITEM=RATING");
        }

        Ok(ratings)
    }
}

fn parse_rating(raw: &str) -> Result<(String, f64)> {
    let Some((item, rating)) = raw.rsplit_once('=') else {
        bail!("expected ITEM=RATING, got '{raw}'");
    };

    let item = item.trim();
    ensure!(!item.is_empty(), "item name is empty in '{raw}'");

    let rating: f64 = rating
        .trim()
        .parse()
        .with_context(|| format!("invalid rating in '{raw}'"))?;
    ensure!(rating.is_finite(), "rating must be finite in '{raw}'");

    Ok((item.to_string(), rating))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_item_rating_pairs() {
        assert_eq!(
            parse_rating("Raisin' Canes=7").unwrap(),
            ("Raisin' Canes".to_string(), 7.0)
        );
        assert_eq!(
            parse_rating("A=B Grill = 6.5").unwrap(),
            ("A=B Grill".to_string(), 6.5)
        );
        assert!(parse_rating("KFC").is_err());
        assert!(parse_rating("=5").is_err());
        assert!(parse_rating("KFC=tasty").is_err());
        assert!(parse_rating("KFC=NaN").is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["palate", "--ratings", "data.csv", "--rate", "KFC=7"]).unwrap();

        assert_eq!(cli.exclude_users, vec!["You".to_string()]);
        assert_eq!(cli.min_common, MIN_COMMON);
        assert_eq!(cli.top, 10);
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn flags_override_the_target_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"KFC": 7, "Popeyes": 9}}"#).expect("write target");

        let cli = Cli::try_parse_from([
            "palate",
            "--ratings",
            "data.csv",
            "--target",
            file.path().to_str().unwrap(),
            "--rate",
            "KFC=3",
            "--rate",
            "Bunz=6",
        ])
        .unwrap();

        let ratings = cli.target_ratings().unwrap();
        assert_eq!(ratings.get("KFC"), Some(3.0));
        assert_eq!(ratings.get("Popeyes"), Some(9.0));
        assert_eq!(ratings.get("Bunz"), Some(6.0));
    }

    #[test]
    fn requires_some_target_ratings() {
        let cli = Cli::try_parse_from(["palate", "--ratings", "data.csv"]).unwrap();
        assert!(cli.target_ratings().is_err());
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let cli = Cli::try_parse_from([
            "palate",
            "--ratings",
            "data.csv",
            "--delimiter",
            "§",
        ])
        .unwrap();
        assert!(cli.delimiter_byte().is_err());
    }
}
