mod config;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Format};
use palate::Recommender;
use palate_csv_source::CsvSource;
use report::Report;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn default_log_filter() -> String {
    format!(
        "{}=info,palate_source=info,palate_csv_source=info",
        env!("CARGO_CRATE_NAME")
    )
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Parsed configuration");
    let target = cli.target_ratings()?;

    let source = CsvSource::new(&cli.ratings).with_delimiter(cli.delimiter_byte()?);

    let recommender = cli
        .exclude_users
        .iter()
        .fold(Recommender::builder(), |builder, user| {
            builder.with_excluded_user(user.clone())
        })
        .with_source(Arc::new(source))
        .with_min_common(cli.min_common)
        .build()?;

    let recommendations = recommender
        .recommend(&target)
        .with_context(|| format!("Failed to recommend from {}", cli.ratings.display()))?;

    let report = Report::new(&recommendations, cli.top, cli.scale);
    let rendered = match cli.format {
        Format::Text => report.text()?,
        Format::Json => report.json()?,
    };
    println!("{rendered}");

    Ok(())
}
