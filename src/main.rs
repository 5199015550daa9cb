//! Command-line entry point: scrape a Toppreise results page into a CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use toppreise_scraper::domain::target::{FeatureFilter, ScrapeTarget};
use toppreise_scraper::infrastructure::{export, logging};
use toppreise_scraper::Scraper;

#[derive(Parser, Debug)]
#[command(name = "toppreise-scraper")]
#[command(about = "Scrape a Toppreise results webpage", long_about = None)]
struct Args {
    /// URL of the results page
    #[arg(required_unless_present = "spec", conflicts_with = "spec")]
    url: Option<String>,

    /// Features to scrape
    #[arg(required_unless_present = "spec", conflicts_with = "spec", num_args = 1..)]
    features: Vec<String>,

    /// YAML spec file with `url` and `features` (alternative to the
    /// positional arguments)
    #[arg(long, value_name = "FILE")]
    spec: Option<PathBuf>,

    /// Maximum number of products to scrape (default: all reported hits)
    #[arg(long)]
    max_products: Option<usize>,

    /// Output file path
    #[arg(long, default_value = "output.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging()?;

    let target = match &args.spec {
        Some(path) => ScrapeTarget::from_yaml(path)?,
        None => {
            let url = args
                .url
                .clone()
                .context("a results page URL is required unless --spec is given")?;
            ScrapeTarget::new(url, Some(FeatureFilter::from_names(args.features.clone())))
        }
    };

    let mut scraper = Scraper::new(target)?;
    let result = scraper.scrape(args.max_products).await?;

    export::write_csv(&result, &args.output)?;
    info!(
        "wrote {} rows to {} ({} discarded, started {})",
        result.records.len(),
        args.output.display(),
        result.discarded,
        result.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    Ok(())
}
