use std::{fs, path::PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use scout_config::Config;
use scout_domain::{CatalogKind, normalize, parse_catalog};
use scout_service::SearchService;

#[derive(Debug, Parser)]
#[command(
	version = scout_cli::VERSION,
	rename_all = "kebab",
	styles = scout_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Analyzer output as a JSON file.
	#[arg(long, value_name = "FILE")]
	pub criteria: PathBuf,
	#[arg(long, short = 'k', value_enum, default_value_t = Kind::Property)]
	pub kind: Kind,
	/// Read listings from a JSON file instead of the configured content API.
	#[arg(long, value_name = "FILE")]
	pub catalog: Option<PathBuf>,
	/// Print the filter response without ranking.
	#[arg(long)]
	pub no_rank: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
	Property,
	Vehicle,
}
impl From<Kind> for CatalogKind {
	fn from(kind: Kind) -> Self {
		match kind {
			Kind::Property => Self::Property,
			Kind::Vehicle => Self::Vehicle,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scout_config::load(&args.config)?;
	init_tracing(&config)?;
	let output = render(&args, config).await?;

	println!("{output}");

	Ok(())
}

/// Loads the catalog, runs the request and returns the pretty-printed response.
pub async fn render(args: &Args, config: Config) -> color_eyre::Result<String> {
	let criteria: Value = serde_json::from_str(&fs::read_to_string(&args.criteria)?)?;
	let kind = CatalogKind::from(args.kind);
	let feed = match args.catalog.as_deref() {
		Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
		None => fetch_catalog(&config, kind).await?,
	};
	let catalog = parse_catalog(&feed);

	tracing::info!(kind = kind.as_str(), listings = catalog.len(), "Catalog loaded.");

	let service = SearchService::new(config);

	if args.no_rank {
		let normalized = normalize(&criteria, kind, &service.cfg);
		let response = service.filter(&catalog, &normalized, kind).await;

		return Ok(serde_json::to_string_pretty(&response)?);
	}

	let results = service.search(&criteria, kind, &catalog).await;

	Ok(serde_json::to_string_pretty(&results)?)
}

async fn fetch_catalog(config: &Config, kind: CatalogKind) -> color_eyre::Result<Value> {
	let Some(catalog) = config.catalog.as_ref() else {
		return Err(eyre::eyre!("Pass --catalog or configure [catalog] to load listings."));
	};
	let path = match kind {
		CatalogKind::Property => &catalog.property_path,
		CatalogKind::Vehicle => &catalog.vehicle_path,
	};

	Ok(scout_providers::catalog::fetch(catalog, path).await?)
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
	Ok(())
}
