use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = scout_query::Args::parse();
	scout_query::run(args).await
}
