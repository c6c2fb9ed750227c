use clap::Parser;

use odp_api::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	odp_api::run(args).await
}
