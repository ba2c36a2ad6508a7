use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = eplq_api::Args::parse();

	eplq_api::run(args).await
}
