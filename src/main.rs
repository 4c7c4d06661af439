use clap::Parser;
use climate_query::cli::{run, Cli};
use climate_query::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
