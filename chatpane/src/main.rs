use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatpane::cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatpane=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli).await
}
