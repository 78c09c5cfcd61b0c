use clap::{Parser, Subcommand};
use resume_search::{api, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Semantic search API over indexed resumes")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run REST gateway (ListDocuments / Search)
    Api(Config),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = resume_search::VERSION, "resume search starting");

    match Cli::parse().cmd {
        Cmd::Api(config) => api::run(config).await?,
    }
    Ok(())
}
