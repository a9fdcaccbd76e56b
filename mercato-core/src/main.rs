use clap::Parser;
use mercato_core::{Config, setup_environment};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. .env, then configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Work directory and logging
    setup_environment(&config)?;
    tracing::debug!(backend = %config.backend_url, "mercato starting");

    // 3. Dispatch
    if let Err(e) = cli::run(args, config).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
