//! Overplay - Main Entry Point

use overplay::{app, HostConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = HostConfig::from_args(std::env::args().skip(1))?;
    if config.show_help {
        println!("{}", HostConfig::usage());
        return Ok(());
    }

    tracing::info!("Starting Overplay...");
    smol::block_on(app::run(config))
}
