use std::rc::Rc;

use anyhow::{Context, Result};
use game_hub::config::Config;
use game_hub::console::StdConsole;
use game_hub::random::StdRandom;
use game_hub::runtime::Runtime;
use game_hub::{app, games};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout belongs to the console
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("game_hub=warn".parse()?),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(data_dir = %config.data_dir.display(), "Starting game hub");

    let (console, interrupt) = StdConsole::spawn();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupt.interrupt();
        }
    });

    let mut runtime = Runtime::new(
        &config,
        Box::new(console),
        Box::new(StdRandom::from_entropy()),
        games::available(),
        Rc::new(app::StartState),
    )
    .context("Failed to initialize runtime")?;

    runtime
        .bootstrap()
        .context("Failed to load core localization")?;

    runtime.run();
    info!("Game hub stopped");
    Ok(())
}
