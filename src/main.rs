/// movedesk — main entry point
use movedesk::Config;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_args(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // The TUI owns the terminal, so tracing goes to a file.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!("🚚 Starting movedesk dashboard");
    info!("   Data source: {}", config.api_url);
    info!("   Toggle webhook: {}", config.toggle_url);
    info!("   Send webhook: {}", config.send_url);

    movedesk::app::run(config)
        .await
        .map_err(|e| anyhow::anyhow!("Dashboard error: {}", e))?;

    Ok(())
}
