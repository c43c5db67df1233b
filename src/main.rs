use anyhow::Context;
use chat_bridge::agents::{AgentHandle, InvocationBridge};
use chat_bridge::cli::{Cli, Command};
use chat_bridge::config::Settings;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    // Build the agent before accepting traffic so a bad key stops startup
    let handle = Arc::new(AgentHandle::from_settings(settings.agent.clone()));
    let agent = handle
        .get()
        .await
        .context("Failed to construct the agent")?;
    info!(agent = agent.name(), env = %settings.app.env, "Agent constructed");

    let bridge = InvocationBridge::new(handle, Duration::from_secs(settings.bridge.timeout_seconds));

    match cli.command() {
        Command::Serve => {
            let app = chat_bridge::create_app(&settings, bridge)?;

            let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
            info!("Starting {} on {}", settings.app.name, addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Command::Repl => chat_bridge::repl::run(bridge).await?,
    }

    Ok(())
}
