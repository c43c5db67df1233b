use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HTTP bridge between a chat frontend and a conversational agent
#[derive(Parser, Debug, Clone)]
#[command(name = "chat-bridge", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "CHAT_BRIDGE_CONFIG", default_value = "chat-bridge.toml", global = true)]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "CHAT_BRIDGE_HOST", global = true)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "CHAT_BRIDGE_PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Serve the HTTP API (default)
    #[default]
    Serve,
    /// Chat with the agent from the terminal
    Repl,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
