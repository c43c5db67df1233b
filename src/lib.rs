//! # chat-bridge
//!
//! A small HTTP bridge between a web chat frontend and a conversational
//! agent. The frontend posts a whole conversation; the bridge picks the
//! message that matters, runs the (blocking) agent off the request threads
//! and returns the reply in a fixed envelope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use chat_bridge::agents::{AgentHandle, InvocationBridge};
//! use chat_bridge::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let handle = Arc::new(AgentHandle::from_settings(settings.agent.clone()));
//!     handle.get().await?;
//!
//!     let bridge = InvocationBridge::new(handle, Duration::from_secs(settings.bridge.timeout_seconds));
//!     let app = chat_bridge::create_app(&settings, bridge)?;
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **domain**: wire types, validation and input selection
//! - **agents**: the agent capability, its once-constructed handle and the invocation bridge
//! - **adapters**: axum handlers, error envelope and CORS
//! - **config**: layered settings

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod domain;
pub mod repl;

use crate::adapters::chat_handler;
use crate::adapters::health_handler::HealthHandler;
use crate::agents::InvocationBridge;
use crate::config::Settings;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// State shared by the chat routes
#[derive(Clone)]
pub struct AppState {
    pub bridge: InvocationBridge,
}

/// Creates the Axum application router with all endpoints configured.
///
/// Fails only when the CORS settings cannot be turned into a layer.
pub fn create_app(settings: &Settings, bridge: InvocationBridge) -> anyhow::Result<Router> {
    let health_handler = Arc::new(HealthHandler::new(settings.app.name.clone()));

    let public_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.index().await }
            }
        }));

    let chat_router = Router::new()
        .route("/v1/chat", post(chat_handler::chat))
        .with_state(AppState { bridge });

    let cors = crate::adapters::cors::cors_layer(&settings.cors)?;

    Ok(public_router.merge(chat_router).layer(cors))
}
