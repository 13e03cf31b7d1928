//! Exogen · Exercise Generator Backend
//!
//! - Axum HTTP API over a remote text-generation endpoint and a hosted table
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   COHERE_API_KEY     : generation credential (required)
//!   COHERE_ENDPOINT_URL: default "https://api.cohere.ai/v1/generate"
//!   SUPABASE_URL       : store base url (required)
//!   SUPABASE_KEY       : store credential (required)
//!   EXOGEN_TABLE_NAME  : default "exercices"
//!   EXOGEN_CONFIG_PATH : optional TOML config (endpoints, prompt template)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod catalog;
mod config;
mod domain;
mod error;
mod generate;
mod orchestrator;
mod parser;
mod protocol;
mod routes;
mod state;
mod store;
mod supabase;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Configuration is injected at startup; nothing remote-facing lives in
    // source. A missing credential is fatal here, not at first request.
    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(target: "exogen_backend", error = %e, "Configuration is incomplete");
            return Err(e.into());
        }
    };

    // Shared application state (HTTP client, store, orchestrator).
    let state = Arc::new(AppState::new(cfg)?);

    // Build the HTTP router with routes, CORS and tracing layers.
    let app = build_router(state.clone());

    // Read port from env or default to 3000.
    let addr: SocketAddr = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

    let listener = TcpListener::bind(addr).await?;
    info!(target: "exogen_backend", %addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
