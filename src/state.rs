//! Shared application state.
//!
//! This module owns the single process-wide reqwest client and injects it
//! into both remote collaborators (generation endpoint and table store), so
//! neither handler re-instantiates its own. It also owns the single-flight
//! gate: at most one generation sequence runs at a time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::generate::{CohereClient, GenerationClient};
use crate::orchestrator::Orchestrator;
use crate::store::ExerciseStore;
use crate::supabase::SupabaseStore;

pub struct AppState {
    pub store: Arc<dyn ExerciseStore>,
    pub orchestrator: Orchestrator,
    /// Held for the duration of one generation sequence; `try_lock` failure
    /// means a sequence is already in flight and the caller gets a busy
    /// response instead of queueing.
    pub generation_gate: Mutex<()>,
}

impl AppState {
    /// Build state from loaded config: one shared HTTP client, the remote
    /// collaborators behind their traits, and the orchestrator over both.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: AppConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client()?;

        let generator: Arc<dyn GenerationClient> = Arc::new(CohereClient::new(
            client.clone(),
            cfg.generation.clone(),
            cfg.prompts(),
        ));
        let store: Arc<dyn ExerciseStore> =
            Arc::new(SupabaseStore::new(client, cfg.store.clone()));

        info!(
            target: "exogen_backend",
            generation_endpoint = %cfg.generation.endpoint_url,
            model = %cfg.generation.model,
            store_endpoint = %cfg.store.endpoint_url,
            table = %cfg.store.table_name,
            "Remote collaborators configured"
        );

        Ok(Self {
            orchestrator: Orchestrator::new(generator, store.clone()),
            store,
            generation_gate: Mutex::new(()),
        })
    }
}

/// No overall request timeout here: a user action is a single attempt and a
/// slow generation must be waited out, so the transport's defaults apply.
fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_client_has_no_overall_timeout() {
        // reqwest's Client only reports a `timeout` field in its Debug output
        // when one has been configured.
        let client = build_http_client().unwrap();
        assert!(!format!("{client:?}").contains("timeout"));
    }
}

