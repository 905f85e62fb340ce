use std::sync::Arc;

use tracing::debug;

use crate::llm_client::{resolve_provider_name, CompletionProvider};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The configured completion backend. Swappable for tests.
    pub completion: Arc<dyn CompletionProvider>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Backend for a request's `ai_provider` field. Unknown names fall back
    /// to the configured backend.
    pub fn provider(&self, requested: Option<&str>) -> Arc<dyn CompletionProvider> {
        if let Some(name) = requested {
            debug!("Using AI provider '{}'", resolve_provider_name(name));
        }
        Arc::clone(&self.completion)
    }
}
