use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup — requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model backend. Production: `LlmClient`; tests inject a
    /// deterministic scripted model.
    pub model: Arc<dyn TextModel>,
}
