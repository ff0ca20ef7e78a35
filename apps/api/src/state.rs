use std::sync::Arc;

use crate::config::Config;
use crate::tutor_client::TutorBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote tutoring API. `TutorApiClient` in production, in-memory in router tests.
    pub backend: Arc<dyn TutorBackend>,
    pub config: Config,
}
