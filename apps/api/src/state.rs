use std::sync::Arc;

use crate::audit::PairingLogStore;
use crate::pairing::service::PairingService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pairing: Arc<PairingService>,
    /// Audit log, read back by the history endpoint.
    pub logs: Arc<dyn PairingLogStore>,
}
