use std::sync::Arc;

use crate::actor::PassRegistry;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (admin credentials, resource name).
    pub config: Arc<ServerConfig>,
    /// Pass actors. `None` when no store is configured.
    pub passes: Option<Arc<PassRegistry>>,
}

impl AppState {
    /// The pass registry, or a configuration error if no store is set up.
    pub fn passes(&self) -> AppResult<&Arc<PassRegistry>> {
        self.passes
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Pass store is not configured.".into()))
    }
}
