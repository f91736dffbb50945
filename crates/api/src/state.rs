use std::sync::Arc;

use welfare_db::gateway::DataGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The data gateway every handler reads and writes through.
    pub gateway: Arc<dyn DataGateway>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
