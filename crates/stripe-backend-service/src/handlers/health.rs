//! Liveness handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::SERVICE_NAME;
use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    /// Always `true` while the process is serving requests.
    pub ok: bool,
    /// Service name.
    pub service: &'static str,
    /// Port the service was configured to listen on.
    pub port: u16,
}

/// Liveness endpoint. Never touches the provider.
pub async fn liveness(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        ok: true,
        service: SERVICE_NAME,
        port: state.config.port,
    })
}
