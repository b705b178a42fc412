//! Local control API for the capture service.
//!
//! This is the surface a UI (the browser extension popup, a status bar
//! widget, curl) drives: start and stop recording, read the pipeline state.

pub mod error;
pub mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

use crate::pipeline::PipelineMachine;
use routes::pipeline::ControlState;

pub struct ApiServer {
    port: u16,
    state: ControlState,
}

impl ApiServer {
    pub fn new(machine: Arc<PipelineMachine>, port: u16) -> Self {
        Self {
            port,
            state: ControlState { machine },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(service_info))
            .route("/version", get(version))
            .merge(routes::pipeline::router(self.state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("Control API listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /        - Service info");
        info!("  GET  /version - Version info");
        info!("  POST /start   - Start recording");
        info!("  POST /stop    - Stop recording and process");
        info!("  GET  /status  - Pipeline status");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "briefly",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "briefly"
    }))
}
