//! HTTP entry point. `GET /sync` runs one pass and reports it as JSON.
//!
//! Complete results carry `Cache-Control: s-maxage=<n>` so that an edge cache in
//! front of the service throttles how often a pass really runs. Partial results
//! and errors are `no-store`.

use crate::orchestrator::SyncOrchestrator;
use crate::report::{PassOptions, SyncReport, SyncResponseBody};
use crate::types::SyncError;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub confirm_teardown: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<SyncResponseBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sync", get(sync_handler))
        .route("/api/sync", get(sync_handler))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn sync_handler(State(state): State<AppState>, Query(query): Query<SyncQuery>) -> Response {
    let options = PassOptions {
        dry_run: query.dry_run,
        confirm_teardown: query.confirm_teardown,
    };
    let cache_max_age = state.orchestrator.config().cache_max_age_secs;
    match state.orchestrator.run_pass(options).await {
        Ok(report) => report_response(&report, cache_max_age),
        Err(e) => {
            error!("Sync pass failed: {}", e);
            error_response(&e)
        }
    }
}

fn report_response(report: &SyncReport, cache_max_age: u64) -> Response {
    let (status, message) = if report.is_complete() {
        (StatusCode::OK, "sync complete".to_string())
    } else {
        (StatusCode::MULTI_STATUS, "sync finished with errors".to_string())
    };
    let payload = SyncResponse {
        status: status.as_u16(),
        message,
        body: Some(report.body()),
        errors: report.errors(),
        error: None,
    };
    let mut response = (status, Json(payload)).into_response();
    // partial results are never cached
    let cache_control = if report.is_complete() {
        HeaderValue::from_str(&format!("s-maxage={}", cache_max_age)).ok()
    } else {
        Some(HeaderValue::from_static("no-store"))
    };
    if let Some(value) = cache_control {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

pub fn status_for(error: &SyncError) -> StatusCode {
    match error {
        SyncError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        SyncError::TeardownRefused { .. } => StatusCode::PRECONDITION_FAILED,
        SyncError::PassInProgress { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &SyncError) -> Response {
    let status = status_for(error);
    let payload = SyncResponse {
        status: status.as_u16(),
        message: error.to_string(),
        body: None,
        errors: Vec::new(),
        error: Some(ErrorBody {
            kind: error.kind().to_string(),
            detail: error.to_string(),
        }),
    };
    let mut response = (status, Json(payload)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub struct Server {
    addr: SocketAddr,
    state: AppState,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), ServerError> {
        let app = build_router(self.state).layer(tower_http::trace::TraceLayer::new_for_http());

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        info!("Sync endpoint listening on {}", self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        info!("Server shutdown complete");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}
