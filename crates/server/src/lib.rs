//! HTTP surface for page analysis.
//!
//! One JSON operation, `POST /api/analyze`, answered with either an
//! `AnalysisResult` or an `{ "error": ... }` body whose status follows the
//! error kind. Rejected request bodies and timeouts use the same error shape.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pagegrade_core::{AnalysisResult, AnalyzeRequest, ErrorBody, ErrorKind, PageAnalysisService, PagegradeError};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Environment variable holding the listen address.
pub const BIND_ENV: &str = "PAGEGRADE_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Upper bound for one request: fetch plus the slowest analysis pass, with headroom.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct AppState {
    service: Arc<PageAnalysisService>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(service: PageAnalysisService) -> Self {
        Self { service: Arc::new(service), request_timeout: REQUEST_TIMEOUT }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// A failed request on its way out as an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// The pipeline failed.
    Analysis(PagegradeError),
    /// The request body was missing, malformed or incomplete.
    BadRequest(String),
    /// The whole request exceeded its time budget.
    Timeout(Duration),
}

impl From<PagegradeError> for AppError {
    fn from(err: PagegradeError) -> Self {
        Self::Analysis(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Analysis(PagegradeError::InvalidUrl(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Analysis(err) => match err.kind() {
                ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Fetch | ErrorKind::Provider => StatusCode::BAD_GATEWAY,
                ErrorKind::EmptyContent => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Analysis(err) => ErrorBody::from(err),
            Self::BadRequest(message) => ErrorBody { error: format!("Invalid request: {}", message) },
            Self::Timeout(timeout) => {
                ErrorBody { error: format!("Analysis did not finish within {:?}", timeout) }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %body.error, "analysis request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %body.error, "analysis request rejected");
        }
        (status, Json(body)).into_response()
    }
}

async fn analyze(
    State(state): State<AppState>, payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload?;
    let result = tokio::time::timeout(state.request_timeout, state.service.analyze(&request))
        .await
        .map_err(|_| AppError::Timeout(state.request_timeout))??;
    Ok(Json(result))
}

async fn health() -> &'static str {
    "ok"
}

/// Builds the router with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
