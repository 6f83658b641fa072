//! Axum-based HTTP server for the gateway.

use axum::{
    body::Bytes,
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use prompt_forge_core::{
    config::{GatewayConfig, ServerConfig},
    traits::ModelCatalog,
    types::{EnhancementRequest, ModelDescriptor},
    Error, Result,
};
use prompt_forge_enhancer::EnhancementService;
use prompt_forge_governance::{
    track_enhancement, track_request, track_upstream_failure, PrometheusHandle,
};

use crate::auth::{login_handler, logout_handler, PasswordGate};
use crate::error::{ApiError, ErrorResponse};
use crate::pages::{app_handler, asset_handler, landing_handler};

/// Shared application state.
pub struct AppState {
    /// Enhancement pipeline.
    pub enhancer: Arc<EnhancementService>,
    /// Free-model catalog.
    pub catalog: Arc<dyn ModelCatalog>,
    /// UI password gate.
    pub gate: PasswordGate,
}

impl AppState {
    pub fn new(
        enhancer: Arc<EnhancementService>,
        catalog: Arc<dyn ModelCatalog>,
        gate: PasswordGate,
    ) -> Self {
        Self {
            enhancer,
            catalog,
            gate,
        }
    }
}

/// Gateway server.
pub struct GatewayServer {
    server: ServerConfig,
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(server: ServerConfig, config: GatewayConfig, state: AppState) -> Self {
        Self {
            server,
            config,
            state: Arc::new(state),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/api/enhance", post(enhance_handler))
            .route("/api/models", get(models_handler))
            .route("/api/login", post(login_handler))
            .route("/api/logout", post(logout_handler))
            .route("/", get(landing_handler))
            .route("/app", get(app_handler))
            .route("/assets/*path", get(asset_handler))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(self.cors_layer());
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins = &self.config.allowed_origins;
        let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(
                origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok()),
            )
        };

        CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any)
    }

    /// Run the server on the configured address.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::internal(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> Result<()> {
        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Free-model listing.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelDescriptor>,
}

/// Message returned when the catalog cannot be fetched.
pub const MODELS_FAILURE: &str = "Failed to fetch models";

// =============================================================================
// Handlers
// =============================================================================

/// Record per-route request count and latency.
async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    track_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Read `{prompt, modelId}` leniently: missing or non-string fields are empty.
fn parse_enhancement_request(body: &[u8]) -> Result<EnhancementRequest> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| Error::invalid_input("Request body must be valid JSON."))?;

    let field = |name: &str| {
        value
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Ok(EnhancementRequest::new(field("prompt"), field("modelId")))
}

/// `POST /api/enhance`
async fn enhance_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let trace_id = Uuid::new_v4().to_string();
    let request = parse_enhancement_request(&body)?;

    tracing::info!(
        trace_id = %trace_id,
        model = %request.model_id,
        prompt_len = request.prompt.len(),
        "Processing enhancement request"
    );

    match state.enhancer.enhance(request).await {
        Ok(response) => {
            track_enhancement(response.format.as_str(), response.fallback);
            tracing::info!(
                trace_id = %trace_id,
                format = %response.format,
                fallback = response.fallback,
                "Enhancement completed"
            );
            Ok(Json(response))
        }
        Err(e) => {
            if e.is_upstream() {
                track_upstream_failure(upstream_failure_kind(&e));
            }
            tracing::debug!(trace_id = %trace_id, error = %e, "Enhancement failed");
            Err(e.into())
        }
    }
}

fn upstream_failure_kind(e: &Error) -> &'static str {
    match e {
        Error::UpstreamMalformed(_) => "malformed",
        _ => "unavailable",
    }
}

/// `GET /api/models`
async fn models_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog.free_models().await {
        Ok(models) => {
            tracing::debug!(count = models.len(), "Serving free models");
            Json(ModelsResponse { models }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch model catalog");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: MODELS_FAILURE.to_string(),
                }),
            )
                .into_response()
        }
    }
}
