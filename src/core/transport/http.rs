//! HTTP transport implementation.
//!
//! Tool call envelopes over POST. Any HTTP client (curl, a browser, the chat
//! agent's runtime) can talk to the server without an MCP SDK.
//!
//! Handled tool errors are answered with 200 and an `error` object; only a
//! body that is not an envelope at all (400) or an unknown route (404) uses a
//! non-200 status.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::ToolCallRequest;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
    rpc_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Tool calls: POST {}", self.config.rpc_path);
        info!("  → Tools:      GET /tools");
        info!("  → Health:     GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the axum router serving `server`.
pub fn build_router(server: McpServer, config: &HttpConfig) -> Router {
    let state = AppState {
        server,
        rpc_path: config.rpc_path.clone(),
    };

    let app = Router::new()
        .route(&config.rpc_path, post(handle_call))
        .route("/tools", get(list_tools))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "call": state.rpc_path,
            "tools": "/tools",
            "health": "/health"
        },
        "documentation": format!(
            "POST {} with {{\"tool\": ..., \"input\": {{...}}, \"threadId\": ...}}",
            state.rpc_path
        )
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "sessions": state.server.session_count().await
    }))
}

/// Tool metadata listing.
async fn list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.server.list_tools() }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "kind": "NotFound", "message": "No such route" } })),
    )
}

/// Handle one tool call envelope.
#[instrument(skip_all, fields(tool))]
async fn handle_call(
    State(state): State<AppState>,
    payload: Result<Json<ToolCallRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Malformed envelope: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": {
                        "kind": "MalformedEnvelope",
                        "message": rejection.body_text()
                    }
                })),
            )
                .into_response();
        }
    };

    tracing::Span::current().record("tool", request.tool.as_str());
    info!("Received tool call: {}", request.tool);

    let response = state.server.dispatch(request).await;
    (StatusCode::OK, Json(response)).into_response()
}
