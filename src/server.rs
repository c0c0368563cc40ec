//! JSON HTTP API over the record-type catalog and header styles.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/record-types` | All record types; `?active=true` for live indexes only |
//! | `GET`  | `/record-types/{key}` | One record type by key or API type key |
//! | `GET`  | `/guid/{guid}` | Decode a search GUID |
//! | `GET`  | `/header/styles.css` | Header stylesheet for the configured theme |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "no record type with key: poll" } }
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use vanilla_search_core::header::stylesheet;
use vanilla_search_core::registry::RecordTypeRegistry;

use crate::catalog::{build_registry, resolve, GuidView, RecordTypeView};
use crate::config::Config;

#[derive(Clone)]
struct AppState {
    registry: Arc<RecordTypeRegistry>,
    /// Rendered once at startup; the theme does not change while serving.
    stylesheet: Arc<String>,
}

/// Build the router for `config`. Fails on an invalid catalog or theme.
pub fn router(config: &Config) -> anyhow::Result<Router> {
    let registry = build_registry(config)?;
    let stylesheet = stylesheet(&config.theme.global_variables())?;

    let state = AppState {
        registry: Arc::new(registry),
        stylesheet: Arc::new(stylesheet),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/record-types", get(handle_list))
        .route("/record-types/{key}", get(handle_get))
        .route("/guid/{guid}", get(handle_guid))
        .route("/header/styles.css", get(handle_styles))
        .layer(cors)
        .with_state(state))
}

/// Serve until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let app = router(config)?;
    let bind_addr = config.server.bind.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "vsearch API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /record-types ============

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    active: bool,
}

#[derive(Serialize)]
struct ListResponse {
    record_types: Vec<RecordTypeView>,
}

async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse> {
    let record_types = state
        .registry
        .iter()
        .filter(|t| !params.active || t.is_index_enabled())
        .map(RecordTypeView::from)
        .collect();
    Json(ListResponse { record_types })
}

// ============ GET /record-types/{key} ============

/// Looks up by internal key first, then by API type key.
async fn handle_get(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RecordTypeView>, AppError> {
    state
        .registry
        .get(&key)
        .or_else(|| state.registry.by_api_type_key(&key))
        .map(|t| Json(RecordTypeView::from(t)))
        .ok_or_else(|| not_found(format!("no record type with key: {}", key)))
}

// ============ GET /guid/{guid} ============

async fn handle_guid(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<GuidView>, AppError> {
    let guid: i64 = raw
        .parse()
        .map_err(|_| bad_request(format!("invalid GUID: {}", raw)))?;
    resolve(&state.registry, guid)
        .map(Json)
        .ok_or_else(|| not_found(format!("GUID {} does not match any record type", guid)))
}

// ============ GET /header/styles.css ============

async fn handle_styles(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.as_str().to_owned(),
    )
}
