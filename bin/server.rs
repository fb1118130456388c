// Coin Redemption Status - Web Server
// HTML pages + JSON API over the drop presenter

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use coin_redemption::{present_drop, Config, DropDef, DropRegistry, DropView, HttpBalanceApi};

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    registry: Arc<DropRegistry>,
    api: Arc<HttpBalanceApi>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Drop list entry for the index page
#[derive(Serialize)]
struct DropSummary {
    slug: String,
    title: String,
}

impl From<&DropDef> for DropSummary {
    fn from(def: &DropDef) -> Self {
        Self {
            slug: def.slug.clone(),
            title: def.title.clone(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/drops - List known drops
async fn list_drops(State(state): State<AppState>) -> impl IntoResponse {
    let drops: Vec<DropSummary> = state.registry.iter().map(DropSummary::from).collect();
    Json(ApiResponse::ok(drops))
}

/// GET /api/drops/:slug - Full view model for one drop
///
/// Balance resolution blocks on outbound HTTP, so the presenter runs on the
/// blocking pool. Presenter failure surfaces as one generic error response.
async fn get_drop(State(state): State<AppState>, Path(slug): Path<String>) -> impl IntoResponse {
    let def: DropDef = match state.registry.get(&slug) {
        Some(def) => def.clone(),
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<DropView>::err(format!("unknown drop: {}", slug))),
            )
                .into_response();
        }
    };

    let config = state.config.clone();
    let api = state.api.clone();

    let result = tokio::task::spawn_blocking(move || {
        present_drop(&def, &config.data.dir, &config.explorer_base, api.as_ref())
    })
    .await;

    match result {
        Ok(Ok(view)) => (StatusCode::OK, Json(ApiResponse::ok(view))).into_response(),
        Ok(Err(e)) => {
            tracing::error!(%slug, error = %e, "failed to build drop view");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DropView>::err("Error fetching balances")),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(%slug, error = %e, "presenter task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DropView>::err("Error fetching balances")),
            )
                .into_response()
        }
    }
}

/// GET /address/:address - Redirect to the public explorer
async fn redirect_to_explorer(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    let url = format!("{}{}", state.config.explorer_base, address);
    Redirect::temporary(&url)
}

/// GET / - Serve index page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// GET /drop/:slug - Serve the generic drop page (fetches the JSON view)
async fn serve_drop_page() -> impl IntoResponse {
    Html(include_str!("../web/drop.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = Config::load()?;

    let registry = match &config.data.drops_file {
        Some(path) => DropRegistry::from_file(path)?,
        None => DropRegistry::defaults(),
    };
    tracing::info!(drops = registry.len(), data_dir = ?config.data.dir, "loaded drop registry");

    let api = HttpBalanceApi::new(
        &config.providers.bulk_base,
        &config.providers.fallback_base,
        config.provider_timeout(),
    )?;

    let bind_addr = config.server.bind_addr.clone();

    let state = AppState {
        config: Arc::new(config),
        registry: Arc::new(registry),
        api: Arc::new(api),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/drops", get(list_drops))
        .route("/drops/:slug", get(get_drop))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/drop/:slug", get(serve_drop_page))
        .route("/address/:address", get(redirect_to_explorer))
        .with_state(state)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "redemption status server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
