use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::infra::{app_state::AppState, config::Config};
use crate::routes::{self, paths};

/// Full application router: API routes, liveness endpoints, CORS and tracing.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(state.config());

    Router::new()
        .route(paths::PING, get(ping_handler))
        .route(paths::HEALTH, get(health_handler))
        .merge(routes::create_api_router())
        // CORS outermost, then tracing
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive in dev mode, allow-list otherwise.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    // An empty list allows same-origin callers only.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

async fn ping_handler() -> Json<Value> {
    debug!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Marquee is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Always 200: a degraded upstream is reported, not treated as unhealthy,
/// because listings keep serving fallback data.
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.repository().snapshot();
    let status = if snapshot.degraded { "degraded" } else { "healthy" };

    Json(json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": (chrono::Utc::now() - state.started_at).num_seconds(),
        "checks": {
            "cache": snapshot,
            "upstream_credential": state.proxy.has_credential(),
            "image_proxy": state.config().tmdb.image_proxy_enabled,
        }
    }))
}
