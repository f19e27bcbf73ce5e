//! Rutas HTTP
//!
//! Ensambla los routers de usuarios, direcciones y teléfonos con el health
//! check y las capas comunes (trace, timeout y CORS).

pub mod address_routes;
pub mod phone_routes;
pub mod user_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::cors_for;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(cors_for(&state.config));

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes::create_user_router())
        .merge(address_routes::create_address_router())
        .merge(phone_routes::create_phone_router())
        .layer(layers)
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
