//! API handlers for the catalog REST endpoints

pub mod health;
pub mod openapi;
pub mod ouvrages;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Records
        .route(
            "/ouvrages",
            get(ouvrages::list_records).post(ouvrages::create_record),
        )
        .route("/ouvrages/form", post(ouvrages::create_record_from_form))
        .route(
            "/ouvrages/:id",
            get(ouvrages::get_record)
                .put(ouvrages::update_record)
                .delete(ouvrages::delete_record),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
