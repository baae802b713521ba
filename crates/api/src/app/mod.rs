//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring shared by every handler
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request decoding and response bodies
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: machine-readable API description

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>, docs_enabled: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router());

    if docs_enabled {
        app = app.route("/openapi.json", get(routes::system::openapi_json));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(services)),
    )
}
