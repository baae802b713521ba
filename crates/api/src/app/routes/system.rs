use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::app::dto::HealthStatus;
use crate::app::openapi::ApiDoc;
use crate::app::services::AppServices;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Store reachable", body = HealthStatus),
        (status = 503, description = "Store unreachable", body = HealthStatus)
    )
)]
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let store = services.store();
    let backend = store.backend_name().to_string();
    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
                backend,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = %backend, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable".to_string(),
                    backend,
                }),
            )
        }
    }
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
