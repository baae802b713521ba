use axum::http::StatusCode;
use axum::response::IntoResponse;

use crm_core::DomainError;
use crm_infra::StoreError;

use crate::app::dto::{DecodeError, ErrorBody};

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(_) => not_found(),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        other => {
            tracing::error!(error = ?other, "customer store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string())
        }
    }
}

pub fn decode_error_to_response(err: DecodeError) -> axum::response::Response {
    match err {
        DecodeError::InvalidId(e) => invalid_id_to_response(e),
        other => json_error(StatusCode::BAD_REQUEST, "invalid_body", other.to_string()),
    }
}

pub fn invalid_id_to_response(err: DomainError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
}

/// 404 with an empty body.
pub fn not_found() -> axum::response::Response {
    StatusCode::NOT_FOUND.into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorBody {
            error: code.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}
