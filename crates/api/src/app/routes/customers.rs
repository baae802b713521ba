use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crm_core::{CustomerId, DomainError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Bytes that cannot appear raw inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `Location` value for a customer, with the id percent-encoded as a single segment.
pub fn customer_location(id: &CustomerId) -> Result<HeaderValue, DomainError> {
    let location = format!(
        "/customers/{}",
        utf8_percent_encode(id.as_str(), PATH_SEGMENT)
    );
    HeaderValue::from_str(&location)
        .map_err(|e| DomainError::invalid_id(format!("CustomerId: {e}")))
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    responses(
        (status = 200, description = "All customers", body = [crm_customers::Customer]),
        (status = 500, description = "Store failure", body = dto::ErrorBody)
    )
)]
pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    tracing::info!("fetching customers");
    match services.store().list().await {
        Ok(items) => {
            tracing::info!(count = items.len(), "fetched customers");
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "The customer", body = crm_customers::Customer),
        (status = 404, description = "No customer with this id")
    )
)]
pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::invalid_id_to_response(e),
    };

    match services.store().get(&id).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(customer)).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = crm_customers::Customer,
    responses(
        (status = 201, description = "Customer created", body = crm_customers::Customer,
            headers(("Location" = String, description = "Path of the new customer"))),
        (status = 400, description = "Malformed body", body = dto::ErrorBody),
        (status = 409, description = "Id already exists", body = dto::ErrorBody)
    )
)]
pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let customer = match dto::decode_customer(&body) {
        Ok(c) => c,
        Err(e) => return errors::decode_error_to_response(e),
    };
    // Built before the insert so a stored record always gets its 201.
    let location = match customer_location(&customer.id) {
        Ok(v) => v,
        Err(e) => return errors::invalid_id_to_response(e),
    };

    match services.store().create(customer).await {
        Ok(created) => (
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(created),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Whole-record replacement. The path id wins over any id in the body.
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body = crm_customers::Customer,
    responses(
        (status = 204, description = "Customer replaced"),
        (status = 400, description = "Malformed body", body = dto::ErrorBody),
        (status = 404, description = "No customer with this id")
    )
)]
pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::invalid_id_to_response(e),
    };
    let mut customer = match dto::decode_customer(&body) {
        Ok(c) => c,
        Err(e) => return errors::decode_error_to_response(e),
    };
    customer.id = id.clone();

    match services.store().update(&id, customer).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "No customer with this id")
    )
)]
pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::invalid_id_to_response(e),
    };

    match services.store().delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
