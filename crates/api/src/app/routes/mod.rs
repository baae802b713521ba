use axum::Router;

pub mod customers;
pub mod system;

/// Router for the customer resource.
pub fn router() -> Router {
    Router::new().nest("/customers", customers::router())
}
