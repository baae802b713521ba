//! OpenAPI document for the HTTP API, served at `/openapi.json`.

use utoipa::OpenApi;

use crm_customers::Customer;

use crate::app::dto::{ErrorBody, HealthStatus};
use crate::app::routes::{customers, system};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "crm-api",
        version = "v1",
        description = "Customer records over HTTP"
    ),
    paths(
        system::health,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer
    ),
    components(schemas(Customer, ErrorBody, HealthStatus)),
    tags(
        (name = "customers", description = "Customer CRUD"),
        (name = "system", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_customer_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/customers"));
        assert!(paths.contains_key("/customers/{id}"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn customer_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("Customer"));
        assert!(schemas.contains_key("ErrorBody"));
    }
}
