//! Customer persistence boundary.
//!
//! `CustomerStore` is the data-access layer: one call maps to one store
//! operation against a single `customers` table. Backends:
//!
//! - [`PostgresCustomerStore`]: durable, shared deployments.
//! - [`SqliteCustomerStore`]: single-node deployments and `sqlite::memory:` tests.
//! - [`InMemoryCustomerStore`]: dev and tests, nothing survives the process.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database (unique violation) | `Conflict` | Insert with an id that already exists |
//! | Database (other) | `Unexpected` | Constraint/type errors, driver-reported failures |
//! | PoolClosed / Io / PoolTimedOut | `Unexpected` | Store unreachable |
//!
//! Nothing is retried; every failure surfaces to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crm_core::CustomerId;
use crm_customers::Customer;

pub mod in_memory;
pub mod postgres;
pub mod sqlite;

pub use in_memory::InMemoryCustomerStore;
pub use postgres::PostgresCustomerStore;
pub use sqlite::SqliteCustomerStore;

/// DDL shared by the SQL backends. Only ever creates; an existing table is
/// left untouched.
pub(crate) const CREATE_CUSTOMERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS customers (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL,
        email   TEXT NULL,
        phone   TEXT NULL,
        address TEXT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data-access operations over customer records.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Create the `customers` table if it does not exist.
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// All records, in whatever order the store returns them.
    async fn list(&self) -> StoreResult<Vec<Customer>>;

    async fn get(&self, id: &CustomerId) -> StoreResult<Option<Customer>>;

    /// Insert a new record. Fails with `Conflict` if the id is taken.
    async fn create(&self, customer: Customer) -> StoreResult<Customer>;

    /// Load the record for `id`, overwrite it from `customer` (see
    /// [`Customer::replace_with`]) and persist. Returns the stored record.
    async fn update(&self, id: &CustomerId, customer: Customer) -> StoreResult<Customer>;

    async fn delete(&self, id: &CustomerId) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<S> CustomerStore for Arc<S>
where
    S: CustomerStore + ?Sized,
{
    async fn ensure_schema(&self) -> StoreResult<()> {
        (**self).ensure_schema().await
    }

    async fn list(&self) -> StoreResult<Vec<Customer>> {
        (**self).list().await
    }

    async fn get(&self, id: &CustomerId) -> StoreResult<Option<Customer>> {
        (**self).get(id).await
    }

    async fn create(&self, customer: Customer) -> StoreResult<Customer> {
        (**self).create(customer).await
    }

    async fn update(&self, id: &CustomerId, customer: Customer) -> StoreResult<Customer> {
        (**self).update(id, customer).await
    }

    async fn delete(&self, id: &CustomerId) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        (**self).health_check().await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

pub(crate) fn not_found(id: &CustomerId) -> StoreError {
    StoreError::NotFound(format!("customer {id}"))
}

pub(crate) fn already_exists(id: &CustomerId) -> StoreError {
    StoreError::Conflict(format!("customer {id} already exists"))
}

/// Map a SQLx error from `operation` to a `StoreError`.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict(
            format!("unique violation in {}: {}", operation, db_err.message()),
        ),
        sqlx::Error::PoolClosed => StoreError::Unexpected(anyhow::anyhow!(
            "connection pool closed in {}",
            operation
        )),
        other => StoreError::Unexpected(
            anyhow::Error::new(other).context(format!("sqlx error in {}", operation)),
        ),
    }
}

// SQLx row type, decoded per backend in `postgres.rs` / `sqlite.rs`.

#[derive(Debug)]
pub(crate) struct CustomerRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) address: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::new(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
        }
    }
}
