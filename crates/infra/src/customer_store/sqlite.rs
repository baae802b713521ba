//! SQLite-backed customer store.
//!
//! Same table layout and semantics as the Postgres backend. In-memory URLs
//! (`sqlite::memory:`, `mode=memory`) are pinned to a single connection that is
//! never recycled: every SQLite connection opens its own private in-memory
//! database. File databases run in WAL mode and wait up to
//! [`BUSY_TIMEOUT`] for a competing writer instead of failing with
//! `database is locked`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use tracing::{instrument, Span};

use crm_core::CustomerId;
use crm_customers::Customer;

use super::{
    already_exists, map_sqlx_error, not_found, CustomerRow, CustomerStore, StoreError, StoreResult,
    CREATE_CUSTOMERS_TABLE,
};

pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed customer store.
#[derive(Debug, Clone)]
pub struct SqliteCustomerStore {
    pool: SqlitePool,
}

impl SqliteCustomerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`, creating the database file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let (options, pool_options) = if is_in_memory(database_url) {
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        } else {
            let options = options.journal_mode(SqliteJournalMode::Wal);
            (options, SqlitePoolOptions::new().max_connections(max_connections))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    /// Fresh private in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl CustomerStore for SqliteCustomerStore {
    #[instrument(skip(self), err)]
    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_CUSTOMERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(count = tracing::field::Empty), err)]
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query("SELECT id, name, email, phone, address FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let customers = rows
            .iter()
            .map(|row| CustomerRow::from_row(row).map(Customer::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("list", e))?;

        Span::current().record("count", customers.len());
        Ok(customers)
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn get(&self, id: &CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, email, phone, address FROM customers WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|r| CustomerRow::from_row(&r).map(Customer::from))
            .transpose()
            .map_err(|e| map_sqlx_error("get", e))
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id), err)]
    async fn create(&self, customer: Customer) -> StoreResult<Customer> {
        sqlx::query(
            "INSERT INTO customers (id, name, email, phone, address) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(customer.id.as_str())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("create", e) {
            StoreError::Conflict(_) => already_exists(&customer.id),
            other => other,
        })?;

        Ok(customer)
    }

    #[instrument(skip(self, customer), fields(customer_id = %id), err)]
    async fn update(&self, id: &CustomerId, customer: Customer) -> StoreResult<Customer> {
        let Some(mut current) = self.get(id).await? else {
            return Err(not_found(id));
        };
        current.replace_with(customer);

        let result = sqlx::query(
            "UPDATE customers SET name = ?2, email = ?3, phone = ?4, address = ?5 WHERE id = ?1",
        )
        .bind(current.id.as_str())
        .bind(&current.name)
        .bind(&current.email)
        .bind(&current.phone)
        .bind(&current.address)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        // Deleted between the load and the write.
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(current)
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn delete(&self, id: &CustomerId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("health_check", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

impl<'r> FromRow<'r, SqliteRow> for CustomerRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
        })
    }
}
