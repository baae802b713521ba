//! Postgres-backed customer store.
//!
//! ## Thread Safety
//!
//! `PostgresCustomerStore` is `Send + Sync` and cheap to clone; all access goes
//! through the SQLx connection pool.
//!
//! ## Updates
//!
//! `update()` loads the row, applies [`Customer::replace_with`] in memory and
//! writes every column back with one `UPDATE`. No transaction or row lock spans
//! the two statements, so concurrent updates of the same id are
//! last-writer-wins.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{instrument, Span};

use crm_core::CustomerId;
use crm_customers::Customer;

use super::{
    already_exists, map_sqlx_error, not_found, CustomerRow, CustomerStore, StoreError, StoreResult,
    CREATE_CUSTOMERS_TABLE,
};

/// Postgres-backed customer store.
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    /// Create a new PostgresCustomerStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// Does not touch the schema; call [`CustomerStore::ensure_schema`] afterwards.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
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

        let mut customers = Vec::with_capacity(rows.len());
        for row in rows {
            let decoded = CustomerRow::from_row(&row).map_err(|e| map_sqlx_error("list", e))?;
            customers.push(decoded.into());
        }

        Span::current().record("count", customers.len());
        Ok(customers)
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn get(&self, id: &CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, email, phone, address FROM customers WHERE id = $1")
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
            r#"
            INSERT INTO customers (id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
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
            r#"
            UPDATE customers
            SET name = $2, email = $3, phone = $4, address = $5
            WHERE id = $1
            "#,
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
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
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
        "postgres"
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
        })
    }
}
