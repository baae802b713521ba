//! Store bootstrap: pick a backend from the database URL, connect, ensure the schema.

use std::sync::Arc;

use tracing::info;

use crate::customer_store::{
    CustomerStore, InMemoryCustomerStore, PostgresCustomerStore, SqliteCustomerStore, StoreError,
    StoreResult,
};

/// Backend selected by the scheme of a database URL.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn from_url(database_url: &str) -> StoreResult<Self> {
        let url = database_url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(StoreBackend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(StoreBackend::Sqlite)
        } else if url == "memory" {
            Ok(StoreBackend::Memory)
        } else {
            // Never echo the full URL: it may carry credentials.
            Err(StoreError::UnsupportedUrl(format!(
                "scheme `{}`",
                url.split(':').next().unwrap_or_default()
            )))
        }
    }
}

/// Connect to the store at `database_url` and create the schema if absent.
pub async fn connect_store(
    database_url: &str,
    max_connections: u32,
) -> StoreResult<Arc<dyn CustomerStore>> {
    let backend = StoreBackend::from_url(database_url)?;

    let store: Arc<dyn CustomerStore> = match backend {
        StoreBackend::Postgres => {
            Arc::new(PostgresCustomerStore::connect(database_url.trim(), max_connections).await?)
        }
        StoreBackend::Sqlite => {
            Arc::new(SqliteCustomerStore::connect(database_url.trim(), max_connections).await?)
        }
        StoreBackend::Memory => Arc::new(InMemoryCustomerStore::new()),
    };

    store.ensure_schema().await?;
    info!(backend = store.backend_name(), "customer store ready");
    Ok(store)
}
