use std::sync::Arc;

use anyhow::Context;

use crm_infra::{connect_store, CustomerStore, InMemoryCustomerStore};

use crate::config::ApiConfig;

/// Everything a handler needs, constructed once at startup and shared
/// through an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CustomerStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCustomerStore::new()))
    }

    pub fn store(&self) -> &dyn CustomerStore {
        self.store.as_ref()
    }
}

/// Connect the configured store (creating the schema if absent).
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store = connect_store(&config.database_url, config.max_connections)
        .await
        .context("failed to connect customer store")?;
    Ok(AppServices::new(store))
}
