use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crm_core::CustomerId;
use crm_customers::Customer;

use super::{already_exists, not_found, CustomerStore, StoreError, StoreResult};

/// In-memory customer store for tests/dev.
///
/// Records are kept ordered by id, so `list()` is deterministic.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    inner: RwLock<BTreeMap<CustomerId, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, BTreeMap<CustomerId, Customer>>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, BTreeMap<CustomerId, Customer>>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Unexpected(anyhow::anyhow!("in-memory customer store lock poisoned"))
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn get(&self, id: &CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, customer: Customer) -> StoreResult<Customer> {
        let mut map = self.write()?;
        if map.contains_key(&customer.id) {
            return Err(already_exists(&customer.id));
        }
        map.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn update(&self, id: &CustomerId, customer: Customer) -> StoreResult<Customer> {
        let mut map = self.write()?;
        let current = map.get_mut(id).ok_or_else(|| not_found(id))?;
        current.replace_with(customer);
        Ok(current.clone())
    }

    async fn delete(&self, id: &CustomerId) -> StoreResult<()> {
        self.write()?.remove(id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
