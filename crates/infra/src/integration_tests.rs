//! Store behavior shared by every backend.
//!
//! Verifies:
//! - Created records read back unchanged
//! - Missing and deleted ids read as absent
//! - Updates replace the whole record and keep the id
//! - Deleting twice reports not-found instead of failing
//! - Listing reflects creates and deletes
//!
//! The in-memory and SQLite suites always run. The Postgres suite runs when
//! `TEST_DATABASE_URL` points at a database it may write to.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use crm_core::CustomerId;
    use crm_customers::Customer;

    use crate::customer_store::{
        CustomerStore, InMemoryCustomerStore, PostgresCustomerStore, SqliteCustomerStore,
        StoreError,
    };

    /// Unique per call, so runs against a shared Postgres never collide.
    fn test_prefix() -> String {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("t{}-{}-", nanos, COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    fn id(prefix: &str, suffix: &str) -> CustomerId {
        CustomerId::new(format!("{prefix}{suffix}"))
    }

    async fn create_then_get_returns_record(store: &dyn CustomerStore) {
        let p = test_prefix();
        let c = Customer::new(id(&p, "c1"), "Acme")
            .with_email("ops@acme.test")
            .with_address("1 Main St");

        let created = store.create(c.clone()).await.unwrap();
        assert_eq!(created, c);

        let fetched = store.get(&c.id).await.unwrap();
        assert_eq!(fetched, Some(c));
    }

    async fn get_missing_or_deleted_is_absent(store: &dyn CustomerStore) {
        let p = test_prefix();
        assert_eq!(store.get(&id(&p, "never")).await.unwrap(), None);

        let c = Customer::new(id(&p, "gone"), "Gone Ltd");
        store.create(c.clone()).await.unwrap();
        store.delete(&c.id).await.unwrap();
        assert_eq!(store.get(&c.id).await.unwrap(), None);
    }

    async fn update_replaces_whole_record(store: &dyn CustomerStore) {
        let p = test_prefix();
        let original = Customer::new(id(&p, "c1"), "Acme")
            .with_email("ops@acme.test")
            .with_phone("+1 555 0100");
        store.create(original.clone()).await.unwrap();

        let replacement = Customer::new(id(&p, "c1"), "Acme Corp").with_address("2 Side St");
        let stored = store.update(&original.id, replacement.clone()).await.unwrap();
        assert_eq!(stored, replacement);

        let fetched = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(fetched, replacement);
        assert_eq!(fetched.email, None);
        assert_eq!(fetched.phone, None);
    }

    async fn update_keeps_id_when_body_id_differs(store: &dyn CustomerStore) {
        let p = test_prefix();
        let original = Customer::new(id(&p, "c1"), "Acme");
        store.create(original.clone()).await.unwrap();

        let stored = store
            .update(&original.id, Customer::new(id(&p, "other"), "Renamed"))
            .await
            .unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(store.get(&id(&p, "other")).await.unwrap(), None);
        assert_eq!(
            store.get(&original.id).await.unwrap().unwrap().name,
            "Renamed"
        );
    }

    async fn update_missing_is_not_found(store: &dyn CustomerStore) {
        let p = test_prefix();
        let missing = id(&p, "missing");
        let err = store
            .update(&missing, Customer::new(missing.clone(), "Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.get(&missing).await.unwrap(), None);
    }

    async fn delete_twice_is_not_found(store: &dyn CustomerStore) {
        let p = test_prefix();
        let c = Customer::new(id(&p, "c1"), "Acme");
        store.create(c.clone()).await.unwrap();

        store.delete(&c.id).await.unwrap();
        let err = store.delete(&c.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    async fn duplicate_create_is_conflict(store: &dyn CustomerStore) {
        let p = test_prefix();
        let c = Customer::new(id(&p, "c1"), "Acme");
        store.create(c.clone()).await.unwrap();

        let err = store
            .create(Customer::new(c.id.clone(), "Impostor"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
        assert_eq!(store.get(&c.id).await.unwrap(), Some(c));
    }

    async fn list_reflects_creates_and_deletes(store: &dyn CustomerStore) {
        let p = test_prefix();
        let a = Customer::new(id(&p, "a"), "Alpha");
        let b = Customer::new(id(&p, "b"), "Beta");
        let c = Customer::new(id(&p, "c"), "Gamma").with_phone("+1 555 0101");
        for customer in [&a, &b, &c] {
            store.create(customer.clone()).await.unwrap();
        }
        store.delete(&b.id).await.unwrap();

        let mut listed: Vec<Customer> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|x| x.id.as_str().starts_with(&p))
            .collect();
        listed.sort_by(|x, y| x.id.cmp(&y.id));

        assert_eq!(listed, vec![a, c]);
    }

    async fn run_suite(store: &dyn CustomerStore) {
        store.ensure_schema().await.unwrap();
        store.health_check().await.unwrap();

        create_then_get_returns_record(store).await;
        get_missing_or_deleted_is_absent(store).await;
        update_replaces_whole_record(store).await;
        update_keeps_id_when_body_id_differs(store).await;
        update_missing_is_not_found(store).await;
        delete_twice_is_not_found(store).await;
        duplicate_create_is_conflict(store).await;
        list_reflects_creates_and_deletes(store).await;
    }

    #[tokio::test]
    async fn in_memory_store_behaves() {
        let store = InMemoryCustomerStore::new();
        run_suite(&store).await;
    }

    #[tokio::test]
    async fn sqlite_store_behaves() {
        let store = SqliteCustomerStore::in_memory().await.unwrap();
        run_suite(&store).await;
    }

    #[tokio::test]
    async fn postgres_store_behaves() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping postgres suite");
            return;
        };
        let store = PostgresCustomerStore::connect(&url, 2).await.unwrap();
        run_suite(&store).await;
    }
}
