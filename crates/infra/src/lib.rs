//! Infrastructure layer: customer persistence and store bootstrap.

pub mod customer_store;
pub mod db;

mod integration_tests;

pub use customer_store::{
    CustomerStore, InMemoryCustomerStore, PostgresCustomerStore, SqliteCustomerStore, StoreError,
    StoreResult,
};
pub use db::{connect_store, StoreBackend};
