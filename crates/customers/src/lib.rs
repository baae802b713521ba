//! Customers domain module.
//!
//! This crate holds the Customer record and its replacement semantics,
//! implemented as plain data (no IO, no HTTP, no storage).

pub mod customer;

pub use customer::Customer;
