//! Claim Store Infrastructure
//!
//! This crate provides the persistence port for payment claims and two
//! adapters behind it:
//!
//! - [`InMemoryClaimStore`] for tests and local runs
//! - [`PgClaimStore`] on PostgreSQL via SQLx
//!
//! Both adapters enforce the two storage-level guarantees the workflow
//! depends on: transaction-reference uniqueness at creation (idempotency)
//! and a compare-and-swap status transition so at most one moderator
//! decision ever lands on a claim.

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryClaimStore;
pub use pool::{create_pool, DatabasePool, StoreConfig};
pub use postgres::PgClaimStore;
pub use store::{ClaimStore, LIST_CAP};
