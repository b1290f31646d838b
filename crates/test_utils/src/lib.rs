//! Test Utilities Crate
//!
//! Shared test infrastructure for the payment claims test suite.
//!
//! # Modules
//!
//! - `builders`: builder patterns for claims and submission text
//! - `fixtures`: canonical identities and a ready-made workflow
//! - `gateway`: a recording gateway mock for workflow assertions

pub mod builders;
pub mod fixtures;
pub mod gateway;

pub use builders::*;
pub use fixtures::*;
pub use gateway::*;
