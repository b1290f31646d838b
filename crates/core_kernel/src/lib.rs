//! Core Kernel - Foundational types for the payment claim system
//!
//! This crate provides the building blocks shared across all layers:
//! - Strongly-typed entity identifiers (UUID newtypes)
//! - Chat identity newtypes (numeric ids handed out by the messaging platform)

pub mod identifiers;

pub use identifiers::{ChannelId, ClaimId, UserId};
