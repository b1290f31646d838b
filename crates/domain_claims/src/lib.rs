//! Payment Claim Domain
//!
//! This crate implements the payment claim lifecycle: a chat user asserts an
//! external payment, the claim is validated and deduplicated, an entitlement
//! duration is derived from the paid amount, and a human moderator approves
//! or rejects the claim.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> Approved | Rejected   (terminal, at most one transition)
//! ```

pub mod claim;
pub mod duration;
pub mod error;
pub mod session;
pub mod submission;

pub use claim::{Claim, ClaimNote, ClaimStatus, Decision};
pub use duration::EntitlementDuration;
pub use error::ClaimError;
pub use session::{ModerationSession, PendingAction, SessionStore};
pub use submission::{ClaimSubmission, SubmissionError};
