//! Claim store port
//!
//! The workflow layer talks to persistence only through this trait.
//! Adapters must provide the two atomicity guarantees documented on
//! [`ClaimStore::create`] and [`ClaimStore::transition`]; the orchestrator
//! never compensates for a store that lacks them.

use async_trait::async_trait;

use core_kernel::{ClaimId, UserId};
use domain_claims::{Claim, ClaimStatus, Decision};

use crate::error::StoreError;

/// Hard cap on listing results, regardless of the requested limit
pub const LIST_CAP: usize = 50;

/// Persistence port for payment claims
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Persists a new claim
    ///
    /// Fails with [`StoreError::Duplicate`] if a claim with the same
    /// transaction reference already exists. Uniqueness is enforced by the
    /// storage layer itself (constraint or single critical section), never
    /// by a read-then-write check, so concurrent submissions of the same
    /// reference still yield exactly one record.
    async fn create(&self, claim: Claim) -> Result<Claim, StoreError>;

    /// Fetches a claim by id
    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError>;

    /// Applies a moderator decision as a conditional update
    ///
    /// Succeeds only while the claim is still `Pending`; a concurrent
    /// decision that lost the race gets [`StoreError::AlreadyDecided`] and
    /// the record is unchanged. This is the system's single concurrency
    /// hazard and it is resolved here, not by the caller.
    async fn transition(
        &self,
        id: ClaimId,
        decision: Decision,
        moderator: UserId,
        note: Option<String>,
    ) -> Result<Claim, StoreError>;

    /// Sets or overwrites the claim's annotation, independent of status
    async fn annotate(
        &self,
        id: ClaimId,
        text: String,
        author: UserId,
    ) -> Result<Claim, StoreError>;

    /// Lists claims newest-first, optionally filtered by status
    ///
    /// The effective limit is `min(limit, LIST_CAP)`.
    async fn list(
        &self,
        status: Option<ClaimStatus>,
        limit: usize,
    ) -> Result<Vec<Claim>, StoreError>;
}
