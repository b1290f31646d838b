//! In-memory claim store
//!
//! Used by tests and local runs. All operations take the one mutex, so the
//! uniqueness check on create and the pending-only check on transition are
//! atomic with their writes, matching the guarantees of the SQL adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use core_kernel::{ClaimId, UserId};
use domain_claims::{Claim, ClaimError, ClaimStatus, Decision};

use crate::error::StoreError;
use crate::store::{ClaimStore, LIST_CAP};

#[derive(Debug, Default)]
struct Inner {
    claims: HashMap<ClaimId, Claim>,
    /// transaction_ref -> claim id, the uniqueness index
    by_ref: HashMap<String, ClaimId>,
}

/// In-memory [`ClaimStore`] adapter
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    inner: Mutex<Inner>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn create(&self, claim: Claim) -> Result<Claim, StoreError> {
        let mut inner = self.inner.lock().await;

        if inner.by_ref.contains_key(&claim.transaction_ref) {
            return Err(StoreError::Duplicate {
                transaction_ref: claim.transaction_ref.clone(),
            });
        }

        inner.by_ref.insert(claim.transaction_ref.clone(), claim.id);
        inner.claims.insert(claim.id, claim.clone());
        Ok(claim)
    }

    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .claims
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn transition(
        &self,
        id: ClaimId,
        decision: Decision,
        moderator: UserId,
        note: Option<String>,
    ) -> Result<Claim, StoreError> {
        let mut inner = self.inner.lock().await;
        let claim = inner
            .claims
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(id))?;

        claim
            .decide(decision, moderator, note)
            .map_err(|err| match err {
                ClaimError::AlreadyDecided { status } => StoreError::AlreadyDecided { status },
                other => StoreError::CorruptRecord(other.to_string()),
            })?;
        Ok(claim.clone())
    }

    async fn annotate(
        &self,
        id: ClaimId,
        text: String,
        author: UserId,
    ) -> Result<Claim, StoreError> {
        let mut inner = self.inner.lock().await;
        let claim = inner
            .claims
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(id))?;

        claim.annotate(text, author);
        Ok(claim.clone())
    }

    async fn list(
        &self,
        status: Option<ClaimStatus>,
        limit: usize,
    ) -> Result<Vec<Claim>, StoreError> {
        let inner = self.inner.lock().await;
        let mut claims: Vec<Claim> = inner
            .claims
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();

        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        claims.truncate(limit.min(LIST_CAP));
        Ok(claims)
    }
}
