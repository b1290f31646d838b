//! PostgreSQL claim store
//!
//! Adapter over SQLx. The `UNIQUE` index on `transaction_ref` enforces
//! idempotency at the database, and the status transition is a single
//! conditional `UPDATE ... WHERE status = 'pending'`, so two moderators
//! racing on the same claim resolve inside PostgreSQL with exactly one
//! winner. Queries are built at runtime (no compile-time verification) so
//! the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use core_kernel::{ClaimId, UserId};
use domain_claims::{Claim, ClaimNote, ClaimStatus, Decision, EntitlementDuration};

use crate::error::StoreError;
use crate::store::{ClaimStore, LIST_CAP};

const CLAIM_COLUMNS: &str = "claim_id, submitter_id, submitter_handle, transaction_ref, \
     amount, duration_days, status, created_at, decided_at, decided_by, \
     note_text, note_author, note_written_at";

/// PostgreSQL [`ClaimStore`] adapter
#[derive(Debug, Clone)]
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn create(&self, claim: Claim) -> Result<Claim, StoreError> {
        let sql = format!(
            "INSERT INTO claims ({CLAIM_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, NULL, NULL, NULL, NULL) \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::from(claim.id))
            .bind(claim.submitter.as_i64())
            .bind(&claim.submitter_handle)
            .bind(&claim.transaction_ref)
            .bind(claim.amount)
            .bind(claim.duration.days() as i32)
            .bind(claim.status.as_str())
            .bind(claim.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match StoreError::from(err) {
                StoreError::Duplicate { .. } => StoreError::Duplicate {
                    transaction_ref: claim.transaction_ref.clone(),
                },
                other => other,
            })?;

        claim_from_row(&row)
    }

    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1");

        let row = sqlx::query(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(id))?;

        claim_from_row(&row)
    }

    async fn transition(
        &self,
        id: ClaimId,
        decision: Decision,
        moderator: UserId,
        note: Option<String>,
    ) -> Result<Claim, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "UPDATE claims SET \
                 status = $2, \
                 decided_at = $3, \
                 decided_by = $4, \
                 note_text = COALESCE($5, note_text), \
                 note_author = CASE WHEN $5::text IS NULL THEN note_author ELSE $4 END, \
                 note_written_at = CASE WHEN $5::text IS NULL THEN note_written_at ELSE $3 END \
             WHERE claim_id = $1 AND status = 'pending' \
             RETURNING {CLAIM_COLUMNS}"
        );

        let updated = sqlx::query(&sql)
            .bind(Uuid::from(id))
            .bind(decision.target_status().as_str())
            .bind(now)
            .bind(moderator.as_i64())
            .bind(note)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(row) => claim_from_row(&row),
            // Lost the conditional update: either the claim is gone or a
            // concurrent moderator already decided it.
            None => {
                let current = self.get(id).await?;
                Err(StoreError::AlreadyDecided {
                    status: current.status,
                })
            }
        }
    }

    async fn annotate(
        &self,
        id: ClaimId,
        text: String,
        author: UserId,
    ) -> Result<Claim, StoreError> {
        let sql = format!(
            "UPDATE claims SET note_text = $2, note_author = $3, note_written_at = $4 \
             WHERE claim_id = $1 \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::from(id))
            .bind(text)
            .bind(author.as_i64())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(id))?;

        claim_from_row(&row)
    }

    async fn list(
        &self,
        status: Option<ClaimStatus>,
        limit: usize,
    ) -> Result<Vec<Claim>, StoreError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC \
             LIMIT $2"
        );

        let rows = sqlx::query(&sql)
            .bind(status.map(|s| s.as_str()))
            .bind(limit.min(LIST_CAP) as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(claim_from_row).collect()
    }
}

fn claim_from_row(row: &PgRow) -> Result<Claim, StoreError> {
    let status_raw: String = row.try_get("status")?;
    let status: ClaimStatus = status_raw
        .parse()
        .map_err(|_| StoreError::CorruptRecord(format!("unknown status '{status_raw}'")))?;

    let duration_days: i32 = row.try_get("duration_days")?;
    let amount: Decimal = row.try_get("amount")?;
    let decided_by: Option<i64> = row.try_get("decided_by")?;

    let note_text: Option<String> = row.try_get("note_text")?;
    let note = match note_text {
        Some(text) => {
            let author: i64 = row.try_get("note_author")?;
            let written_at: DateTime<Utc> = row.try_get("note_written_at")?;
            Some(ClaimNote {
                text,
                author: UserId::new(author),
                written_at,
            })
        }
        None => None,
    };

    Ok(Claim {
        id: ClaimId::from_uuid(row.try_get("claim_id")?),
        submitter: UserId::new(row.try_get("submitter_id")?),
        submitter_handle: row.try_get("submitter_handle")?,
        transaction_ref: row.try_get("transaction_ref")?,
        amount,
        duration: EntitlementDuration::from_days(duration_days.max(0) as u32),
        status,
        created_at: row.try_get("created_at")?,
        decided_at: row.try_get("decided_at")?,
        decided_by: decided_by.map(UserId::new),
        note,
    })
}
