//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, UserId};

use crate::duration::EntitlementDuration;
use crate::error::ClaimError;
use crate::submission::ClaimSubmission;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Awaiting a moderator decision
    Pending,
    /// Approved by a moderator
    Approved,
    /// Rejected by a moderator
    Rejected,
}

impl ClaimStatus {
    /// A decided claim never changes status again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(ClaimError::UnknownStatus(other.to_string())),
        }
    }
}

/// A moderator decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The terminal status this decision moves the claim to
    pub fn target_status(&self) -> ClaimStatus {
        match self {
            Decision::Approve => ClaimStatus::Approved,
            Decision::Reject => ClaimStatus::Rejected,
        }
    }
}

/// A free-text annotation on a claim, overwrite semantics (last write wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimNote {
    pub text: String,
    pub author: UserId,
    pub written_at: DateTime<Utc>,
}

/// A user-submitted payment claim tracked through the moderation lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier, assigned at creation
    pub id: ClaimId,
    /// Identity of the submitting chat user
    pub submitter: UserId,
    /// Display name asserted by the submitter (normalized, not re-validated)
    pub submitter_handle: String,
    /// Submitter-asserted payment reference, unique across all claims
    pub transaction_ref: String,
    /// Paid amount as asserted by the submitter
    pub amount: Decimal,
    /// Derived once at creation from `amount`; never recomputed, so policy
    /// changes do not retroactively alter pending or approved claims
    pub duration: EntitlementDuration,
    /// Status
    pub status: ClaimStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Set exactly once, at the transition out of Pending
    pub decided_at: Option<DateTime<Utc>>,
    /// Moderator who decided the claim
    pub decided_by: Option<UserId>,
    /// Optional annotation, settable before or after decision
    pub note: Option<ClaimNote>,
}

impl Claim {
    /// Creates a new pending claim from a validated submission
    pub fn submit(submission: ClaimSubmission, submitter: UserId) -> Self {
        let duration = EntitlementDuration::for_amount(submission.amount);

        Self {
            id: ClaimId::new_v7(),
            submitter,
            submitter_handle: submission.handle,
            transaction_ref: submission.transaction_ref,
            amount: submission.amount,
            duration,
            status: ClaimStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
            decided_by: None,
            note: None,
        }
    }

    /// Applies a moderator decision
    ///
    /// Only a pending claim can be decided; the transition is terminal.
    pub fn decide(
        &mut self,
        decision: Decision,
        moderator: UserId,
        note: Option<String>,
    ) -> Result<(), ClaimError> {
        if self.status.is_terminal() {
            return Err(ClaimError::AlreadyDecided {
                status: self.status,
            });
        }

        let now = Utc::now();
        self.status = decision.target_status();
        self.decided_at = Some(now);
        self.decided_by = Some(moderator);
        if let Some(text) = note {
            self.note = Some(ClaimNote {
                text,
                author: moderator,
                written_at: now,
            });
        }
        Ok(())
    }

    /// Sets or overwrites the annotation, independent of status
    pub fn annotate(&mut self, text: String, author: UserId) {
        self.note = Some(ClaimNote {
            text,
            author,
            written_at: Utc::now(),
        });
    }

    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }
}
