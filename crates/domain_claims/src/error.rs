//! Claim domain errors

use thiserror::Error;

use crate::claim::ClaimStatus;

/// Errors that can occur in the claim domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("claim already decided: status is {status}")]
    AlreadyDecided { status: ClaimStatus },

    #[error("unknown claim status: {0}")]
    UnknownStatus(String),
}
