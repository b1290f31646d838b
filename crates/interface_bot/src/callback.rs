//! Structured callback tokens
//!
//! Button payloads encode `{action, claim_id}`. The encoding is
//! `<action>:<uuid>` with fixed keyword actions and a canonical UUID, so the
//! `:` delimiter can never appear inside either part. Parsing rejects
//! unknown actions and malformed ids instead of guessing.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use core_kernel::ClaimId;

/// What a button press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Approve the claim
    Approve,
    /// Start the two-step rejection (prompts for a reason)
    Reject,
    /// Start the two-step annotation
    Note,
    /// Abort the moderator's in-flight two-step action
    Cancel,
}

impl CallbackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAction::Approve => "approve",
            CallbackAction::Reject => "reject",
            CallbackAction::Note => "note",
            CallbackAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a callback token failed to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenParseError {
    #[error("missing delimiter in callback token")]
    MissingDelimiter,

    #[error("unknown callback action: {0}")]
    UnknownAction(String),

    #[error("invalid claim id in callback token")]
    InvalidClaimId,
}

/// A decoded button payload bound to one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackToken {
    pub action: CallbackAction,
    pub claim_id: ClaimId,
}

impl CallbackToken {
    pub fn new(action: CallbackAction, claim_id: ClaimId) -> Self {
        Self { action, claim_id }
    }

    /// Renders the wire form, e.g. `approve:0192f9a3-...`
    pub fn encode(&self) -> String {
        format!("{}:{}", self.action.as_str(), self.claim_id.as_uuid())
    }
}

impl FromStr for CallbackToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action_raw, id_raw) = s.split_once(':').ok_or(TokenParseError::MissingDelimiter)?;

        let action = match action_raw {
            "approve" => CallbackAction::Approve,
            "reject" => CallbackAction::Reject,
            "note" => CallbackAction::Note,
            "cancel" => CallbackAction::Cancel,
            other => return Err(TokenParseError::UnknownAction(other.to_string())),
        };

        let uuid = Uuid::parse_str(id_raw).map_err(|_| TokenParseError::InvalidClaimId)?;
        Ok(Self {
            action,
            claim_id: ClaimId::from_uuid(uuid),
        })
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
