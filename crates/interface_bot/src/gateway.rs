//! Messaging gateway port
//!
//! The chat platform is an external collaborator. Platform adapters
//! implement [`MessagingGateway`] for outbound delivery; inbound events are
//! pushed into the orchestrator by the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use core_kernel::{ChannelId, UserId};

/// Where an outbound message goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatTarget {
    /// Direct message to a user
    User(UserId),
    /// A group chat or channel (moderation, audit)
    Channel(ChannelId),
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::User(id) => write!(f, "user:{}", id),
            ChatTarget::Channel(id) => write!(f, "channel:{}", id),
        }
    }
}

/// Platform handle to a delivered message, needed for in-place edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRef(i64);

impl MessageRef {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// An inline button attached to a message
///
/// `token` is the encoded [`crate::CallbackToken`] the platform echoes back
/// when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub token: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Errors from outbound delivery
///
/// Delivery failures are isolated by the orchestrator: logged, sometimes
/// escalated, never allowed to roll back a committed state transition.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("delivery failed to {target}: {reason}")]
    Delivery { target: String, reason: String },

    #[error("edit failed for message {message_ref}: {reason}")]
    Edit { message_ref: i64, reason: String },
}

/// Outbound port to the chat platform
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Delivers a message, optionally with inline buttons
    async fn send_message(
        &self,
        target: ChatTarget,
        text: &str,
        buttons: Option<Vec<InlineButton>>,
    ) -> Result<MessageRef, GatewayError>;

    /// Replaces the text of a previously delivered message
    async fn edit_message(
        &self,
        target: ChatTarget,
        message: MessageRef,
        text: &str,
    ) -> Result<(), GatewayError>;
}
