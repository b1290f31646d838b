//! Recording gateway mock
//!
//! An in-memory stand-in for the chat platform: records every outbound
//! message and edit so workflow tests can assert on them, and can be armed
//! to fail deliveries to exercise failure isolation.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use interface_bot::{ChatTarget, GatewayError, InlineButton, MessageRef, MessagingGateway};

/// A recorded outbound message
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub target: ChatTarget,
    pub text: String,
    pub buttons: Option<Vec<InlineButton>>,
    pub message: MessageRef,
}

/// A recorded in-place edit
#[derive(Debug, Clone)]
pub struct EditedMessage {
    pub target: ChatTarget,
    pub message: MessageRef,
    pub text: String,
}

/// Gateway mock that records instead of delivering
#[derive(Debug, Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<SentMessage>>,
    edits: Mutex<Vec<EditedMessage>>,
    fail_delivery: AtomicBool,
    next_ref: AtomicI64,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms or disarms delivery failures
    pub fn fail_deliveries(&self, fail: bool) {
        self.fail_delivery.store(fail, Ordering::SeqCst);
    }

    /// All recorded sends, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// All recorded edits, in order
    pub fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().unwrap().clone()
    }

    /// Texts delivered to one target, in order
    pub fn texts_to(&self, target: ChatTarget) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.target == target)
            .map(|m| m.text.clone())
            .collect()
    }

    /// The most recent text delivered to one target
    pub fn last_text_to(&self, target: ChatTarget) -> Option<String> {
        self.texts_to(target).pop()
    }

    /// Buttons on the most recent message to one target that carried any
    pub fn last_buttons_to(&self, target: ChatTarget) -> Option<Vec<InlineButton>> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.target == target && m.buttons.is_some())
            .and_then(|m| m.buttons.clone())
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_message(
        &self,
        target: ChatTarget,
        text: &str,
        buttons: Option<Vec<InlineButton>>,
    ) -> Result<MessageRef, GatewayError> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            return Err(GatewayError::Delivery {
                target: target.to_string(),
                reason: "gateway armed to fail".to_string(),
            });
        }

        let message = MessageRef::new(self.next_ref.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().unwrap().push(SentMessage {
            target,
            text: text.to_string(),
            buttons,
            message,
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        target: ChatTarget,
        message: MessageRef,
        text: &str,
    ) -> Result<(), GatewayError> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            return Err(GatewayError::Edit {
                message_ref: message.as_i64(),
                reason: "gateway armed to fail".to_string(),
            });
        }

        self.edits.lock().unwrap().push(EditedMessage {
            target,
            message,
            text: text.to_string(),
        });
        Ok(())
    }
}
