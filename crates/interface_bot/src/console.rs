//! Console gateway adapter
//!
//! A stand-in platform adapter for local runs: outbound messages are
//! printed through `tracing`, message refs are a simple counter. Useful for
//! exercising the workflow end to end from a terminal.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::gateway::{ChatTarget, GatewayError, InlineButton, MessageRef, MessagingGateway};

/// Gateway adapter that logs outbound traffic instead of delivering it
#[derive(Debug, Default)]
pub struct ConsoleGateway {
    next_ref: AtomicI64,
}

impl ConsoleGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingGateway for ConsoleGateway {
    async fn send_message(
        &self,
        target: ChatTarget,
        text: &str,
        buttons: Option<Vec<InlineButton>>,
    ) -> Result<MessageRef, GatewayError> {
        let message = MessageRef::new(self.next_ref.fetch_add(1, Ordering::Relaxed));
        match buttons {
            Some(buttons) => {
                let tokens: Vec<String> = buttons
                    .iter()
                    .map(|b| format!("[{} -> {}]", b.label, b.token))
                    .collect();
                info!(%target, message = %message.as_i64(), buttons = %tokens.join(" "), "\n{text}");
            }
            None => info!(%target, message = %message.as_i64(), "\n{text}"),
        }
        Ok(message)
    }

    async fn edit_message(
        &self,
        target: ChatTarget,
        message: MessageRef,
        text: &str,
    ) -> Result<(), GatewayError> {
        info!(%target, message = %message.as_i64(), "(edited)\n{text}");
        Ok(())
    }
}
