//! Chat Interface Layer
//!
//! This crate wires the claim domain and store to a messaging platform:
//!
//! - **Gateway**: the outbound port a platform adapter implements
//! - **Callback tokens**: structured button payloads bound to a claim
//! - **Orchestrator**: the submit -> moderate -> notify -> audit workflow
//! - **Config**: environment-driven settings (moderators, channels, store)
//!
//! The chat transport itself is an external collaborator; inbound events
//! reach the orchestrator through [`ClaimWorkflow::handle_text`] and
//! [`ClaimWorkflow::handle_callback`].

pub mod callback;
pub mod config;
pub mod console;
pub mod format;
pub mod gateway;
pub mod orchestrator;

pub use callback::{CallbackAction, CallbackToken, TokenParseError};
pub use config::BotConfig;
pub use gateway::{ChatTarget, GatewayError, InlineButton, MessageRef, MessagingGateway};
pub use orchestrator::ClaimWorkflow;
