//! Canonical test identities and a ready-made workflow

use std::sync::Arc;

use core_kernel::{ChannelId, UserId};
use infra_store::InMemoryClaimStore;
use interface_bot::{ChatTarget, ClaimWorkflow};

use crate::gateway::RecordingGateway;

pub const MODERATOR: UserId = UserId::new(9001);
pub const SECOND_MODERATOR: UserId = UserId::new(9002);
pub const SUBMITTER: UserId = UserId::new(1001);
pub const OUTSIDER: UserId = UserId::new(666);

pub const AUDIT_CHANNEL_ID: i64 = -100_500;

pub fn audit_channel() -> ChannelId {
    ChannelId::new(AUDIT_CHANNEL_ID)
}

pub fn audit_target() -> ChatTarget {
    ChatTarget::Channel(audit_channel())
}

pub fn user_target(user: UserId) -> ChatTarget {
    ChatTarget::User(user)
}

/// An in-memory workflow wired to a recording gateway, with the canonical
/// moderators configured
pub fn test_workflow() -> (
    Arc<InMemoryClaimStore>,
    Arc<RecordingGateway>,
    ClaimWorkflow<InMemoryClaimStore, RecordingGateway>,
) {
    let store = Arc::new(InMemoryClaimStore::new());
    let gateway = Arc::new(RecordingGateway::new());
    let workflow = ClaimWorkflow::new(
        Arc::clone(&store),
        Arc::clone(&gateway),
        vec![MODERATOR, SECOND_MODERATOR],
        audit_channel(),
        chrono::Duration::seconds(600),
    );
    (store, gateway, workflow)
}
