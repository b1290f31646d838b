//! Workflow orchestrator
//!
//! Owns the submit -> notify-admin -> decide -> notify-user -> audit-log
//! sequence. The orchestrator never enforces concurrency invariants itself:
//! transaction-reference uniqueness and the single-decision rule both live
//! in the store, and the orchestrator only reacts to their outcomes.
//!
//! Side-effect ordering is fixed: the store write always precedes outbound
//! notifications, so a delivery failure can never leave a claim in an
//! inconsistent status. Delivery failures are logged and isolated.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use core_kernel::{ChannelId, ClaimId, UserId};
use domain_claims::{
    Claim, ClaimStatus, ClaimSubmission, Decision, ModerationSession, PendingAction, SessionStore,
};
use infra_store::{ClaimStore, StoreError, LIST_CAP};

use crate::callback::{CallbackAction, CallbackToken};
use crate::format;
use crate::gateway::{ChatTarget, InlineButton, MessageRef, MessagingGateway};

/// The claim moderation workflow
pub struct ClaimWorkflow<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
    /// Decision allow-list, checked on every moderator action
    moderators: HashSet<UserId>,
    /// Moderation, audit, and provisioning surface
    audit_channel: ChannelId,
    sessions: Mutex<SessionStore>,
    /// Admin notification refs, for in-place edits after a decision
    admin_messages: Mutex<HashMap<ClaimId, MessageRef>>,
}

impl<S, G> ClaimWorkflow<S, G>
where
    S: ClaimStore,
    G: MessagingGateway,
{
    pub fn new(
        store: Arc<S>,
        gateway: Arc<G>,
        moderators: Vec<UserId>,
        audit_channel: ChannelId,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            moderators: moderators.into_iter().collect(),
            audit_channel,
            sessions: Mutex::new(SessionStore::new(session_ttl)),
            admin_messages: Mutex::new(HashMap::new()),
        }
    }

    /// Inbound text message hook
    ///
    /// Routing order matters: an active moderation session captures the
    /// moderator's reply before anything else, then commands, then the text
    /// is treated as a claim submission.
    pub async fn handle_text(&self, sender: UserId, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if self.moderators.contains(&sender) {
            let session = {
                let mut sessions = self.sessions.lock().await;
                sessions.purge_expired();
                sessions.resolve(sender)
            };
            if let Some(session) = session {
                self.apply_session_reply(session, sender, text).await;
                return;
            }
        }

        if let Some(rest) = text.strip_prefix("/claims") {
            self.handle_listing(sender, rest).await;
            return;
        }
        if text.starts_with("/start") {
            self.send(ChatTarget::User(sender), format::usage(), None).await;
            return;
        }

        self.handle_submission(sender, text).await;
    }

    /// Inbound button-press hook
    ///
    /// Authorization runs on every press, not once per conversation.
    pub async fn handle_callback(&self, actor: UserId, raw_token: &str) {
        if !self.moderators.contains(&actor) {
            warn!(%actor, "unauthorized decision attempt");
            self.send(ChatTarget::User(actor), format::denied(), None).await;
            return;
        }

        let token: CallbackToken = match raw_token.parse() {
            Ok(token) => token,
            Err(err) => {
                warn!(%actor, %err, "unparseable callback token");
                self.send(
                    ChatTarget::User(actor),
                    &format::stale_action("that button is no longer valid"),
                    None,
                )
                .await;
                return;
            }
        };

        match token.action {
            CallbackAction::Approve => self.approve(token.claim_id, actor).await,
            CallbackAction::Reject => {
                self.begin_two_step(token.claim_id, actor, PendingAction::Reject).await
            }
            CallbackAction::Note => {
                self.begin_two_step(token.claim_id, actor, PendingAction::Note).await
            }
            CallbackAction::Cancel => {
                let cancelled = self.sessions.lock().await.cancel(actor);
                let reply = if cancelled {
                    format::session_cancelled().to_string()
                } else {
                    format::stale_action("no action in progress")
                };
                self.send(ChatTarget::User(actor), &reply, None).await;
            }
        }
    }

    async fn handle_submission(&self, sender: UserId, text: &str) {
        let submission = match ClaimSubmission::parse(text) {
            Ok(submission) => submission,
            Err(failure) => {
                self.send(ChatTarget::User(sender), &failure.user_message(), None).await;
                return;
            }
        };

        let claim = Claim::submit(submission, sender);
        match self.store.create(claim).await {
            Ok(claim) => {
                info!(
                    claim_id = %claim.id,
                    submitter = %claim.submitter,
                    transaction_ref = %claim.transaction_ref,
                    amount = %claim.amount,
                    duration = %claim.duration,
                    "claim created"
                );
                self.send(ChatTarget::User(sender), &format::receipt(&claim), None).await;
                self.notify_admins(&claim).await;
            }
            Err(StoreError::Duplicate { transaction_ref }) => {
                info!(%sender, %transaction_ref, "duplicate submission refused");
                self.send(
                    ChatTarget::User(sender),
                    &format::duplicate_notice(&transaction_ref),
                    None,
                )
                .await;
                self.send(
                    ChatTarget::Channel(self.audit_channel),
                    &format::audit_duplicate(sender, &transaction_ref),
                    None,
                )
                .await;
            }
            Err(err) => {
                warn!(%sender, %err, "claim create failed");
                self.send(ChatTarget::User(sender), format::retry_later(), None).await;
            }
        }
    }

    async fn notify_admins(&self, claim: &Claim) {
        let buttons = vec![
            InlineButton::new(
                "\u{2705} Approve",
                CallbackToken::new(CallbackAction::Approve, claim.id).encode(),
            ),
            InlineButton::new(
                "\u{274C} Reject",
                CallbackToken::new(CallbackAction::Reject, claim.id).encode(),
            ),
            InlineButton::new(
                "\u{1F4DD} Note",
                CallbackToken::new(CallbackAction::Note, claim.id).encode(),
            ),
        ];

        if let Some(message) = self
            .send(
                ChatTarget::Channel(self.audit_channel),
                &format::admin_notification(claim),
                Some(buttons),
            )
            .await
        {
            self.admin_messages.lock().await.insert(claim.id, message);
        }
    }

    async fn approve(&self, claim_id: ClaimId, moderator: UserId) {
        match self
            .store
            .transition(claim_id, Decision::Approve, moderator, None)
            .await
        {
            Ok(claim) => self.finalize_decision(&claim, moderator).await,
            Err(err) => self.report_failed_action(moderator, err).await,
        }
    }

    async fn begin_two_step(&self, claim_id: ClaimId, moderator: UserId, action: PendingAction) {
        let claim = match self.store.get(claim_id).await {
            Ok(claim) => claim,
            Err(err) => {
                self.report_failed_action(moderator, err).await;
                return;
            }
        };

        // Rejection only makes sense while the claim is undecided; notes are
        // allowed at any time.
        if action == PendingAction::Reject && !claim.is_pending() {
            self.send(
                ChatTarget::User(moderator),
                &format::stale_action(&format!("claim is already {}", claim.status)),
                None,
            )
            .await;
            return;
        }

        self.sessions.lock().await.begin(moderator, claim_id, action);

        let prompt = match action {
            PendingAction::Reject => format::reject_prompt(&claim),
            PendingAction::Note => format::note_prompt(&claim),
        };
        let cancel = vec![InlineButton::new(
            "Cancel",
            CallbackToken::new(CallbackAction::Cancel, claim_id).encode(),
        )];
        self.send(ChatTarget::User(moderator), &prompt, Some(cancel)).await;
    }

    async fn apply_session_reply(
        &self,
        session: ModerationSession,
        moderator: UserId,
        reply: &str,
    ) {
        match session.action {
            PendingAction::Reject => {
                match self
                    .store
                    .transition(
                        session.claim_id,
                        Decision::Reject,
                        moderator,
                        Some(reply.to_string()),
                    )
                    .await
                {
                    Ok(claim) => {
                        self.finalize_decision(&claim, moderator).await;
                        self.send(
                            ChatTarget::User(moderator),
                            &format::rejection_recorded(&claim),
                            None,
                        )
                        .await;
                    }
                    Err(err) => self.report_failed_action(moderator, err).await,
                }
            }
            PendingAction::Note => {
                match self
                    .store
                    .annotate(session.claim_id, reply.to_string(), moderator)
                    .await
                {
                    Ok(claim) => {
                        info!(claim_id = %claim.id, %moderator, "note saved");
                        self.send(ChatTarget::User(moderator), &format::note_saved(&claim), None)
                            .await;
                    }
                    Err(err) => self.report_failed_action(moderator, err).await,
                }
            }
        }
    }

    /// Post-transition fan-out; the decision is already committed
    async fn finalize_decision(&self, claim: &Claim, moderator: UserId) {
        info!(
            claim_id = %claim.id,
            status = %claim.status,
            %moderator,
            "claim decided"
        );

        self.send(
            ChatTarget::User(claim.submitter),
            &format::outcome(claim),
            None,
        )
        .await;

        let admin_message = self.admin_messages.lock().await.get(&claim.id).copied();
        if let Some(message) = admin_message {
            if let Err(err) = self
                .gateway
                .edit_message(
                    ChatTarget::Channel(self.audit_channel),
                    message,
                    &format::admin_decided(claim, moderator),
                )
                .await
            {
                warn!(claim_id = %claim.id, %err, "admin message edit failed");
            }
        }

        self.send(
            ChatTarget::Channel(self.audit_channel),
            &format::audit_decision(claim, moderator),
            None,
        )
        .await;

        if claim.status == ClaimStatus::Approved {
            self.send(
                ChatTarget::Channel(self.audit_channel),
                &format::provisioning_command(claim),
                None,
            )
            .await;
        }
    }

    async fn handle_listing(&self, sender: UserId, args: &str) {
        if !self.moderators.contains(&sender) {
            self.send(ChatTarget::User(sender), format::denied(), None).await;
            return;
        }

        let filter = match args.trim() {
            "" | "all" => None,
            "pending" => Some(ClaimStatus::Pending),
            "approved" => Some(ClaimStatus::Approved),
            "rejected" => Some(ClaimStatus::Rejected),
            other => {
                self.send(
                    ChatTarget::User(sender),
                    &format!(
                        "Unknown filter '{}'. Use /claims [pending|approved|rejected|all].",
                        other
                    ),
                    None,
                )
                .await;
                return;
            }
        };

        match self.store.list(filter, LIST_CAP).await {
            Ok(claims) => {
                self.send(
                    ChatTarget::User(sender),
                    &format::listing(&claims, filter),
                    None,
                )
                .await;
            }
            Err(err) => {
                warn!(%sender, %err, "listing failed");
                self.send(ChatTarget::User(sender), format::retry_later(), None).await;
            }
        }
    }

    /// Stale or failed moderator actions surface as non-destructive messages
    async fn report_failed_action(&self, moderator: UserId, err: StoreError) {
        let reply = match &err {
            StoreError::AlreadyDecided { status } => {
                format::stale_action(&format!("another moderator already marked it {}", status))
            }
            StoreError::NotFound(id) => {
                format::stale_action(&format!("claim {} no longer exists", id))
            }
            _ => {
                warn!(%moderator, %err, "store operation failed");
                format::retry_later().to_string()
            }
        };
        self.send(ChatTarget::User(moderator), &reply, None).await;
    }

    /// Fire-and-record delivery; failures are logged, never propagated
    async fn send(
        &self,
        target: ChatTarget,
        text: &str,
        buttons: Option<Vec<InlineButton>>,
    ) -> Option<MessageRef> {
        match self.gateway.send_message(target, text, buttons).await {
            Ok(message) => Some(message),
            Err(err) => {
                warn!(%target, %err, "message delivery failed");
                None
            }
        }
    }
}
