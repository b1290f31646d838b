//! End-to-end workflow tests
//!
//! Drive the orchestrator through the same two hooks a platform adapter
//! would call, against the in-memory store and the recording gateway.

use domain_claims::ClaimStatus;
use infra_store::ClaimStore;
use test_utils::{
    audit_target, submission_text, test_workflow, unique_transaction_ref, user_target, MODERATOR,
    OUTSIDER, SECOND_MODERATOR, SUBMITTER,
};

/// Pulls the encoded token for one action off the latest admin notification
fn admin_button_token(gateway: &test_utils::RecordingGateway, action: &str) -> String {
    gateway
        .last_buttons_to(audit_target())
        .expect("admin notification carries buttons")
        .into_iter()
        .find(|b| b.token.starts_with(action))
        .map(|b| b.token)
        .expect("requested action button present")
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_valid_submission_creates_pending_claim_and_notifies() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;

    let claims = store.list(None, 50).await.unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].status, ClaimStatus::Pending);
    assert_eq!(claims[0].duration.label(), "1month");

    let receipt = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(receipt.contains("1month"));

    let notification = gateway.last_text_to(audit_target()).unwrap();
    assert!(notification.contains("@alice"));
    assert!(notification.contains("123456789012"));
    assert_eq!(
        gateway.last_buttons_to(audit_target()).unwrap().len(),
        3,
        "approve, reject, note"
    );
}

#[tokio::test]
async fn test_malformed_submission_creates_nothing() {
    let (store, gateway, workflow) = test_workflow();

    // Reference is not 12 digits
    workflow.handle_text(SUBMITTER, "alice 123 25").await;

    assert!(store.list(None, 50).await.unwrap().is_empty());
    let reply = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(reply.contains("Invalid format"));
    assert!(gateway.texts_to(audit_target()).is_empty());
}

#[tokio::test]
async fn test_above_cap_amount_is_refused_at_validation() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 200")
        .await;

    assert!(store.list(None, 50).await.unwrap().is_empty());
    let reply = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(reply.contains("maximum"));
}

#[tokio::test]
async fn test_duplicate_submission_is_refused_and_audited() {
    let (store, gateway, workflow) = test_workflow();
    let text = submission_text("alice", "123456789012", "25");

    workflow.handle_text(SUBMITTER, &text).await;
    workflow.handle_text(SUBMITTER, &text).await;

    assert_eq!(store.list(None, 50).await.unwrap().len(), 1);

    let reply = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(reply.contains("already submitted"));

    let audit = gateway.last_text_to(audit_target()).unwrap();
    assert!(audit.contains("Duplicate submission refused"));
}

#[tokio::test]
async fn test_start_command_replies_with_usage() {
    let (_store, gateway, workflow) = test_workflow();

    workflow.handle_text(SUBMITTER, "/start").await;

    let reply = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(reply.contains("transaction_id"));
}

// ============================================================================
// Approval
// ============================================================================

#[tokio::test]
async fn test_approve_path_end_to_end() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "approve");

    workflow.handle_callback(MODERATOR, &token).await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Approved);
    assert_eq!(claim.decided_by, Some(MODERATOR));
    assert!(claim.decided_at.is_some());

    // Submitter hears about the outcome
    let outcome = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(outcome.contains("approved"));

    // Admin notification edited in place, not re-sent
    let edits = gateway.edits();
    assert_eq!(edits.len(), 1);
    assert!(edits[0].text.contains("Approved"));

    // Provisioning command emitted to the audit channel
    let audit_texts = gateway.texts_to(audit_target());
    assert!(audit_texts
        .iter()
        .any(|t| t == &format!("/add_premium {} 1month", SUBMITTER)));
}

#[tokio::test]
async fn test_second_decision_loses_and_changes_nothing() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "approve");

    workflow.handle_callback(MODERATOR, &token).await;
    workflow.handle_callback(SECOND_MODERATOR, &token).await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.decided_by, Some(MODERATOR));

    let reply = gateway.last_text_to(user_target(SECOND_MODERATOR)).unwrap();
    assert!(reply.contains("Nothing changed"));
}

#[tokio::test]
async fn test_unauthorized_press_gets_generic_denial() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "approve");

    workflow.handle_callback(OUTSIDER, &token).await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Pending);

    // Generic denial, nothing about the claim
    let reply = gateway.last_text_to(user_target(OUTSIDER)).unwrap();
    assert!(reply.contains("Access denied"));
    assert!(!reply.contains("123456789012"));
}

// ============================================================================
// Rejection (two-step)
// ============================================================================

#[tokio::test]
async fn test_reject_with_reason_end_to_end() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "reject");

    workflow.handle_callback(MODERATOR, &token).await;

    // Moderator is prompted for a reason, with a cancel escape hatch
    let prompt = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(prompt.contains("reason"));
    assert!(gateway.last_buttons_to(user_target(MODERATOR)).is_some());

    // Claim is untouched until the reason arrives
    assert_eq!(
        store.list(None, 50).await.unwrap()[0].status,
        ClaimStatus::Pending
    );

    workflow.handle_text(MODERATOR, "reference not found").await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Rejected);
    assert_eq!(claim.note.as_ref().unwrap().text, "reference not found");

    let outcome = gateway.last_text_to(user_target(SUBMITTER)).unwrap();
    assert!(outcome.contains("rejected"));
    assert!(outcome.contains("reference not found"));

    // Rejected claims are retained, not deleted
    assert_eq!(store.list(Some(ClaimStatus::Rejected), 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_aborts_rejection() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let reject = admin_button_token(&gateway, "reject");

    workflow.handle_callback(MODERATOR, &reject).await;
    let cancel = gateway
        .last_buttons_to(user_target(MODERATOR))
        .unwrap()
        .remove(0)
        .token;
    workflow.handle_callback(MODERATOR, &cancel).await;

    assert_eq!(
        gateway.last_text_to(user_target(MODERATOR)).unwrap(),
        "Cancelled."
    );
    assert_eq!(
        store.list(None, 50).await.unwrap()[0].status,
        ClaimStatus::Pending
    );

    // With no session, moderator text goes through normal routing again
    workflow.handle_text(MODERATOR, "not a submission").await;
    let reply = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(reply.contains("Invalid format"));
}

#[tokio::test]
async fn test_reject_press_on_decided_claim_is_stale() {
    let (_store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let approve = admin_button_token(&gateway, "approve");
    let reject = admin_button_token(&gateway, "reject");

    workflow.handle_callback(MODERATOR, &approve).await;
    workflow.handle_callback(SECOND_MODERATOR, &reject).await;

    let reply = gateway.last_text_to(user_target(SECOND_MODERATOR)).unwrap();
    assert!(reply.contains("already approved"));
}

// ============================================================================
// Notes
// ============================================================================

#[tokio::test]
async fn test_note_flow_annotates_without_deciding() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "note");

    workflow.handle_callback(MODERATOR, &token).await;
    workflow.handle_text(MODERATOR, "checked bank statement").await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Pending);
    assert_eq!(claim.note.as_ref().unwrap().text, "checked bank statement");
    assert_eq!(claim.note.as_ref().unwrap().author, MODERATOR);

    let reply = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(reply.contains("Note saved"));
}

#[tokio::test]
async fn test_note_allowed_after_decision() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let approve = admin_button_token(&gateway, "approve");
    let note = admin_button_token(&gateway, "note");

    workflow.handle_callback(MODERATOR, &approve).await;
    workflow.handle_callback(MODERATOR, &note).await;
    workflow.handle_text(MODERATOR, "verified afterwards").await;

    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Approved);
    assert_eq!(claim.note.as_ref().unwrap().text, "verified afterwards");
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_listing_filters_and_requires_moderator() {
    let (_store, gateway, workflow) = test_workflow();

    for amount in ["10", "25", "60"] {
        let text = submission_text("alice", &unique_transaction_ref(), amount);
        workflow.handle_text(SUBMITTER, &text).await;
    }
    let approve = admin_button_token(&gateway, "approve");
    workflow.handle_callback(MODERATOR, &approve).await;

    workflow.handle_text(MODERATOR, "/claims pending").await;
    let listing = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(listing.contains("Claims (pending)"));
    assert_eq!(listing.matches("[pending]").count(), 2);

    workflow.handle_text(MODERATOR, "/claims approved").await;
    let listing = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert_eq!(listing.matches("[approved]").count(), 1);

    workflow.handle_text(MODERATOR, "/claims").await;
    let listing = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(listing.contains("Claims (all)"));

    workflow.handle_text(MODERATOR, "/claims bogus").await;
    let listing = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(listing.contains("Unknown filter"));

    workflow.handle_text(OUTSIDER, "/claims").await;
    let reply = gateway.last_text_to(user_target(OUTSIDER)).unwrap();
    assert!(reply.contains("Access denied"));
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_delivery_failure_never_blocks_the_stored_claim() {
    let (store, gateway, workflow) = test_workflow();

    gateway.fail_deliveries(true);
    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;

    // Nothing got delivered, but the claim is safely stored
    assert!(gateway.sent().is_empty());
    let claim = &store.list(None, 50).await.unwrap()[0];
    assert_eq!(claim.status, ClaimStatus::Pending);

    // And it can still be decided once delivery recovers
    gateway.fail_deliveries(false);
    let token = format!("approve:{}", claim.id.as_uuid());
    workflow.handle_callback(MODERATOR, &token).await;
    assert_eq!(
        store.list(None, 50).await.unwrap()[0].status,
        ClaimStatus::Approved
    );
}

#[tokio::test]
async fn test_delivery_failure_after_decision_keeps_transition() {
    let (store, gateway, workflow) = test_workflow();

    workflow
        .handle_text(SUBMITTER, "alice 123456789012 25")
        .await;
    let token = admin_button_token(&gateway, "approve");

    gateway.fail_deliveries(true);
    workflow.handle_callback(MODERATOR, &token).await;

    // The committed transition survives the notification blackout
    assert_eq!(
        store.list(None, 50).await.unwrap()[0].status,
        ClaimStatus::Approved
    );
}

#[tokio::test]
async fn test_garbage_callback_token_is_harmless() {
    let (_store, gateway, workflow) = test_workflow();

    workflow.handle_callback(MODERATOR, "approve_oldstyle").await;
    let reply = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(reply.contains("no longer valid"));

    workflow
        .handle_callback(MODERATOR, "delete:0192f9a3-aaaa-bbbb-cccc-ddddeeeeffff")
        .await;
    let reply = gateway.last_text_to(user_target(MODERATOR)).unwrap();
    assert!(reply.contains("no longer valid"));
}
