//! In-memory claim store semantics
//!
//! The SQL adapter provides the same guarantees through the database; these
//! tests pin down the contract every adapter must satisfy.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::UserId;
use domain_claims::{Claim, ClaimStatus, ClaimSubmission, Decision};
use infra_store::{ClaimStore, InMemoryClaimStore, StoreError, LIST_CAP};

fn claim_with_ref(transaction_ref: &str) -> Claim {
    let submission = ClaimSubmission {
        handle: "alice".to_string(),
        transaction_ref: transaction_ref.to_string(),
        amount: dec!(25),
    };
    Claim::submit(submission, UserId::new(1001))
}

#[tokio::test]
async fn test_create_and_get() {
    let store = InMemoryClaimStore::new();
    let claim = store.create(claim_with_ref("111111111111")).await.unwrap();

    let fetched = store.get(claim.id).await.unwrap();
    assert_eq!(fetched.transaction_ref, "111111111111");
    assert_eq!(fetched.status, ClaimStatus::Pending);
}

#[tokio::test]
async fn test_duplicate_reference_creates_exactly_one_claim() {
    let store = InMemoryClaimStore::new();
    let first = store.create(claim_with_ref("222222222222")).await.unwrap();

    let second = store.create(claim_with_ref("222222222222")).await;
    assert!(matches!(
        second,
        Err(StoreError::Duplicate { ref transaction_ref }) if transaction_ref == "222222222222"
    ));

    // First record untouched by the failed attempt
    let fetched = store.get(first.id).await.unwrap();
    assert_eq!(fetched.status, ClaimStatus::Pending);
    assert_eq!(store.list(None, 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transition_approves_pending_claim() {
    let store = InMemoryClaimStore::new();
    let claim = store.create(claim_with_ref("333333333333")).await.unwrap();
    let moderator = UserId::new(9001);

    let decided = store
        .transition(claim.id, Decision::Approve, moderator, None)
        .await
        .unwrap();

    assert_eq!(decided.status, ClaimStatus::Approved);
    assert_eq!(decided.decided_by, Some(moderator));
    assert!(decided.decided_at.is_some());
}

#[tokio::test]
async fn test_transition_is_single_shot() {
    let store = InMemoryClaimStore::new();
    let claim = store.create(claim_with_ref("444444444444")).await.unwrap();

    store
        .transition(claim.id, Decision::Approve, UserId::new(9001), None)
        .await
        .unwrap();

    let second = store
        .transition(claim.id, Decision::Reject, UserId::new(9002), None)
        .await;
    assert!(matches!(
        second,
        Err(StoreError::AlreadyDecided {
            status: ClaimStatus::Approved
        })
    ));

    // Record unchanged by the losing decision
    let fetched = store.get(claim.id).await.unwrap();
    assert_eq!(fetched.status, ClaimStatus::Approved);
    assert_eq!(fetched.decided_by, Some(UserId::new(9001)));
}

#[tokio::test]
async fn test_concurrent_decisions_have_one_winner() {
    let store = Arc::new(InMemoryClaimStore::new());
    let claim = store.create(claim_with_ref("555555555555")).await.unwrap();

    let approve = {
        let store = Arc::clone(&store);
        let id = claim.id;
        tokio::spawn(async move {
            store
                .transition(id, Decision::Approve, UserId::new(9001), None)
                .await
        })
    };
    let reject = {
        let store = Arc::clone(&store);
        let id = claim.id;
        tokio::spawn(async move {
            store
                .transition(id, Decision::Reject, UserId::new(9002), Some("reason".into()))
                .await
        })
    };

    let results = [approve.await.unwrap(), reject.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);

    let fetched = store.get(claim.id).await.unwrap();
    assert!(fetched.status.is_terminal());
}

#[tokio::test]
async fn test_transition_unknown_claim() {
    let store = InMemoryClaimStore::new();
    let result = store
        .transition(
            core_kernel::ClaimId::new_v7(),
            Decision::Approve,
            UserId::new(9001),
            None,
        )
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_annotate_any_status() {
    let store = InMemoryClaimStore::new();
    let claim = store.create(claim_with_ref("666666666666")).await.unwrap();
    let author = UserId::new(9001);

    let annotated = store
        .annotate(claim.id, "checked manually".to_string(), author)
        .await
        .unwrap();
    assert_eq!(annotated.note.as_ref().unwrap().text, "checked manually");

    // Still works after the claim is decided, and overwrites
    store
        .transition(claim.id, Decision::Approve, author, None)
        .await
        .unwrap();
    let overwritten = store
        .annotate(claim.id, "verified in bank statement".to_string(), author)
        .await
        .unwrap();
    assert_eq!(
        overwritten.note.unwrap().text,
        "verified in bank statement"
    );
}

#[tokio::test]
async fn test_list_newest_first_with_filter_and_cap() {
    let store = InMemoryClaimStore::new();

    for i in 0..60u32 {
        let claim = store
            .create(claim_with_ref(&format!("{:012}", i)))
            .await
            .unwrap();
        if i % 2 == 0 {
            store
                .transition(claim.id, Decision::Approve, UserId::new(9001), None)
                .await
                .unwrap();
        }
        // Distinct creation timestamps for a stable ordering check
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }

    let all = store.list(None, 1000).await.unwrap();
    assert_eq!(all.len(), LIST_CAP);
    assert!(all
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let pending = store.list(Some(ClaimStatus::Pending), 50).await.unwrap();
    assert_eq!(pending.len(), 30);
    assert!(pending.iter().all(|c| c.status == ClaimStatus::Pending));

    let limited = store.list(None, 5).await.unwrap();
    assert_eq!(limited.len(), 5);
}
