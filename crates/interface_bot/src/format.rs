//! Outbound message rendering
//!
//! All user- and moderator-facing text lives here so the orchestrator reads
//! as pure workflow.

use domain_claims::{Claim, ClaimStatus};

use core_kernel::UserId;

/// Reply to `/start`
pub fn usage() -> &'static str {
    "\u{1F4B0} Send your payment details:\n\
     Format: username transaction_id amount\n\n\
     Example: john_doe 123456789012 50"
}

/// Receipt sent to the submitter after a successful create
pub fn receipt(claim: &Claim) -> String {
    format!(
        "\u{2705} Received! Your payment of {} grants {} of premium access \
         once approved. An admin will verify shortly.\n\
         Txn: {}",
        claim.amount,
        claim.duration.label(),
        claim.transaction_ref
    )
}

/// Told to the submitter when the reference was already claimed
pub fn duplicate_notice(transaction_ref: &str) -> String {
    format!(
        "\u{26A0} Transaction {} was already submitted. \
         No new claim was created.",
        transaction_ref
    )
}

/// Generic message when the store did not confirm a write
pub fn retry_later() -> &'static str {
    "Something went wrong on our side. Please try again in a few minutes."
}

/// Generic denial for unauthorized actors; leaks nothing about the claim
pub fn denied() -> &'static str {
    "\u{274C} Access denied"
}

/// The moderation-channel notification for a new claim
pub fn admin_notification(claim: &Claim) -> String {
    format!(
        "\u{1F195} Payment Submission\n\n\
         \u{1F464} @{} ({})\n\
         \u{1F4B3} {}\n\
         \u{1F4B0} {}  \u{2192}  {}\n\
         \u{23F0} {}",
        claim.submitter_handle,
        claim.submitter,
        claim.transaction_ref,
        claim.amount,
        claim.duration.label(),
        claim.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// Replacement text for the admin notification once decided
///
/// Applied as an in-place edit; rendering is deterministic so a repeated
/// edit after a redelivered callback is idempotent.
pub fn admin_decided(claim: &Claim, moderator: UserId) -> String {
    let verdict = match claim.status {
        ClaimStatus::Approved => "\u{2705} Approved",
        ClaimStatus::Rejected => "\u{274C} Rejected",
        ClaimStatus::Pending => "\u{23F3} Pending",
    };
    let mut text = format!("{}\n\n{} by {}", admin_notification(claim), verdict, moderator);
    if let Some(note) = &claim.note {
        text.push_str(&format!("\nNote: {}", note.text));
    }
    text
}

/// Outcome message to the submitter
pub fn outcome(claim: &Claim) -> String {
    match claim.status {
        ClaimStatus::Approved => format!(
            "\u{1F514} Payment approved!\n\n\
             Txn: {}\n\
             Amount: {}\n\n\
             \u{2705} {} of premium access will be activated soon",
            claim.transaction_ref,
            claim.amount,
            claim.duration.label()
        ),
        ClaimStatus::Rejected => {
            let reason = claim
                .note
                .as_ref()
                .map(|n| n.text.as_str())
                .unwrap_or("no reason given");
            format!(
                "\u{1F514} Payment rejected.\n\n\
                 Txn: {}\n\
                 Reason: {}\n\n\
                 \u{274C} Contact an admin for help",
                claim.transaction_ref, reason
            )
        }
        ClaimStatus::Pending => receipt(claim),
    }
}

/// The one-way provisioning instruction for the downstream system
pub fn provisioning_command(claim: &Claim) -> String {
    format!(
        "/add_premium {} {}",
        claim.submitter,
        claim.duration.label()
    )
}

/// Audit-channel record of a decision
pub fn audit_decision(claim: &Claim, moderator: UserId) -> String {
    format!(
        "Payment {}\n\n\
         User: @{}\n\
         Txn: {}\n\
         Amount: {}\n\
         Admin: {}",
        claim.status, claim.submitter_handle, claim.transaction_ref, claim.amount, moderator
    )
}

/// Audit-channel record of a refused duplicate submission
pub fn audit_duplicate(submitter: UserId, transaction_ref: &str) -> String {
    format!(
        "Duplicate submission refused\n\nUser: {}\nTxn: {}",
        submitter, transaction_ref
    )
}

/// Prompt after a moderator presses Reject
pub fn reject_prompt(claim: &Claim) -> String {
    format!(
        "Rejecting claim for txn {}. Reply with the reason, or cancel.",
        claim.transaction_ref
    )
}

/// Prompt after a moderator presses Note
pub fn note_prompt(claim: &Claim) -> String {
    format!(
        "Adding a note to the claim for txn {}. Reply with the note text, or cancel.",
        claim.transaction_ref
    )
}

/// Told to a moderator whose action raced and lost, or targeted a gone claim
pub fn stale_action(detail: &str) -> String {
    format!("\u{26A0} Nothing changed: {}", detail)
}

/// Moderator listing of recent claims
pub fn listing(claims: &[Claim], filter: Option<ClaimStatus>) -> String {
    let heading = match filter {
        Some(status) => format!("Claims ({})", status),
        None => "Claims (all)".to_string(),
    };

    if claims.is_empty() {
        return format!("{}\n\nNothing to show.", heading);
    }

    let mut out = format!("{}\n", heading);
    for claim in claims {
        out.push_str(&format!(
            "\n[{}] @{} {} {} \u{2192} {}",
            claim.status,
            claim.submitter_handle,
            claim.transaction_ref,
            claim.amount,
            claim.duration.label()
        ));
    }
    out
}

/// Confirmation after a note reply was applied
pub fn note_saved(claim: &Claim) -> String {
    format!("Note saved on claim for txn {}.", claim.transaction_ref)
}

/// Confirmation after a session was cancelled
pub fn session_cancelled() -> &'static str {
    "Cancelled."
}

/// Reminder when a decision outcome is rendered for a decision made by this press
pub fn rejection_recorded(claim: &Claim) -> String {
    format!(
        "Rejection recorded for txn {}. The user has been notified.",
        claim.transaction_ref
    )
}
