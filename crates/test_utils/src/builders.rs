//! Builders for test data construction

use std::sync::atomic::{AtomicU64, Ordering};

use fake::faker::internet::en::Username;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::UserId;
use domain_claims::{Claim, ClaimSubmission};

static NEXT_REF: AtomicU64 = AtomicU64::new(100_000_000_000);

/// A fresh 12-digit transaction reference, unique within the process
pub fn unique_transaction_ref() -> String {
    format!("{:012}", NEXT_REF.fetch_add(1, Ordering::SeqCst))
}

/// A plausible random handle
pub fn random_handle() -> String {
    let handle: String = Username().fake();
    handle.to_lowercase()
}

/// Builder for pending claims
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    handle: String,
    transaction_ref: String,
    amount: Decimal,
    submitter: UserId,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self {
            handle: "alice".to_string(),
            transaction_ref: unique_transaction_ref(),
            amount: dec!(25),
            submitter: UserId::new(1001),
        }
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    pub fn transaction_ref(mut self, transaction_ref: impl Into<String>) -> Self {
        self.transaction_ref = transaction_ref.into();
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn submitter(mut self, submitter: UserId) -> Self {
        self.submitter = submitter;
        self
    }

    pub fn build(self) -> Claim {
        Claim::submit(
            ClaimSubmission {
                handle: self.handle,
                transaction_ref: self.transaction_ref,
                amount: self.amount,
            },
            self.submitter,
        )
    }
}

/// Raw submission text in the accepted grammar
pub fn submission_text(handle: &str, transaction_ref: &str, amount: &str) -> String {
    format!("{} {} {}", handle, transaction_ref, amount)
}
