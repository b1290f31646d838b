//! Claim submission parsing
//!
//! Turns the raw `<handle> <12-digit-reference> <amount>` text a user sends
//! into a structured submission, or a failure the user can act on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Smallest amount a claim may assert
pub const MIN_AMOUNT: u32 = 5;
/// Largest amount a claim may assert; above this the claim is rejected
/// outright so high-value payments get manual handling
pub const MAX_AMOUNT: u32 = 150;

const REFERENCE_DIGITS: usize = 12;

/// A validated, structured claim submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    /// Asserted display name, `@` stripped and lower-cased
    pub handle: String,
    /// External payment reference, exactly 12 ASCII digits
    pub transaction_ref: String,
    /// Asserted paid amount
    pub amount: Decimal,
}

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("malformed submission")]
    Malformed,

    #[error("amount {0} is below the minimum of {MIN_AMOUNT}")]
    AmountBelowMinimum(Decimal),

    #[error("amount {0} is above the maximum of {MAX_AMOUNT}")]
    AmountAboveMaximum(Decimal),
}

impl SubmissionError {
    /// Message sent back to the submitting user, restating the expected format
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Malformed => format!(
                "Invalid format. Send:\nusername {}-digit-transaction-id amount\n\
                 Example: john_doe 123456789012 50",
                REFERENCE_DIGITS
            ),
            SubmissionError::AmountBelowMinimum(amount) => format!(
                "Amount {} is below the minimum of {}. \
                 Send: username 12-digit-transaction-id amount",
                amount, MIN_AMOUNT
            ),
            SubmissionError::AmountAboveMaximum(amount) => format!(
                "Amount {} is above the maximum of {}. \
                 Contact an admin directly for high-value payments.",
                amount, MAX_AMOUNT
            ),
        }
    }
}

impl ClaimSubmission {
    /// Parses raw submission text
    ///
    /// Grammar: three whitespace-separated tokens. The handle is any
    /// non-whitespace token (a leading `@` is stripped, the rest lower-cased),
    /// the reference is exactly 12 ASCII digits, the amount a non-negative
    /// decimal number.
    pub fn parse(raw: &str) -> Result<Self, SubmissionError> {
        let mut tokens = raw.split_whitespace();
        let (handle, reference, amount) = match (
            tokens.next(),
            tokens.next(),
            tokens.next(),
            tokens.next(),
        ) {
            (Some(h), Some(r), Some(a), None) => (h, r, a),
            _ => return Err(SubmissionError::Malformed),
        };

        let handle = handle
            .strip_prefix('@')
            .unwrap_or(handle)
            .to_lowercase();
        if handle.is_empty() {
            return Err(SubmissionError::Malformed);
        }

        if reference.len() != REFERENCE_DIGITS
            || !reference.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(SubmissionError::Malformed);
        }

        let amount = Decimal::from_str(amount).map_err(|_| SubmissionError::Malformed)?;
        if amount.is_sign_negative() {
            return Err(SubmissionError::Malformed);
        }
        if amount < Decimal::from(MIN_AMOUNT) {
            return Err(SubmissionError::AmountBelowMinimum(amount));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(SubmissionError::AmountAboveMaximum(amount));
        }

        Ok(Self {
            handle,
            transaction_ref: reference.to_string(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_valid_submission() {
        let submission = ClaimSubmission::parse("alice 123456789012 25").unwrap();
        assert_eq!(submission.handle, "alice");
        assert_eq!(submission.transaction_ref, "123456789012");
        assert_eq!(submission.amount, dec!(25));
    }

    #[test]
    fn test_parse_normalizes_handle() {
        let submission = ClaimSubmission::parse("@John_Doe 123456789012 50").unwrap();
        assert_eq!(submission.handle, "john_doe");
    }

    #[test]
    fn test_parse_fractional_amount() {
        let submission = ClaimSubmission::parse("alice 123456789012 12.50").unwrap();
        assert_eq!(submission.amount, dec!(12.50));
    }

    #[test]
    fn test_parse_short_reference() {
        assert_eq!(
            ClaimSubmission::parse("alice 123 25"),
            Err(SubmissionError::Malformed)
        );
    }

    #[test]
    fn test_parse_non_numeric_reference() {
        assert_eq!(
            ClaimSubmission::parse("alice 12345678901a 25"),
            Err(SubmissionError::Malformed)
        );
    }

    #[test]
    fn test_parse_wrong_token_count() {
        assert_eq!(ClaimSubmission::parse("alice 123456789012"), Err(SubmissionError::Malformed));
        assert_eq!(
            ClaimSubmission::parse("alice 123456789012 25 extra"),
            Err(SubmissionError::Malformed)
        );
        assert_eq!(ClaimSubmission::parse(""), Err(SubmissionError::Malformed));
    }

    #[test]
    fn test_parse_bare_at_sign_handle() {
        assert_eq!(
            ClaimSubmission::parse("@ 123456789012 25"),
            Err(SubmissionError::Malformed)
        );
    }

    #[test]
    fn test_parse_negative_amount() {
        assert_eq!(
            ClaimSubmission::parse("alice 123456789012 -5"),
            Err(SubmissionError::Malformed)
        );
    }

    #[test]
    fn test_parse_amount_below_minimum() {
        assert_eq!(
            ClaimSubmission::parse("alice 123456789012 1"),
            Err(SubmissionError::AmountBelowMinimum(dec!(1)))
        );
    }

    #[test]
    fn test_parse_amount_above_maximum() {
        assert_eq!(
            ClaimSubmission::parse("alice 123456789012 200"),
            Err(SubmissionError::AmountAboveMaximum(dec!(200)))
        );
    }

    #[test]
    fn test_boundary_amounts_accepted() {
        assert!(ClaimSubmission::parse("alice 123456789012 5").is_ok());
        assert!(ClaimSubmission::parse("alice 123456789012 150").is_ok());
    }

    #[test]
    fn test_user_messages_restate_format() {
        assert!(SubmissionError::Malformed.user_message().contains("123456789012"));
        assert!(SubmissionError::AmountBelowMinimum(dec!(1))
            .user_message()
            .contains("minimum"));
        assert!(SubmissionError::AmountAboveMaximum(dec!(200))
            .user_message()
            .contains("maximum"));
    }
}
