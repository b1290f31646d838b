//! Entitlement duration policy
//!
//! Maps a paid amount to an access duration. The mapping is a tier table
//! with linear interpolation between tiers, clamped to the supported amount
//! range. Rounding is round-half-to-even (banker's rounding) throughout;
//! label boundaries are sensitive to this, so the policy is fixed here and
//! nowhere else.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported amount range; amounts outside are clamped
const MIN_AMOUNT: u32 = 5;
const MAX_AMOUNT: u32 = 150;

/// Tier table (amount -> days), ascending by amount
const TIERS: [(u32, u32); 6] = [
    (5, 3),
    (10, 7),
    (25, 30),
    (60, 90),
    (100, 180),
    (150, 365),
];

/// The access period granted on approval, derived from the paid amount
///
/// Stored on the claim at creation time and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitlementDuration(u32);

impl EntitlementDuration {
    /// Derives a duration from a paid amount
    ///
    /// Pure and total: out-of-range and fractional amounts are clamped or
    /// interpolated, never errored. Non-decreasing in `amount`.
    pub fn for_amount(amount: Decimal) -> Self {
        let amount = amount.clamp(
            Decimal::from(MIN_AMOUNT),
            Decimal::from(MAX_AMOUNT),
        );

        if let Some((_, days)) = TIERS
            .iter()
            .find(|(tier_amount, _)| Decimal::from(*tier_amount) == amount)
        {
            return Self(*days);
        }

        let (first_amount, first_days) = TIERS[0];
        if amount < Decimal::from(first_amount) {
            // Unreachable after clamping; kept so the policy stays total
            let days = round_half_even(
                amount / Decimal::from(first_amount) * Decimal::from(first_days),
            );
            return Self(days.max(1));
        }

        let (last_amount, last_days) = TIERS[TIERS.len() - 1];
        if amount > Decimal::from(last_amount) {
            // Unreachable after clamping; linear extrapolation off the last segment
            let (prev_amount, prev_days) = TIERS[TIERS.len() - 2];
            let slope = Decimal::from(last_days - prev_days)
                / Decimal::from(last_amount - prev_amount);
            let days = round_half_even(
                Decimal::from(last_days) + (amount - Decimal::from(last_amount)) * slope,
            );
            return Self(days.max(1));
        }

        // Bracketing pair with lower.amount < amount < upper.amount
        let (lower, upper) = TIERS
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .find(|((lo, _), (hi, _))| {
                Decimal::from(*lo) <= amount && amount <= Decimal::from(*hi)
            })
            .unwrap_or((TIERS[0], TIERS[TIERS.len() - 1]));

        let ratio = (amount - Decimal::from(lower.0))
            / Decimal::from(upper.0 - lower.0);
        let days = round_half_even(
            Decimal::from(lower.1) + ratio * Decimal::from(upper.1 - lower.1),
        );
        Self(days.max(1))
    }

    /// Constructs from a raw day count
    pub fn from_days(days: u32) -> Self {
        Self(days)
    }

    pub fn days(&self) -> u32 {
        self.0
    }

    /// Renders the duration as the provisioning label
    ///
    /// Positive multiples of 365 become `<n>year`, positive multiples of 30
    /// become `<n>month`, everything else positive becomes `<days>days`, and
    /// a zero duration falls back to `1day`.
    pub fn label(&self) -> String {
        match self.0 {
            0 => "1day".to_string(),
            d if d % 365 == 0 => format!("{}year", d / 365),
            d if d % 30 == 0 => format!("{}month", d / 30),
            d => format!("{}days", d),
        }
    }
}

impl fmt::Display for EntitlementDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn round_half_even(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
        .unwrap_or(0)
}
