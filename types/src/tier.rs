//! Payment weight tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A voter's paid weight tier (1–5), multiplying every ranked-choice point
/// the voter's ballot contributes.
///
/// The tier is derived from the confirmed payment amount via a fixed table
/// shared with the payment gateway. The evaluation-only amount (`"1.00"`)
/// maps to no tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeightTier(u8);

#[derive(Debug, Error)]
#[error("weight tier out of range: {0}")]
pub struct InvalidTier(pub u8);

/// The gateway amount table: `(amount string, tier)`.
pub const AMOUNT_TABLE: [(&str, u8); 5] = [
    ("2.00", 1),
    ("3.00", 2),
    ("4.00", 3),
    ("5.00", 4),
    ("6.00", 5),
];

impl WeightTier {
    pub const MIN: WeightTier = WeightTier(1);
    pub const MAX: WeightTier = WeightTier(5);

    pub fn new(raw: u8) -> Result<Self, InvalidTier> {
        if (1..=5).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidTier(raw))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The payment amount that buys this tier.
    pub fn amount(self) -> &'static str {
        AMOUNT_TABLE[(self.0 - 1) as usize].0
    }

    /// Look up the tier for a confirmed payment amount.
    ///
    /// Returns `None` for amounts outside the table (the evaluation amount
    /// among them), which leave the voter's tier untouched.
    pub fn from_amount(amount: &str) -> Option<Self> {
        AMOUNT_TABLE
            .iter()
            .find(|(a, _)| *a == amount)
            .map(|(_, t)| Self(*t))
    }
}

impl TryFrom<u8> for WeightTier {
    type Error = InvalidTier;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<WeightTier> for u8 {
    fn from(tier: WeightTier) -> u8 {
        tier.0
    }
}

impl fmt::Display for WeightTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
