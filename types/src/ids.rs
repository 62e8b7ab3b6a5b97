//! Record identifiers.
//!
//! Voter, candidate and mark ids are numeric (assigned by the identity
//! subsystem). Bill and proof numbers are opaque random hex strings so they
//! can be handed to external parties without leaking record counts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn as_u64(self) -> u64 {
                self.0
            }

            /// Big-endian bytes, used in composite storage keys.
            pub fn to_be_bytes(self) -> [u8; 8] {
                self.0.to_be_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifies a voter profile.
    VoterId
);
numeric_id!(
    /// Identifies a candidate profile.
    CandidateId
);
numeric_id!(
    /// Identifies a trust-mark option in the catalog.
    MarkId
);

/// A payment bill number, shared with the payment gateway.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillNo(String);

impl BillNo {
    /// Generate a fresh random bill number (32 hex chars).
    pub fn generate() -> Self {
        let raw: [u8; 16] = rand::random();
        Self(hex::encode(raw))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an uploaded payment-proof record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofId(String);

impl ProofId {
    pub fn generate() -> Self {
        let raw: [u8; 16] = rand::random();
        Self(hex::encode(raw))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_numbers_are_unique_hex() {
        let a = BillNo::generate();
        let b = BillNo::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_key_bytes_sort_numerically() {
        assert!(VoterId(2).to_be_bytes() < VoterId(10).to_be_bytes());
    }
}
