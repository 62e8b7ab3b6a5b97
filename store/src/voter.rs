//! Voter storage trait.

use crate::StoreError;
use agora_types::{VoterId, WeightTier};
use serde::{Deserialize, Serialize};

/// Per-voter eligibility state.
///
/// Profile fields (name, address, phone) live in the identity subsystem;
/// this record carries only what the election core reads and writes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoterRecord {
    pub id: VoterId,
    pub email: String,
    pub is_email_verified: bool,
    /// Set by the payment ledger for the current voting stage.
    pub is_paid: bool,
    /// Paid weight tier; `None` until a voting payment confirms.
    pub votes_count: Option<WeightTier>,
    /// True once the voter's ballot for the current votable stage is stored.
    pub already_voted: bool,
    /// Derived: `is_email_verified && is_paid`. Mirrored from the identity
    /// record; recomputed explicitly after every mutation of its inputs.
    pub is_voter: bool,
}

impl VoterRecord {
    pub fn new(id: VoterId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            is_email_verified: false,
            is_paid: false,
            votes_count: None,
            already_voted: false,
            is_voter: false,
        }
    }

    /// Recompute the derived `is_voter` flag from its inputs.
    pub fn recompute_flags(&mut self) {
        self.is_voter = self.is_email_verified && self.is_paid;
    }

    /// Wipe payment and ballot eligibility. Applied to every voter when the
    /// stage machine enters a registration window.
    pub fn reset_eligibility(&mut self) {
        self.is_paid = false;
        self.votes_count = None;
        self.already_voted = false;
        self.recompute_flags();
    }

    /// The ranked-choice weight multiplier: the paid tier, or 1 if unset.
    pub fn weight(&self) -> u8 {
        self.votes_count.map(WeightTier::get).unwrap_or(1)
    }
}

/// Trait for voter storage operations.
pub trait VoterStore {
    fn get_voter(&self, id: VoterId) -> Result<VoterRecord, StoreError>;
    fn put_voter(&self, record: &VoterRecord) -> Result<(), StoreError>;
    fn voter_exists(&self, id: VoterId) -> Result<bool, StoreError>;
    fn voter_count(&self) -> Result<u64, StoreError>;
    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_voter_derivation() {
        let mut v = VoterRecord::new(VoterId(1), "a@b.am");
        v.is_email_verified = true;
        v.recompute_flags();
        assert!(!v.is_voter);

        v.is_paid = true;
        v.recompute_flags();
        assert!(v.is_voter);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut v = VoterRecord::new(VoterId(1), "a@b.am");
        v.is_email_verified = true;
        v.is_paid = true;
        v.votes_count = Some(WeightTier::new(3).unwrap());
        v.already_voted = true;
        v.recompute_flags();
        assert!(v.is_voter);

        v.reset_eligibility();
        assert!(!v.is_paid);
        assert!(v.votes_count.is_none());
        assert!(!v.already_voted);
        assert!(!v.is_voter);
        // The email verification itself survives the sweep.
        assert!(v.is_email_verified);
    }

    #[test]
    fn test_weight_defaults_to_one() {
        let mut v = VoterRecord::new(VoterId(1), "a@b.am");
        assert_eq!(v.weight(), 1);
        v.votes_count = Some(WeightTier::new(5).unwrap());
        assert_eq!(v.weight(), 5);
    }
}
