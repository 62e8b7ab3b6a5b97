//! Candidate storage trait.

use crate::StoreError;
use agora_types::{CandidateId, Gender};
use serde::{Deserialize, Serialize};

/// Per-candidate state the election core consults.
///
/// The full profile (biography, programme, photos) is owned by the identity
/// subsystem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub gender: Gender,
    pub is_email_verified: bool,
    /// Admin approval gate.
    pub is_approved: bool,
    /// Derived: `is_approved && is_email_verified`. Mirrored onto the
    /// identity record; recomputed explicitly after every mutation.
    pub is_candidate: bool,
}

impl CandidateRecord {
    pub fn new(id: CandidateId, gender: Gender) -> Self {
        Self {
            id,
            gender,
            is_email_verified: false,
            is_approved: false,
            is_candidate: false,
        }
    }

    /// Recompute the derived `is_candidate` flag from its inputs.
    pub fn recompute_flags(&mut self) {
        self.is_candidate = self.is_approved && self.is_email_verified;
    }
}

/// Trait for candidate storage operations.
pub trait CandidateStore {
    fn get_candidate(&self, id: CandidateId) -> Result<CandidateRecord, StoreError>;
    fn put_candidate(&self, record: &CandidateRecord) -> Result<(), StoreError>;
    fn candidate_exists(&self, id: CandidateId) -> Result<bool, StoreError>;
    fn candidate_count(&self) -> Result<u64, StoreError>;
    fn iter_candidates(&self) -> Result<Vec<CandidateRecord>, StoreError>;

    /// Candidates with `is_candidate == true`, i.e. the public listing.
    fn iter_listed_candidates(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        Ok(self
            .iter_candidates()?
            .into_iter()
            .filter(|c| c.is_candidate)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_candidate_needs_approval_and_verified_email() {
        let mut c = CandidateRecord::new(CandidateId(1), Gender::Female);
        c.is_approved = true;
        c.recompute_flags();
        assert!(!c.is_candidate);

        c.is_email_verified = true;
        c.recompute_flags();
        assert!(c.is_candidate);

        c.is_approved = false;
        c.recompute_flags();
        assert!(!c.is_candidate);
    }
}
