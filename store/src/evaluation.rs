//! Trust-evaluation storage trait.

use crate::StoreError;
use agora_types::{CandidateId, MarkId, VoterId};
use serde::{Deserialize, Serialize};

/// One voter's trust-mark for one candidate.
///
/// Keyed by `(candidate, voter)` — a voter holds at most one mark per
/// candidate; writes overwrite.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub voter: VoterId,
    pub candidate: CandidateId,
    pub mark: MarkId,
}

/// Trait for evaluation storage.
pub trait EvaluationStore {
    /// Insert or overwrite the voter's mark for the candidate.
    fn put_evaluation(&self, record: &EvaluationRecord) -> Result<(), StoreError>;

    /// The voter's existing mark for the candidate, if any.
    fn get_evaluation(
        &self,
        voter: VoterId,
        candidate: CandidateId,
    ) -> Result<Option<EvaluationRecord>, StoreError>;

    /// All marks held against one candidate.
    fn evaluations_for_candidate(
        &self,
        candidate: CandidateId,
    ) -> Result<Vec<EvaluationRecord>, StoreError>;

    /// All marks, across all candidates.
    fn iter_evaluations(&self) -> Result<Vec<EvaluationRecord>, StoreError>;
}
