//! Vote storage trait.

use crate::voter::VoterRecord;
use crate::StoreError;
use agora_types::{CandidateId, Stage, VoterId};
use serde::{Deserialize, Serialize};

/// One ranked pick inside a ballot.
///
/// A full ballot is the set of records sharing `(voter, stage)`; partial
/// ballots are never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: VoterId,
    pub candidate: CandidateId,
    pub stage: Stage,
    /// 1-based rank within the ballot.
    pub position: u32,
    /// Derived weight: `voter_weight / position`.
    pub points: f64,
}

/// Trait for ballot storage.
pub trait VoteStore {
    /// Persist a full ballot atomically.
    ///
    /// In one write transaction: fail with [`StoreError::Duplicate`] if any
    /// vote already exists for `(voter.id, stage)` (taking the stage from
    /// the first record), otherwise insert every record and store the
    /// updated `voter` (the caller passes it with `already_voted = true`).
    /// Two racing submissions cannot both pass the existence check.
    fn insert_ballot(&self, voter: &VoterRecord, records: &[VoteRecord])
        -> Result<(), StoreError>;

    /// Whether the voter has a stored ballot for the stage.
    fn has_ballot(&self, voter: VoterId, stage: Stage) -> Result<bool, StoreError>;

    /// All vote records for a stage.
    fn votes_for_stage(&self, stage: Stage) -> Result<Vec<VoteRecord>, StoreError>;

    /// Total stored vote records.
    fn vote_count(&self) -> Result<u64, StoreError>;
}
