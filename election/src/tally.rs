//! Ranked-choice tally — ballot submission and point aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::ballot::BallotValidator;
use crate::error::ElectionError;
use agora_store::vote::VoteRecord;
use agora_store::{CandidateStore, ConfigStore, ElectionStore, StoreError, VoteStore};
use agora_types::{CandidateId, Stage, VoterId};

/// Aggregated points for one candidate in one stage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidatePoints {
    pub candidate: CandidateId,
    pub points: f64,
}

/// Converts accepted ballots into weighted vote records and answers
/// aggregation queries.
///
/// Rank `k` earns `weight / k` points, where `weight` is the voter's paid
/// tier (1 when unset) — rank 1 earns full weight, rank 2 half, and so on.
pub struct VoteTally {
    store: Arc<dyn ElectionStore>,
    validator: BallotValidator,
}

impl VoteTally {
    pub fn new(store: Arc<dyn ElectionStore>) -> Self {
        let validator = BallotValidator::new(store.clone());
        Self { store, validator }
    }

    /// Validate and persist a full ballot for the current voting stage.
    ///
    /// Every candidate reference is resolved before anything is persisted;
    /// a dangling id aborts the whole submission. Persistence and the
    /// `already_voted` flag go through one write transaction, so a racing
    /// duplicate submission loses cleanly.
    pub fn submit_ballot(
        &self,
        voter: VoterId,
        votes: &[CandidateId],
    ) -> Result<(), ElectionError> {
        let stage = match self.store.stage()? {
            Some(s) if s.is_voting() => s,
            _ => return Err(ElectionError::StageLocked),
        };

        let mut record = self.validator.validate(voter, stage, votes)?;
        let weight = record.weight() as f64;

        let mut batch = Vec::with_capacity(votes.len());
        for (index, candidate) in votes.iter().enumerate() {
            if !self.store.candidate_exists(*candidate)? {
                return Err(ElectionError::InvalidCandidateReference(*candidate));
            }
            let position = (index + 1) as u32;
            batch.push(VoteRecord {
                voter,
                candidate: *candidate,
                stage,
                position,
                points: weight / position as f64,
            });
        }

        record.already_voted = true;
        match self.store.insert_ballot(&record, &batch) {
            Ok(()) => {
                info!(%voter, stage = %stage, picks = batch.len(), "ballot accepted");
                Ok(())
            }
            Err(StoreError::Duplicate(_)) => Err(ElectionError::AlreadyVoted(voter)),
            Err(e) => Err(e.into()),
        }
    }

    /// Sum of points one candidate earned in `stage`.
    pub fn points_for_candidate(
        &self,
        candidate: CandidateId,
        stage: Stage,
    ) -> Result<f64, ElectionError> {
        Ok(self
            .store
            .votes_for_stage(stage)?
            .iter()
            .filter(|v| v.candidate == candidate)
            .map(|v| v.points)
            .sum())
    }

    /// Per-candidate point sums for `stage`, ordered by candidate id.
    pub fn points_all(&self, stage: Stage) -> Result<Vec<CandidatePoints>, ElectionError> {
        let mut sums: BTreeMap<CandidateId, f64> = BTreeMap::new();
        for vote in self.store.votes_for_stage(stage)? {
            *sums.entry(vote.candidate).or_insert(0.0) += vote.points;
        }
        Ok(sums
            .into_iter()
            .map(|(candidate, points)| CandidatePoints { candidate, points })
            .collect())
    }

    /// The results currently open for reading, if any.
    ///
    /// A stage's results become visible only after its voting closes:
    /// primary-voting results open during final registration, final-voting
    /// results once the election goes inactive.
    pub fn visible_results(
        &self,
        candidate: Option<CandidateId>,
    ) -> Result<Vec<CandidatePoints>, ElectionError> {
        let results_stage = match self.store.stage()? {
            Some(Stage::FinalRegistration) => Stage::PrimaryVoting,
            None => Stage::FinalVoting,
            _ => return Err(ElectionError::ResultsNotVisible),
        };
        match candidate {
            Some(id) => {
                let points = self.points_for_candidate(id, results_stage)?;
                Ok(vec![CandidatePoints {
                    candidate: id,
                    points,
                }])
            }
            None => self.points_all(results_stage),
        }
    }
}
