//! LMDB implementation of EvaluationStore.
//!
//! Key format: `candidate_id (8, BE) ++ voter_id (8, BE)`. Candidate first
//! makes per-candidate sums a prefix range; the full key is the uniqueness
//! constraint, so a re-submission is a plain overwrite.

use std::ops::Bound;

use agora_store::evaluation::{EvaluationRecord, EvaluationStore};
use agora_store::StoreError;
use agora_types::{CandidateId, VoterId};

use crate::environment::{increment_prefix, LmdbStore};
use crate::LmdbError;

fn evaluation_key(candidate: CandidateId, voter: VoterId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&candidate.to_be_bytes());
    key[8..].copy_from_slice(&voter.to_be_bytes());
    key
}

impl EvaluationStore for LmdbStore {
    fn put_evaluation(&self, record: &EvaluationRecord) -> Result<(), StoreError> {
        let key = evaluation_key(record.candidate, record.voter);
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.evaluations_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_evaluation(
        &self,
        voter: VoterId,
        candidate: CandidateId,
    ) -> Result<Option<EvaluationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .evaluations_db
            .get(&rtxn, &evaluation_key(candidate, voter))
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(
                bincode::deserialize(bytes).map_err(LmdbError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn evaluations_for_candidate(
        &self,
        candidate: CandidateId,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = candidate.to_be_bytes();
        let mut upper = prefix.to_vec();
        let bounds = if increment_prefix(&mut upper) {
            (
                Bound::Included(prefix.as_slice()),
                Bound::Excluded(upper.as_slice()),
            )
        } else {
            (Bound::Included(prefix.as_slice()), Bound::Unbounded)
        };
        let iter = self
            .evaluations_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }

    fn iter_evaluations(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.evaluations_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}
