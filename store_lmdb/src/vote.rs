//! LMDB implementation of VoteStore.
//!
//! Key format: `stage (1) ++ voter_id (8, BE) ++ position (4, BE)`.
//! The stage byte first makes per-stage result scans a prefix range; the
//! voter id next makes the per-voter existence check a narrower one.

use std::ops::Bound;

use agora_store::vote::{VoteRecord, VoteStore};
use agora_store::voter::VoterRecord;
use agora_store::StoreError;
use agora_types::{Stage, VoterId};

use crate::environment::{increment_prefix, LmdbStore};
use crate::LmdbError;

/// Build the 13-byte composite key.
fn vote_key(stage: Stage, voter: VoterId, position: u32) -> [u8; 13] {
    let mut key = [0u8; 13];
    key[0] = stage.code();
    key[1..9].copy_from_slice(&voter.to_be_bytes());
    key[9..].copy_from_slice(&position.to_be_bytes());
    key
}

/// The 9-byte `(stage, voter)` prefix.
fn ballot_prefix(stage: Stage, voter: VoterId) -> [u8; 9] {
    let mut prefix = [0u8; 9];
    prefix[0] = stage.code();
    prefix[1..].copy_from_slice(&voter.to_be_bytes());
    prefix
}

impl LmdbStore {
    /// Prefix-scan existence check usable inside any transaction.
    fn ballot_exists_in(
        &self,
        rtxn: &heed::RoTxn<'_>,
        stage: Stage,
        voter: VoterId,
    ) -> Result<bool, LmdbError> {
        let prefix = ballot_prefix(stage, voter);
        let mut upper = prefix.to_vec();
        let bounds = if increment_prefix(&mut upper) {
            (
                Bound::Included(prefix.as_slice()),
                Bound::Excluded(upper.as_slice()),
            )
        } else {
            (Bound::Included(prefix.as_slice()), Bound::Unbounded)
        };
        let mut iter = self.votes_db.range(rtxn, &bounds)?;
        Ok(iter.next().transpose()?.is_some())
    }
}

impl VoteStore for LmdbStore {
    fn insert_ballot(
        &self,
        voter: &VoterRecord,
        records: &[VoteRecord],
    ) -> Result<(), StoreError> {
        let stage = match records.first() {
            Some(r) => r.stage,
            None => return Ok(()),
        };

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        // The existence check shares the write transaction with the batch
        // insert; LMDB allows one writer at a time, so two racing
        // submissions serialise here and the loser sees the winner's rows.
        if self
            .ballot_exists_in(&wtxn, stage, voter.id)
            .map_err(StoreError::from)?
        {
            return Err(StoreError::Duplicate(format!(
                "ballot for voter {} in stage {}",
                voter.id, stage
            )));
        }

        for record in records {
            let key = vote_key(record.stage, record.voter, record.position);
            let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
            self.votes_db
                .put(&mut wtxn, &key, &bytes)
                .map_err(LmdbError::from)?;
        }

        let voter_bytes = bincode::serialize(voter).map_err(LmdbError::from)?;
        self.voters_db
            .put(&mut wtxn, &voter.id.to_be_bytes(), &voter_bytes)
            .map_err(LmdbError::from)?;

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn has_ballot(&self, voter: VoterId, stage: Stage) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.ballot_exists_in(&rtxn, stage, voter)?)
    }

    fn votes_for_stage(&self, stage: Stage) -> Result<Vec<VoteRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = [stage.code()];
        let mut upper = prefix.to_vec();
        let bounds = if increment_prefix(&mut upper) {
            (
                Bound::Included(prefix.as_slice()),
                Bound::Excluded(upper.as_slice()),
            )
        } else {
            (Bound::Included(prefix.as_slice()), Bound::Unbounded)
        };
        let iter = self.votes_db.range(&rtxn, &bounds).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.votes_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
