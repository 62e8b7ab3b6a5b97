//! LMDB implementation of CandidateStore.

use agora_store::candidate::{CandidateRecord, CandidateStore};
use agora_store::StoreError;
use agora_types::CandidateId;

use crate::environment::LmdbStore;
use crate::LmdbError;

impl CandidateStore for LmdbStore {
    fn get_candidate(&self, id: CandidateId) -> Result<CandidateRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .candidates_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("candidate {id}")))?;
        let record: CandidateRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn put_candidate(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.candidates_db
            .put(&mut wtxn, &record.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn candidate_exists(&self, id: CandidateId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .candidates_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn candidate_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.candidates_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_candidates(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.candidates_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}
