//! LMDB implementation of VoterStore.

use agora_store::voter::{VoterRecord, VoterStore};
use agora_store::StoreError;
use agora_types::VoterId;

use crate::environment::LmdbStore;
use crate::LmdbError;

impl VoterStore for LmdbStore {
    fn get_voter(&self, id: VoterId) -> Result<VoterRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .voters_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("voter {id}")))?;
        let record: VoterRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn put_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.voters_db
            .put(&mut wtxn, &record.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn voter_exists(&self, id: VoterId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .voters_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.voters_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.voters_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}
