//! LMDB implementation of MarkStore.

use agora_store::mark::{MarkRecord, MarkStore};
use agora_store::StoreError;
use agora_types::MarkId;

use crate::environment::LmdbStore;
use crate::LmdbError;

impl MarkStore for LmdbStore {
    fn put_mark(&self, record: &MarkRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.marks_db
            .put(&mut wtxn, &record.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_mark(&self, id: MarkId) -> Result<MarkRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .marks_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("mark {id}")))?;
        let record: MarkRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn iter_marks(&self) -> Result<Vec<MarkRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.marks_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results: Vec<MarkRecord> = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        results.sort_by_key(|m| m.score);
        Ok(results)
    }
}
