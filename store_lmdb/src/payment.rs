//! LMDB implementation of PaymentStore.
//!
//! Bills are keyed by their bill number; a `voter_id ++ bill_no` index keeps
//! per-voter lookups a prefix range instead of a full scan.

use std::ops::Bound;

use agora_store::payment::{PaymentRecord, PaymentStore, ProofRecord};
use agora_store::StoreError;
use agora_types::{BillNo, VoterId};

use crate::environment::{increment_prefix, LmdbStore};
use crate::LmdbError;

fn voter_bill_key(voter: VoterId, bill_no: &BillNo) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + bill_no.as_str().len());
    key.extend_from_slice(&voter.to_be_bytes());
    key.extend_from_slice(bill_no.as_str().as_bytes());
    key
}

impl PaymentStore for LmdbStore {
    fn put_payment(&self, record: &PaymentRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.payments_db
            .put(&mut wtxn, record.bill_no.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.voter_bills_db
            .put(
                &mut wtxn,
                &voter_bill_key(record.voter, &record.bill_no),
                &[],
            )
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_payment(&self, bill_no: &BillNo) -> Result<PaymentRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .payments_db
            .get(&rtxn, bill_no.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("bill {bill_no}")))?;
        let record: PaymentRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn payments_for_voter(&self, voter: VoterId) -> Result<Vec<PaymentRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = voter.to_be_bytes();
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
            .voter_bills_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, _) = entry.map_err(LmdbError::from)?;
            let bill_bytes = &key[8..];
            let bill_no = BillNo::new(String::from_utf8_lossy(bill_bytes).into_owned());
            let val = self
                .payments_db
                .get(&rtxn, bill_no.as_str().as_bytes())
                .map_err(LmdbError::from)?
                .ok_or_else(|| {
                    StoreError::Corruption(format!("dangling bill index entry {bill_no}"))
                })?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }

    fn put_proof(&self, record: &ProofRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.proofs_db
            .put(&mut wtxn, record.id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_proofs(&self) -> Result<Vec<ProofRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.proofs_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}
