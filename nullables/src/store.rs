//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use agora_store::candidate::{CandidateRecord, CandidateStore};
use agora_store::config::ConfigStore;
use agora_store::evaluation::{EvaluationRecord, EvaluationStore};
use agora_store::mark::{MarkRecord, MarkStore};
use agora_store::payment::{PaymentRecord, PaymentStore, ProofRecord};
use agora_store::vote::{VoteRecord, VoteStore};
use agora_store::voter::{VoterRecord, VoterStore};
use agora_store::StoreError;
use agora_types::{BillNo, CandidateId, MarkId, Stage, VoterId};

/// An in-memory election store for testing.
///
/// One mutex guards the whole state: `apply_stage` and `insert_ballot` must
/// be atomic across record families, which per-map locks cannot give.
pub struct NullStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    voters: BTreeMap<u64, VoterRecord>,
    candidates: BTreeMap<u64, CandidateRecord>,
    // Keyed by (stage code, voter, position), mirroring the LMDB key order.
    votes: BTreeMap<(u8, u64, u32), VoteRecord>,
    evaluations: BTreeMap<(u64, u64), EvaluationRecord>,
    marks: BTreeMap<u64, MarkRecord>,
    payments: HashMap<String, PaymentRecord>,
    proofs: Vec<ProofRecord>,
    stage: Option<Stage>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoterStore for NullStore {
    fn get_voter(&self, id: VoterId) -> Result<VoterRecord, StoreError> {
        self.lock()
            .voters
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("voter {id}")))
    }

    fn put_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        self.lock().voters.insert(record.id.as_u64(), record.clone());
        Ok(())
    }

    fn voter_exists(&self, id: VoterId) -> Result<bool, StoreError> {
        Ok(self.lock().voters.contains_key(&id.as_u64()))
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().voters.len() as u64)
    }

    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError> {
        Ok(self.lock().voters.values().cloned().collect())
    }
}

impl CandidateStore for NullStore {
    fn get_candidate(&self, id: CandidateId) -> Result<CandidateRecord, StoreError> {
        self.lock()
            .candidates
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("candidate {id}")))
    }

    fn put_candidate(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        self.lock()
            .candidates
            .insert(record.id.as_u64(), record.clone());
        Ok(())
    }

    fn candidate_exists(&self, id: CandidateId) -> Result<bool, StoreError> {
        Ok(self.lock().candidates.contains_key(&id.as_u64()))
    }

    fn candidate_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().candidates.len() as u64)
    }

    fn iter_candidates(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        Ok(self.lock().candidates.values().cloned().collect())
    }
}

impl VoteStore for NullStore {
    fn insert_ballot(
        &self,
        voter: &VoterRecord,
        records: &[VoteRecord],
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let stage = match records.first() {
            Some(r) => r.stage,
            None => return Ok(()),
        };
        let code = stage.code();
        let vid = voter.id.as_u64();
        let already = inner
            .votes
            .range((code, vid, 0)..=(code, vid, u32::MAX))
            .next()
            .is_some();
        if already {
            return Err(StoreError::Duplicate(format!(
                "ballot for voter {} in stage {}",
                voter.id, stage
            )));
        }
        for r in records {
            inner
                .votes
                .insert((r.stage.code(), r.voter.as_u64(), r.position), r.clone());
        }
        inner.voters.insert(vid, voter.clone());
        Ok(())
    }

    fn has_ballot(&self, voter: VoterId, stage: Stage) -> Result<bool, StoreError> {
        let inner = self.lock();
        let code = stage.code();
        let vid = voter.as_u64();
        Ok(inner
            .votes
            .range((code, vid, 0)..=(code, vid, u32::MAX))
            .next()
            .is_some())
    }

    fn votes_for_stage(&self, stage: Stage) -> Result<Vec<VoteRecord>, StoreError> {
        let inner = self.lock();
        let code = stage.code();
        Ok(inner
            .votes
            .range((code, 0, 0)..=(code, u64::MAX, u32::MAX))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().votes.len() as u64)
    }
}

impl EvaluationStore for NullStore {
    fn put_evaluation(&self, record: &EvaluationRecord) -> Result<(), StoreError> {
        self.lock().evaluations.insert(
            (record.candidate.as_u64(), record.voter.as_u64()),
            record.clone(),
        );
        Ok(())
    }

    fn get_evaluation(
        &self,
        voter: VoterId,
        candidate: CandidateId,
    ) -> Result<Option<EvaluationRecord>, StoreError> {
        Ok(self
            .lock()
            .evaluations
            .get(&(candidate.as_u64(), voter.as_u64()))
            .cloned())
    }

    fn evaluations_for_candidate(
        &self,
        candidate: CandidateId,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        let inner = self.lock();
        let cid = candidate.as_u64();
        Ok(inner
            .evaluations
            .range((cid, 0)..=(cid, u64::MAX))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn iter_evaluations(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
        Ok(self.lock().evaluations.values().cloned().collect())
    }
}

impl MarkStore for NullStore {
    fn put_mark(&self, record: &MarkRecord) -> Result<(), StoreError> {
        self.lock().marks.insert(record.id.as_u64(), record.clone());
        Ok(())
    }

    fn get_mark(&self, id: MarkId) -> Result<MarkRecord, StoreError> {
        self.lock()
            .marks
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("mark {id}")))
    }

    fn iter_marks(&self) -> Result<Vec<MarkRecord>, StoreError> {
        let mut marks: Vec<MarkRecord> = self.lock().marks.values().cloned().collect();
        marks.sort_by_key(|m| m.score);
        Ok(marks)
    }
}

impl PaymentStore for NullStore {
    fn put_payment(&self, record: &PaymentRecord) -> Result<(), StoreError> {
        self.lock()
            .payments
            .insert(record.bill_no.as_str().to_string(), record.clone());
        Ok(())
    }

    fn get_payment(&self, bill_no: &BillNo) -> Result<PaymentRecord, StoreError> {
        self.lock()
            .payments
            .get(bill_no.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("bill {bill_no}")))
    }

    fn payments_for_voter(&self, voter: VoterId) -> Result<Vec<PaymentRecord>, StoreError> {
        Ok(self
            .lock()
            .payments
            .values()
            .filter(|p| p.voter == voter)
            .cloned()
            .collect())
    }

    fn put_proof(&self, record: &ProofRecord) -> Result<(), StoreError> {
        self.lock().proofs.push(record.clone());
        Ok(())
    }

    fn iter_proofs(&self) -> Result<Vec<ProofRecord>, StoreError> {
        Ok(self.lock().proofs.clone())
    }
}

impl ConfigStore for NullStore {
    fn stage(&self) -> Result<Option<Stage>, StoreError> {
        Ok(self.lock().stage)
    }

    fn apply_stage(
        &self,
        new: Option<Stage>,
        reset_if_changed: bool,
    ) -> Result<Option<Stage>, StoreError> {
        let mut inner = self.lock();
        let previous = inner.stage;
        inner.stage = new;
        if reset_if_changed && previous != new {
            for voter in inner.voters.values_mut() {
                voter.reset_eligibility();
            }
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::WeightTier;

    fn paid_voter(n: u64) -> VoterRecord {
        let mut v = VoterRecord::new(VoterId(n), format!("voter{n}@agora.am"));
        v.is_email_verified = true;
        v.is_paid = true;
        v.votes_count = Some(WeightTier::new(2).unwrap());
        v.recompute_flags();
        v
    }

    #[test]
    fn test_put_get_voter() {
        let store = NullStore::new();
        store.put_voter(&paid_voter(1)).unwrap();
        let got = store.get_voter(VoterId(1)).unwrap();
        assert!(got.is_voter);
    }

    #[test]
    fn test_voter_not_found() {
        let store = NullStore::new();
        assert!(store.get_voter(VoterId(9)).is_err());
    }

    #[test]
    fn test_insert_ballot_rejects_second_submission() {
        let store = NullStore::new();
        let voter = paid_voter(1);
        store.put_voter(&voter).unwrap();
        let record = VoteRecord {
            voter: VoterId(1),
            candidate: CandidateId(7),
            stage: Stage::PrimaryVoting,
            position: 1,
            points: 2.0,
        };
        store.insert_ballot(&voter, &[record.clone()]).unwrap();
        assert!(store.has_ballot(VoterId(1), Stage::PrimaryVoting).unwrap());

        let err = store.insert_ballot(&voter, &[record]).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.vote_count().unwrap(), 1);
    }

    #[test]
    fn test_apply_stage_sweeps_voters_only_on_change() {
        let store = NullStore::new();
        store.put_voter(&paid_voter(1)).unwrap();
        store.put_voter(&paid_voter(2)).unwrap();

        let prev = store
            .apply_stage(Some(Stage::PrimaryRegistration), true)
            .unwrap();
        assert_eq!(prev, None);
        for v in store.iter_voters().unwrap() {
            assert!(!v.is_paid && !v.is_voter && v.votes_count.is_none());
        }

        // Same value again: no sweep, so a freshly paid voter stays paid.
        store.put_voter(&paid_voter(1)).unwrap();
        store
            .apply_stage(Some(Stage::PrimaryRegistration), true)
            .unwrap();
        assert!(store.get_voter(VoterId(1)).unwrap().is_paid);
    }

    #[test]
    fn test_evaluation_upsert_overwrites() {
        let store = NullStore::new();
        let mut record = EvaluationRecord {
            voter: VoterId(1),
            candidate: CandidateId(2),
            mark: MarkId(10),
        };
        store.put_evaluation(&record).unwrap();
        record.mark = MarkId(11);
        store.put_evaluation(&record).unwrap();

        let all = store.evaluations_for_candidate(CandidateId(2)).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].mark, MarkId(11));
    }

    #[test]
    fn test_marks_ordered_by_score() {
        let store = NullStore::new();
        store
            .put_mark(&MarkRecord::new(MarkId(1), "trust", 5).unwrap())
            .unwrap();
        store
            .put_mark(&MarkRecord::new(MarkId(2), "distrust", -2).unwrap())
            .unwrap();
        let marks = store.iter_marks().unwrap();
        assert_eq!(marks[0].score, -2);
        assert_eq!(marks[1].score, 5);
    }
}
