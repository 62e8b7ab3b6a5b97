//! Trust-evaluation ledger.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::ElectionError;
use agora_store::evaluation::EvaluationRecord;
use agora_store::{
    CandidateStore, ConfigStore, ElectionStore, EvaluationStore, MarkStore, VoterStore,
};
use agora_types::{CandidateId, MarkId, Stage, VoterId};

/// Summed trust score for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateTrust {
    pub candidate: CandidateId,
    pub points: i64,
}

/// Records one trust-mark per (voter, candidate) pair and aggregates
/// mark sums per candidate.
///
/// Re-submitting overwrites the existing mark — a voter's trust in a
/// candidate is a single current value, not a history.
pub struct EvaluationLedger {
    store: Arc<dyn ElectionStore>,
}

impl EvaluationLedger {
    pub fn new(store: Arc<dyn ElectionStore>) -> Self {
        Self { store }
    }

    /// Insert or replace the voter's mark for the candidate.
    ///
    /// Requires an active stage, a listed candidate and a catalogued mark.
    pub fn submit(
        &self,
        voter: VoterId,
        candidate: CandidateId,
        mark: MarkId,
    ) -> Result<(), ElectionError> {
        if self.store.stage()?.is_none() {
            return Err(ElectionError::StageLocked);
        }
        if !self.store.voter_exists(voter)? {
            return Err(ElectionError::VoterNotFound(voter));
        }
        let target = self
            .store
            .get_candidate(candidate)
            .map_err(|_| ElectionError::CandidateNotFound(candidate))?;
        if !target.is_candidate {
            return Err(ElectionError::NotACandidate(candidate));
        }
        self.store
            .get_mark(mark)
            .map_err(|_| ElectionError::MarkNotFound(mark))?;

        let replaced = self.store.get_evaluation(voter, candidate)?.is_some();
        self.store.put_evaluation(&EvaluationRecord {
            voter,
            candidate,
            mark,
        })?;
        info!(%voter, %candidate, %mark, replaced, "trust mark recorded");
        Ok(())
    }

    /// The voter's current mark for the candidate, if any.
    pub fn evaluation_of(
        &self,
        voter: VoterId,
        candidate: CandidateId,
    ) -> Result<Option<EvaluationRecord>, ElectionError> {
        if !self.store.voter_exists(voter)? {
            return Err(ElectionError::VoterNotFound(voter));
        }
        Ok(self.store.get_evaluation(voter, candidate)?)
    }

    /// Sum of mark scores held against one candidate.
    ///
    /// Only readable while the primary registration/discussion stage is
    /// open.
    pub fn result_for(&self, candidate: CandidateId) -> Result<i64, ElectionError> {
        self.check_results_open()?;
        let target = self
            .store
            .get_candidate(candidate)
            .map_err(|_| ElectionError::CandidateNotFound(candidate))?;
        if !target.is_candidate {
            return Err(ElectionError::NotACandidate(candidate));
        }
        self.sum_marks(self.store.evaluations_for_candidate(candidate)?)
            .map(|sums| sums.get(&candidate).copied().unwrap_or(0))
    }

    /// Per-candidate sums across the whole ledger, ordered by candidate id.
    pub fn result_all(&self) -> Result<Vec<CandidateTrust>, ElectionError> {
        self.check_results_open()?;
        let sums = self.sum_marks(self.store.iter_evaluations()?)?;
        Ok(sums
            .into_iter()
            .map(|(candidate, points)| CandidateTrust { candidate, points })
            .collect())
    }

    fn check_results_open(&self) -> Result<(), ElectionError> {
        match self.store.stage()? {
            Some(Stage::PrimaryRegistration) => Ok(()),
            _ => Err(ElectionError::ResultsNotVisible),
        }
    }

    fn sum_marks(
        &self,
        records: Vec<EvaluationRecord>,
    ) -> Result<BTreeMap<CandidateId, i64>, ElectionError> {
        let mut sums = BTreeMap::new();
        for record in records {
            let mark = self
                .store
                .get_mark(record.mark)
                .map_err(|_| ElectionError::MarkNotFound(record.mark))?;
            *sums.entry(record.candidate).or_insert(0) += mark.score as i64;
        }
        Ok(sums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::NullStore;
    use agora_store::candidate::{CandidateRecord, CandidateStore};
    use agora_store::config::ConfigStore;
    use agora_store::mark::{MarkRecord, MarkStore};
    use agora_store::voter::{VoterRecord, VoterStore};
    use agora_types::Gender;

    fn store() -> Arc<NullStore> {
        let store = Arc::new(NullStore::new());
        for id in 1..=2u64 {
            store
                .put_voter(&VoterRecord::new(VoterId(id), format!("v{id}@agora.am")))
                .unwrap();
        }
        let mut listed = CandidateRecord::new(CandidateId(1), Gender::Female);
        listed.is_email_verified = true;
        listed.is_approved = true;
        listed.recompute_flags();
        store.put_candidate(&listed).unwrap();
        // Approved but unverified: not on the list.
        let mut unlisted = CandidateRecord::new(CandidateId(2), Gender::Male);
        unlisted.is_approved = true;
        unlisted.recompute_flags();
        store.put_candidate(&unlisted).unwrap();

        store
            .put_mark(&MarkRecord::new(MarkId(10), "full trust", 5).unwrap())
            .unwrap();
        store
            .put_mark(&MarkRecord::new(MarkId(11), "distrust", -2).unwrap())
            .unwrap();
        store
            .apply_stage(Some(Stage::Qualification), false)
            .unwrap();
        store
    }

    #[test]
    fn test_submission_locked_while_inactive() {
        let s = store();
        s.apply_stage(None, false).unwrap();
        let ledger = EvaluationLedger::new(s.clone());
        assert!(matches!(
            ledger.submit(VoterId(1), CandidateId(1), MarkId(10)),
            Err(ElectionError::StageLocked)
        ));

        // The same submission succeeds once a stage opens.
        s.apply_stage(Some(Stage::PrimaryRegistration), false)
            .unwrap();
        ledger.submit(VoterId(1), CandidateId(1), MarkId(10)).unwrap();
    }

    #[test]
    fn test_only_listed_candidates_can_be_marked() {
        let ledger = EvaluationLedger::new(store());
        assert!(matches!(
            ledger.submit(VoterId(1), CandidateId(2), MarkId(10)),
            Err(ElectionError::NotACandidate(CandidateId(2)))
        ));
        assert!(matches!(
            ledger.submit(VoterId(1), CandidateId(9), MarkId(10)),
            Err(ElectionError::CandidateNotFound(CandidateId(9)))
        ));
    }

    #[test]
    fn test_resubmission_overwrites() {
        let s = store();
        let ledger = EvaluationLedger::new(s.clone());
        ledger.submit(VoterId(1), CandidateId(1), MarkId(10)).unwrap();
        ledger.submit(VoterId(1), CandidateId(1), MarkId(11)).unwrap();

        let record = ledger.evaluation_of(VoterId(1), CandidateId(1)).unwrap();
        assert_eq!(record.unwrap().mark, MarkId(11));
        assert_eq!(s.iter_evaluations().unwrap().len(), 1);
    }

    #[test]
    fn test_results_only_during_primary_registration() {
        let s = store();
        let ledger = EvaluationLedger::new(s.clone());
        ledger.submit(VoterId(1), CandidateId(1), MarkId(10)).unwrap();
        ledger.submit(VoterId(2), CandidateId(1), MarkId(11)).unwrap();

        assert!(matches!(
            ledger.result_for(CandidateId(1)),
            Err(ElectionError::ResultsNotVisible)
        ));

        s.apply_stage(Some(Stage::PrimaryRegistration), false)
            .unwrap();
        assert_eq!(ledger.result_for(CandidateId(1)).unwrap(), 3);

        let all = ledger.result_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].points, 3);
    }

    #[test]
    fn test_unknown_mark_rejected() {
        let ledger = EvaluationLedger::new(store());
        assert!(matches!(
            ledger.submit(VoterId(1), CandidateId(1), MarkId(99)),
            Err(ElectionError::MarkNotFound(MarkId(99)))
        ));
    }
}
