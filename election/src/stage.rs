//! The global stage state machine.

use std::sync::Arc;

use tracing::info;

use crate::error::ElectionError;
use agora_store::{ConfigStore, ElectionStore};
use agora_types::Stage;

/// Outcome of a stage write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageTransition {
    pub previous: Option<Stage>,
    pub current: Option<Stage>,
    /// Whether the voter eligibility sweep ran.
    pub reset_applied: bool,
}

/// Owns the stage singleton.
///
/// Any authorized write may set any value — there is no transition table.
/// Entering a registration window or the inactive state wipes every voter's
/// payment and ballot eligibility, atomically with the stage write. Writing
/// the same value twice never sweeps. The singleton cannot be deleted;
/// "inactive" is expressed as `None`.
pub struct StageService {
    store: Arc<dyn ElectionStore>,
}

impl StageService {
    pub fn new(store: Arc<dyn ElectionStore>) -> Self {
        Self { store }
    }

    /// The current stage (`None` = inactive; absent singleton reads as
    /// inactive, which doubles as lazy creation).
    pub fn current(&self) -> Result<Option<Stage>, ElectionError> {
        Ok(self.store.stage()?)
    }

    /// Write a new stage value.
    pub fn set_stage(&self, new: Option<Stage>) -> Result<StageTransition, ElectionError> {
        let reset = Stage::clears_eligibility(new);
        let previous = self.store.apply_stage(new, reset)?;
        let transition = StageTransition {
            previous,
            current: new,
            reset_applied: reset && previous != new,
        };
        info!(
            previous = Stage::display_name(previous),
            current = Stage::display_name(new),
            reset = transition.reset_applied,
            "stage updated"
        );
        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::NullStore;
    use agora_store::voter::{VoterRecord, VoterStore};
    use agora_types::{VoterId, WeightTier};

    fn service_with_paid_voters(n: u64) -> (StageService, Arc<NullStore>) {
        let store = Arc::new(NullStore::new());
        for id in 1..=n {
            let mut v = VoterRecord::new(VoterId(id), format!("v{id}@agora.am"));
            v.is_email_verified = true;
            v.is_paid = true;
            v.votes_count = Some(WeightTier::new(4).unwrap());
            v.already_voted = true;
            v.recompute_flags();
            store.put_voter(&v).unwrap();
        }
        (StageService::new(store.clone()), store)
    }

    #[test]
    fn test_initial_stage_is_inactive() {
        let (service, _) = service_with_paid_voters(0);
        assert_eq!(service.current().unwrap(), None);
    }

    #[test]
    fn test_entering_registration_resets_all_voters() {
        let (service, store) = service_with_paid_voters(3);
        service.set_stage(Some(Stage::PrimaryVoting)).unwrap();
        // Voting stages never sweep.
        assert!(store.get_voter(VoterId(1)).unwrap().is_paid);

        let t = service.set_stage(Some(Stage::FinalRegistration)).unwrap();
        assert!(t.reset_applied);
        for v in store.iter_voters().unwrap() {
            assert!(!v.is_paid);
            assert!(v.votes_count.is_none());
            assert!(!v.already_voted);
            assert!(!v.is_voter);
        }
    }

    #[test]
    fn test_rewriting_same_stage_is_idempotent() {
        let (service, store) = service_with_paid_voters(1);
        service.set_stage(Some(Stage::PrimaryRegistration)).unwrap();

        // Re-pay the voter, then write the same stage again.
        let mut v = store.get_voter(VoterId(1)).unwrap();
        v.is_paid = true;
        v.votes_count = Some(WeightTier::new(2).unwrap());
        v.recompute_flags();
        store.put_voter(&v).unwrap();

        let t = service.set_stage(Some(Stage::PrimaryRegistration)).unwrap();
        assert!(!t.reset_applied);
        assert!(store.get_voter(VoterId(1)).unwrap().is_paid);
    }

    #[test]
    fn test_inactive_clears_eligibility() {
        let (service, store) = service_with_paid_voters(1);
        service.set_stage(Some(Stage::FinalVoting)).unwrap();
        let t = service.set_stage(None).unwrap();
        assert!(t.reset_applied);
        assert!(!store.get_voter(VoterId(1)).unwrap().is_paid);
    }
}
