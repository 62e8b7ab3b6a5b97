use std::sync::Arc;

use proptest::prelude::*;

use agora_election::VoteTally;
use agora_nullables::NullStore;
use agora_store::candidate::{CandidateRecord, CandidateStore};
use agora_store::config::ConfigStore;
use agora_store::vote::VoteStore;
use agora_store::voter::{VoterRecord, VoterStore};
use agora_types::{CandidateId, Gender, Stage, VoterId, WeightTier};

/// A store with `pool` listed candidates (alternating genders) and one paid
/// voter at the given tier, with primary voting open.
fn voting_store(pool: u64, tier: u8) -> Arc<NullStore> {
    let store = Arc::new(NullStore::new());
    let mut voter = VoterRecord::new(VoterId(1), "voter@agora.am");
    voter.is_email_verified = true;
    voter.is_paid = true;
    voter.votes_count = Some(WeightTier::new(tier).unwrap());
    voter.recompute_flags();
    store.put_voter(&voter).unwrap();
    for id in 1..=pool {
        let gender = if id % 2 == 0 { Gender::Female } else { Gender::Male };
        let mut c = CandidateRecord::new(CandidateId(id), gender);
        c.is_email_verified = true;
        c.is_approved = true;
        c.recompute_flags();
        store.put_candidate(&c).unwrap();
    }
    store.apply_stage(Some(Stage::PrimaryVoting), false).unwrap();
    store
}

proptest! {
    /// An accepted ballot of size n at tier w sums to w * H(n), and every
    /// stored record carries exactly w / position points.
    #[test]
    fn ballot_points_sum_to_weight_times_harmonic(
        n in 10u64..=40,
        tier in 1u8..=5,
    ) {
        let store = voting_store(n, tier);
        let tally = VoteTally::new(store.clone());
        let votes: Vec<CandidateId> = (1..=n).map(CandidateId).collect();
        tally.submit_ballot(VoterId(1), &votes).unwrap();

        let records = store.votes_for_stage(Stage::PrimaryVoting).unwrap();
        prop_assert_eq!(records.len() as u64, n);
        for r in &records {
            prop_assert!((r.points - tier as f64 / r.position as f64).abs() < 1e-12);
        }
        let total: f64 = records.iter().map(|r| r.points).sum();
        let harmonic: f64 = (1..=n).map(|k| 1.0 / k as f64).sum();
        prop_assert!((total - tier as f64 * harmonic).abs() < 1e-9);
    }

    /// A second ballot for the same stage never adds records, whatever its
    /// content.
    #[test]
    fn repeated_submission_never_duplicates(n in 10u64..=20) {
        let store = voting_store(n, 1);
        let tally = VoteTally::new(store.clone());
        let votes: Vec<CandidateId> = (1..=n).map(CandidateId).collect();
        tally.submit_ballot(VoterId(1), &votes).unwrap();
        let before = store.vote_count().unwrap();

        prop_assert!(tally.submit_ballot(VoterId(1), &votes).is_err());
        prop_assert_eq!(store.vote_count().unwrap(), before);
    }
}
