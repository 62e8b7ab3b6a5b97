//! Ballot validation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ElectionError;
use agora_store::voter::VoterRecord;
use agora_store::{CandidateStore, ElectionStore, VoteStore, VoterStore};
use agora_types::{CandidateId, Gender, Stage, VoterId};

/// Minimum ballot size for every stage except final voting.
pub const MIN_BALLOT_SIZE: usize = 10;
/// Exact ballot size required during final voting.
pub const FINAL_BALLOT_SIZE: usize = 7;
/// Minimum share each gender must hold among the ranked candidates.
pub const GENDER_QUOTA_PERCENT: u8 = 27;

/// Decides whether a submitted ballot may be accepted.
///
/// Pure decision logic — nothing is persisted here. Rules run in a fixed
/// order and the first failure wins.
///
/// Final voting intentionally skips the duplicate/reference/quota/
/// already-voted checks: the ballot draws on the reduced pool filtered by
/// the earlier stages. Only the size and position rules apply there.
pub struct BallotValidator {
    store: Arc<dyn ElectionStore>,
}

impl BallotValidator {
    pub fn new(store: Arc<dyn ElectionStore>) -> Self {
        Self { store }
    }

    /// Validate `votes` for `voter` under the rules of `stage`.
    ///
    /// Returns the voter record so the caller can reuse its weight tier.
    pub fn validate(
        &self,
        voter: VoterId,
        stage: Stage,
        votes: &[CandidateId],
    ) -> Result<VoterRecord, ElectionError> {
        let record = self
            .store
            .get_voter(voter)
            .map_err(|_| ElectionError::VoterNotFound(voter))?;

        if votes.is_empty() {
            return Err(ElectionError::EmptyBallot);
        }

        if stage.is_final_voting() {
            if votes.len() != FINAL_BALLOT_SIZE {
                return Err(ElectionError::WrongFinalBallotSize {
                    required: FINAL_BALLOT_SIZE,
                    got: votes.len(),
                });
            }
        } else {
            if votes.len() < MIN_BALLOT_SIZE {
                return Err(ElectionError::BallotTooSmall {
                    min: MIN_BALLOT_SIZE,
                    got: votes.len(),
                });
            }

            let mut seen = HashSet::with_capacity(votes.len());
            for id in votes {
                if !seen.insert(*id) {
                    return Err(ElectionError::DuplicateCandidate(*id));
                }
            }

            let mut genders = Vec::with_capacity(votes.len());
            for id in votes {
                let candidate = self
                    .store
                    .get_candidate(*id)
                    .map_err(|_| ElectionError::InvalidCandidateReference(*id))?;
                genders.push(candidate.gender);
            }

            if self.store.has_ballot(voter, stage)? {
                return Err(ElectionError::AlreadyVoted(voter));
            }

            check_gender_quota(&genders)?;
        }

        // Positions are 1-based up to the ballot length; the last position
        // must still index into the registered candidate pool.
        if votes.len() as u64 > self.store.candidate_count()? {
            return Err(ElectionError::PositionOutOfRange);
        }

        Ok(record)
    }
}

/// Both genders must hold at least [`GENDER_QUOTA_PERCENT`] of the ballot.
fn check_gender_quota(genders: &[Gender]) -> Result<(), ElectionError> {
    let total = genders.len() as f64;
    for gender in Gender::BOTH {
        let count = genders.iter().filter(|g| **g == gender).count() as f64;
        if count / total * 100.0 < GENDER_QUOTA_PERCENT as f64 {
            return Err(ElectionError::GenderQuotaViolation {
                gender,
                quota: GENDER_QUOTA_PERCENT,
            });
        }
    }
    Ok(())
}
