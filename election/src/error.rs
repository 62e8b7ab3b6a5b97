//! Election error types.

use agora_store::StoreError;
use agora_types::{CandidateId, Gender, MarkId, VoterId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionError {
    #[error("voter {0} not found")]
    VoterNotFound(VoterId),

    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),

    #[error("ballot is empty")]
    EmptyBallot,

    #[error("ballot must rank at least {min} candidates, got {got}")]
    BallotTooSmall { min: usize, got: usize },

    #[error("final ballot must rank exactly {required} candidates, got {got}")]
    WrongFinalBallotSize { required: usize, got: usize },

    #[error("candidate {0} appears more than once in the ballot")]
    DuplicateCandidate(CandidateId),

    #[error("ballot references unknown candidate {0}")]
    InvalidCandidateReference(CandidateId),

    #[error("voter {0} has already voted in this stage")]
    AlreadyVoted(VoterId),

    #[error("{gender} candidates fall below {quota}% of the ballot")]
    GenderQuotaViolation { gender: Gender, quota: u8 },

    #[error("ballot ranks more candidates than are registered")]
    PositionOutOfRange,

    #[error("candidate {0} is not on the candidate list")]
    NotACandidate(CandidateId),

    #[error("mark option {0} not found")]
    MarkNotFound(MarkId),

    #[error("results are not available during the current stage")]
    ResultsNotVisible,

    #[error("this action is not available during the current stage")]
    StageLocked,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse error classes, used by the API layer for status mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Locked,
    Storage,
}

impl ElectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ElectionError::VoterNotFound(_)
            | ElectionError::CandidateNotFound(_)
            | ElectionError::MarkNotFound(_) => ErrorKind::NotFound,

            ElectionError::EmptyBallot
            | ElectionError::BallotTooSmall { .. }
            | ElectionError::WrongFinalBallotSize { .. }
            | ElectionError::DuplicateCandidate(_)
            | ElectionError::InvalidCandidateReference(_)
            | ElectionError::GenderQuotaViolation { .. }
            | ElectionError::PositionOutOfRange
            | ElectionError::NotACandidate(_) => ErrorKind::Validation,

            ElectionError::AlreadyVoted(_) | ElectionError::ResultsNotVisible => {
                ErrorKind::Conflict
            }

            ElectionError::StageLocked => ErrorKind::Locked,

            ElectionError::Store(_) => ErrorKind::Storage,
        }
    }
}
