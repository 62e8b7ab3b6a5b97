//! The global election stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One phase of the election calendar.
///
/// The live value is `Option<Stage>`: `None` means no stage is active.
/// Wire and storage representations use the numeric codes 1–5 that the
/// frontend already speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    /// Candidate qualification window.
    Qualification,
    /// Primary round: discussions and voter registration.
    PrimaryRegistration,
    /// Primary round: voting.
    PrimaryVoting,
    /// Final round: discussions and voter registration.
    FinalRegistration,
    /// Final round: voting.
    FinalVoting,
}

#[derive(Debug, Error)]
#[error("unknown stage code: {0}")]
pub struct UnknownStage(pub u8);

impl Stage {
    /// All stages, in calendar order.
    pub const ALL: [Stage; 5] = [
        Stage::Qualification,
        Stage::PrimaryRegistration,
        Stage::PrimaryVoting,
        Stage::FinalRegistration,
        Stage::FinalVoting,
    ];

    /// The numeric code used on the wire and in storage.
    pub fn code(self) -> u8 {
        match self {
            Stage::Qualification => 1,
            Stage::PrimaryRegistration => 2,
            Stage::PrimaryVoting => 3,
            Stage::FinalRegistration => 4,
            Stage::FinalVoting => 5,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, UnknownStage> {
        match code {
            1 => Ok(Stage::Qualification),
            2 => Ok(Stage::PrimaryRegistration),
            3 => Ok(Stage::PrimaryVoting),
            4 => Ok(Stage::FinalRegistration),
            5 => Ok(Stage::FinalVoting),
            other => Err(UnknownStage(other)),
        }
    }

    /// Display name for the stage query endpoint.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Qualification => "Qualification stage",
            Stage::PrimaryRegistration => "Primary stage: discussions and voter registration",
            Stage::PrimaryVoting => "Primary stage: voting",
            Stage::FinalRegistration => "Final stage: discussions and voter registration",
            Stage::FinalVoting => "Final stage: voting",
        }
    }

    /// Display name for an optional stage (`None` = inactive).
    pub fn display_name(stage: Option<Stage>) -> &'static str {
        match stage {
            Some(s) => s.name(),
            None => "No active stage",
        }
    }

    /// Whether ballots may be cast during this stage.
    pub fn is_voting(self) -> bool {
        matches!(self, Stage::PrimaryVoting | Stage::FinalVoting)
    }

    /// Whether this stage enforces the reduced final ballot (exactly 7 picks).
    pub fn is_final_voting(self) -> bool {
        matches!(self, Stage::FinalVoting)
    }

    /// Whether entering `stage` wipes voter payment and ballot eligibility.
    ///
    /// Payment and ballots are scoped to a single voting stage; every
    /// registration window (and the inactive state) opens with a clean slate.
    pub fn clears_eligibility(stage: Option<Stage>) -> bool {
        matches!(
            stage,
            None | Some(Stage::Qualification)
                | Some(Stage::PrimaryRegistration)
                | Some(Stage::FinalRegistration)
        )
    }
}

impl TryFrom<u8> for Stage {
    type Error = UnknownStage;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Stage::from_code(code)
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.code()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
