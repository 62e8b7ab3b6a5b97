//! Election engines for the agora platform.
//!
//! Four engines over the storage traits:
//! - [`StageService`] — the global stage singleton and its reset side effect
//! - [`BallotValidator`] — the ballot rule chain
//! - [`VoteTally`] — ranked-choice point computation, atomic ballot
//!   submission, per-stage aggregation and result visibility
//! - [`EvaluationLedger`] — one trust-mark per (voter, candidate), upsert
//!   semantics, stage-gated sums

pub mod ballot;
pub mod error;
pub mod evaluation;
pub mod stage;
pub mod tally;

pub use ballot::{BallotValidator, FINAL_BALLOT_SIZE, GENDER_QUOTA_PERCENT, MIN_BALLOT_SIZE};
pub use error::{ElectionError, ErrorKind};
pub use evaluation::EvaluationLedger;
pub use stage::{StageService, StageTransition};
pub use tally::VoteTally;
