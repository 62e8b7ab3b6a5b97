//! Abstract storage traits for the agora election platform.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod candidate;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod mark;
pub mod payment;
pub mod vote;
pub mod voter;

pub use candidate::{CandidateRecord, CandidateStore};
pub use config::ConfigStore;
pub use error::StoreError;
pub use evaluation::{EvaluationRecord, EvaluationStore};
pub use mark::{MarkRecord, MarkStore};
pub use payment::{PaymentRecord, PaymentStore, ProofRecord};
pub use vote::{VoteRecord, VoteStore};
pub use voter::{VoterRecord, VoterStore};

/// Unified storage interface — everything the election engines need.
///
/// Backends implement the per-family traits; this supertrait exists so
/// engines can hold a single `Arc<dyn ElectionStore>`.
pub trait ElectionStore:
    VoterStore
    + CandidateStore
    + VoteStore
    + EvaluationStore
    + PaymentStore
    + MarkStore
    + ConfigStore
    + Send
    + Sync
{
}

impl<S> ElectionStore for S where
    S: VoterStore
        + CandidateStore
        + VoteStore
        + EvaluationStore
        + PaymentStore
        + MarkStore
        + ConfigStore
        + Send
        + Sync
{
}
