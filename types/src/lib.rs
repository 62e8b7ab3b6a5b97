//! Fundamental types for the agora election platform.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: record identifiers, the global election stage, gender
//! categories, payment weight tiers, and bill numbers.

pub mod gender;
pub mod ids;
pub mod stage;
pub mod tier;

pub use gender::Gender;
pub use ids::{BillNo, CandidateId, MarkId, ProofId, VoterId};
pub use stage::Stage;
pub use tier::WeightTier;
