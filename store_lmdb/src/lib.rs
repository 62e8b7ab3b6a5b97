//! LMDB storage backend for the agora election platform.
//!
//! Implements all storage traits from `agora-store` using the `heed` LMDB
//! bindings. Each record family maps to one LMDB database within a single
//! environment. LMDB's single-writer property is what makes the two
//! composite operations (`apply_stage`, `insert_ballot`) atomic.

pub mod candidate;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluation;
pub mod mark;
pub mod payment;
pub mod vote;
pub mod voter;

pub use environment::LmdbStore;
pub use error::LmdbError;
