//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

const MAX_DBS: u32 = 9;
const DEFAULT_MAP_SIZE: usize = 1 << 30; // 1 GiB

/// Wraps the LMDB environment and all database handles.
///
/// One `LmdbStore` implements every `agora-store` trait; all handles share
/// the single environment so composite operations can span databases inside
/// one write transaction.
pub struct LmdbStore {
    pub(crate) env: Env,
    /// `voter_id (8, BE)` → bincode `VoterRecord`.
    pub(crate) voters_db: Database<Bytes, Bytes>,
    /// `candidate_id (8, BE)` → bincode `CandidateRecord`.
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    /// `stage (1) ++ voter_id (8, BE) ++ position (4, BE)` → bincode `VoteRecord`.
    pub(crate) votes_db: Database<Bytes, Bytes>,
    /// `candidate_id (8, BE) ++ voter_id (8, BE)` → bincode `EvaluationRecord`.
    pub(crate) evaluations_db: Database<Bytes, Bytes>,
    /// `mark_id (8, BE)` → bincode `MarkRecord`.
    pub(crate) marks_db: Database<Bytes, Bytes>,
    /// `bill_no (utf8)` → bincode `PaymentRecord`.
    pub(crate) payments_db: Database<Bytes, Bytes>,
    /// `voter_id (8, BE) ++ bill_no (utf8)` → empty. Per-voter bill index.
    pub(crate) voter_bills_db: Database<Bytes, Bytes>,
    /// `proof_id (utf8)` → bincode `ProofRecord`.
    pub(crate) proofs_db: Database<Bytes, Bytes>,
    /// Internal bookkeeping; the stage singleton lives under `b"stage"`.
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create data dir: {e}")))?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let voters_db = env.create_database(&mut wtxn, Some("voters"))?;
        let candidates_db = env.create_database(&mut wtxn, Some("candidates"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let evaluations_db = env.create_database(&mut wtxn, Some("evaluations"))?;
        let marks_db = env.create_database(&mut wtxn, Some("marks"))?;
        let payments_db = env.create_database(&mut wtxn, Some("payments"))?;
        let voter_bills_db = env.create_database(&mut wtxn, Some("voter_bills"))?;
        let proofs_db = env.create_database(&mut wtxn, Some("proofs"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        Ok(Self {
            env,
            voters_db,
            candidates_db,
            votes_db,
            evaluations_db,
            marks_db,
            payments_db,
            voter_bills_db,
            proofs_db,
            meta_db,
        })
    }
}

/// Increment a byte prefix in place to form the exclusive upper bound of a
/// prefix range scan. Returns false when the prefix is all `0xFF` and no
/// finite upper bound exists (scan to the end instead).
pub(crate) fn increment_prefix(prefix: &mut [u8]) -> bool {
    for byte in prefix.iter_mut().rev() {
        if *byte != u8::MAX {
            *byte += 1;
            return true;
        }
        *byte = 0;
    }
    false
}
