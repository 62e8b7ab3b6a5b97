//! Trust-mark catalog storage trait.

use crate::StoreError;
use agora_types::MarkId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid score range for a mark option.
pub const MARK_SCORE_MIN: i8 = -2;
pub const MARK_SCORE_MAX: i8 = 5;

/// One admin-curated trust-mark option.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkRecord {
    pub id: MarkId,
    /// Descriptive text shown to voters.
    pub content: String,
    /// Score in `[-2, 5]`.
    pub score: i8,
}

#[derive(Debug, Error)]
#[error("mark score {0} outside [{MARK_SCORE_MIN}, {MARK_SCORE_MAX}]")]
pub struct InvalidMarkScore(pub i8);

impl MarkRecord {
    pub fn new(
        id: MarkId,
        content: impl Into<String>,
        score: i8,
    ) -> Result<Self, InvalidMarkScore> {
        if !(MARK_SCORE_MIN..=MARK_SCORE_MAX).contains(&score) {
            return Err(InvalidMarkScore(score));
        }
        Ok(Self {
            id,
            content: content.into(),
            score,
        })
    }
}

/// Trait for the mark catalog. Immutable reference data as far as the
/// engines are concerned; only admin tooling writes it.
pub trait MarkStore {
    fn put_mark(&self, record: &MarkRecord) -> Result<(), StoreError>;
    fn get_mark(&self, id: MarkId) -> Result<MarkRecord, StoreError>;

    /// The full catalog, ordered by score.
    fn iter_marks(&self) -> Result<Vec<MarkRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range_enforced() {
        assert!(MarkRecord::new(MarkId(1), "full trust", 5).is_ok());
        assert!(MarkRecord::new(MarkId(2), "distrust", -2).is_ok());
        assert!(MarkRecord::new(MarkId(3), "", 6).is_err());
        assert!(MarkRecord::new(MarkId(4), "", -3).is_err());
    }
}
