//! Global configuration (stage singleton) storage trait.

use crate::StoreError;
use agora_types::Stage;

/// Trait for the global stage singleton.
///
/// There is exactly one live stage value. It cannot be deleted; an absent
/// value reads as `None` (inactive), which doubles as lazy creation.
pub trait ConfigStore {
    /// The current stage (`None` = inactive).
    fn stage(&self) -> Result<Option<Stage>, StoreError>;

    /// Write a new stage value, returning the previous one.
    ///
    /// In the same write transaction, when `reset_if_changed` is set and the
    /// stored value actually differs from `new`, every voter record is swept
    /// through [`crate::VoterRecord::reset_eligibility`]. A reader never
    /// observes the new stage with the sweep half-applied. The caller
    /// decides `reset_if_changed` from `Stage::clears_eligibility(new)`;
    /// the backend only supplies atomicity.
    fn apply_stage(
        &self,
        new: Option<Stage>,
        reset_if_changed: bool,
    ) -> Result<Option<Stage>, StoreError>;
}
