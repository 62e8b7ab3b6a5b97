//! LMDB implementation of ConfigStore (the stage singleton).

use agora_store::config::ConfigStore;
use agora_store::voter::VoterRecord;
use agora_store::StoreError;
use agora_types::Stage;

use crate::environment::LmdbStore;
use crate::LmdbError;

const STAGE_KEY: &[u8] = b"stage";

/// `None` is stored as code 0; an absent key also reads as `None`, which is
/// the lazy creation the singleton contract asks for.
fn decode_stage(raw: Option<&[u8]>) -> Result<Option<Stage>, LmdbError> {
    match raw {
        None | Some([0]) => Ok(None),
        Some([code]) => Stage::from_code(*code)
            .map(Some)
            .map_err(|e| LmdbError::Serialization(e.to_string())),
        Some(other) => Err(LmdbError::Serialization(format!(
            "stage value has length {}",
            other.len()
        ))),
    }
}

impl ConfigStore for LmdbStore {
    fn stage(&self) -> Result<Option<Stage>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let raw = self.meta_db.get(&rtxn, STAGE_KEY).map_err(LmdbError::from)?;
        Ok(decode_stage(raw)?)
    }

    fn apply_stage(
        &self,
        new: Option<Stage>,
        reset_if_changed: bool,
    ) -> Result<Option<Stage>, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let previous =
            decode_stage(self.meta_db.get(&wtxn, STAGE_KEY).map_err(LmdbError::from)?)?;

        let code = [new.map(Stage::code).unwrap_or(0)];
        self.meta_db
            .put(&mut wtxn, STAGE_KEY, &code)
            .map_err(LmdbError::from)?;

        if reset_if_changed && previous != new {
            // Sweep every voter inside the same transaction: a reader never
            // sees the new stage with the reset half-applied.
            let mut voters: Vec<VoterRecord> = Vec::new();
            {
                let iter = self.voters_db.iter(&wtxn).map_err(LmdbError::from)?;
                for entry in iter {
                    let (_key, val) = entry.map_err(LmdbError::from)?;
                    voters.push(bincode::deserialize(val).map_err(LmdbError::from)?);
                }
            }
            for mut voter in voters {
                voter.reset_eligibility();
                let bytes = bincode::serialize(&voter).map_err(LmdbError::from)?;
                self.voters_db
                    .put(&mut wtxn, &voter.id.to_be_bytes(), &bytes)
                    .map_err(LmdbError::from)?;
            }
        }

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(previous)
    }
}
