//! Payment storage trait.

use crate::StoreError;
use agora_types::{BillNo, ProofId, VoterId};
use serde::{Deserialize, Serialize};

/// A payment request/confirmation record, shared with the gateway.
///
/// `amount` and `rec_account` are kept as the exact strings the gateway
/// echoes back — the checksum is computed over them byte-for-byte.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub bill_no: BillNo,
    pub voter: VoterId,
    pub amount: String,
    pub rec_account: String,
    pub confirmed: bool,
}

/// An uploaded payment-proof image awaiting manual admin review.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofRecord {
    pub id: ProofId,
    pub voter: VoterId,
    /// Opaque reference into the external file store.
    pub image: String,
}

/// Trait for payment storage.
pub trait PaymentStore {
    fn put_payment(&self, record: &PaymentRecord) -> Result<(), StoreError>;
    fn get_payment(&self, bill_no: &BillNo) -> Result<PaymentRecord, StoreError>;

    /// All bills belonging to one voter.
    fn payments_for_voter(&self, voter: VoterId) -> Result<Vec<PaymentRecord>, StoreError>;

    fn put_proof(&self, record: &ProofRecord) -> Result<(), StoreError>;

    /// All uploaded proofs, for the admin review queue.
    fn iter_proofs(&self) -> Result<Vec<ProofRecord>, StoreError>;
}
