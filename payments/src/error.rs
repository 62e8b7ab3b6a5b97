//! Payment error types.

use agora_store::StoreError;
use agora_types::{BillNo, VoterId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("voter {0} not found")]
    VoterNotFound(VoterId),

    #[error("voter {0} has already paid for this stage")]
    AlreadyPaid(VoterId),

    #[error("unknown weight tier request: {0}")]
    InvalidTierRequest(u8),

    #[error("unknown bill number: {0}")]
    UnknownBill(BillNo),

    #[error("bill amount does not match")]
    AmountMismatch,

    #[error("receiving account does not match")]
    AccountMismatch,

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}
