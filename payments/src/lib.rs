//! Payment ledger for the agora platform.
//!
//! Two independent confirmation channels, both ending in the same terminal
//! side effect (`is_paid = true` plus a weight tier):
//! - the gateway webhook (precheck + checksum-verified confirm)
//! - manually reviewed payment-proof uploads

pub mod error;
pub mod gateway;
pub mod proof;

pub use error::PaymentError;
pub use gateway::{gateway_checksum, ConfirmRequest, PaymentLedger, EVALUATION_AMOUNT};
pub use proof::ProofSubmission;
