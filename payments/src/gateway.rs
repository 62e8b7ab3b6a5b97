//! The gateway webhook protocol.
//!
//! Two-phase flow against the payment provider:
//! 1. precheck — the provider asks whether the bill exists with the expected
//!    amount and receiving account (read-only);
//! 2. confirm — the provider reports a completed transaction with an MD5
//!    checksum over a canonical colon-joined string; a matching checksum
//!    flips the bill and the voter's eligibility flags.
//!
//! Confirm is idempotent: redelivered webhooks re-apply the same terminal
//! state.

use std::sync::Arc;

use tracing::info;

use crate::error::PaymentError;
use crate::proof;
use agora_mailer::Mailer;
use agora_store::payment::PaymentRecord;
use agora_store::{ElectionStore, PaymentStore, VoterStore};
use agora_types::{BillNo, VoterId, WeightTier};

/// The fixed amount of the evaluation-only payment. Carries no weight tier.
pub const EVALUATION_AMOUNT: &str = "1.00";

/// A confirm-phase webhook payload.
#[derive(Clone, Debug)]
pub struct ConfirmRequest {
    pub bill_no: BillNo,
    pub amount: String,
    pub payer_account: String,
    pub trans_id: String,
    pub trans_date: String,
    /// Uppercase hex MD5 digest supplied by the provider.
    pub checksum: String,
}

/// Compute the gateway checksum: uppercase hex MD5 of
/// `rec_account:amount:secret:bill_no:payer_account:trans_id:trans_date`.
pub fn gateway_checksum(
    rec_account: &str,
    amount: &str,
    secret: &str,
    bill_no: &str,
    payer_account: &str,
    trans_id: &str,
    trans_date: &str,
) -> String {
    let canonical = format!(
        "{rec_account}:{amount}:{secret}:{bill_no}:{payer_account}:{trans_id}:{trans_date}"
    );
    let digest = md5::compute(canonical.as_bytes());
    hex::encode(digest.0).to_ascii_uppercase()
}

/// Records payment requests and confirmations and flips voter eligibility.
pub struct PaymentLedger {
    store: Arc<dyn ElectionStore>,
    mailer: Arc<dyn Mailer>,
    /// Our account at the provider; part of every checksum.
    rec_account: String,
    /// Shared secret with the provider.
    secret: String,
    admin_email: String,
    mail_from: String,
}

impl PaymentLedger {
    pub fn new(
        store: Arc<dyn ElectionStore>,
        mailer: Arc<dyn Mailer>,
        rec_account: impl Into<String>,
        secret: impl Into<String>,
        admin_email: impl Into<String>,
        mail_from: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            rec_account: rec_account.into(),
            secret: secret.into(),
            admin_email: admin_email.into(),
            mail_from: mail_from.into(),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn ElectionStore> {
        &self.store
    }

    pub(crate) fn mailer(&self) -> &Arc<dyn Mailer> {
        &self.mailer
    }

    pub(crate) fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub(crate) fn mail_from(&self) -> &str {
        &self.mail_from
    }

    /// Create (or return the still-pending) bill for the evaluation fee.
    pub fn request_evaluation_payment(
        &self,
        voter: VoterId,
    ) -> Result<PaymentRecord, PaymentError> {
        self.request_payment(voter, EVALUATION_AMOUNT)
    }

    /// Create (or return the still-pending) bill for a voting payment at
    /// tier `count`.
    pub fn request_voting_payment(
        &self,
        voter: VoterId,
        count: u8,
    ) -> Result<PaymentRecord, PaymentError> {
        let tier =
            WeightTier::new(count).map_err(|_| PaymentError::InvalidTierRequest(count))?;
        self.request_payment(voter, tier.amount())
    }

    fn request_payment(
        &self,
        voter: VoterId,
        amount: &str,
    ) -> Result<PaymentRecord, PaymentError> {
        let record = self
            .store
            .get_voter(voter)
            .map_err(|_| PaymentError::VoterNotFound(voter))?;
        if record.is_paid {
            return Err(PaymentError::AlreadyPaid(voter));
        }

        // One pending bill per (voter, amount): redeliver the existing one.
        if let Some(existing) = self
            .store
            .payments_for_voter(voter)?
            .into_iter()
            .find(|p| !p.confirmed && p.amount == amount)
        {
            return Ok(existing);
        }

        let bill = PaymentRecord {
            bill_no: BillNo::generate(),
            voter,
            amount: amount.to_string(),
            rec_account: self.rec_account.clone(),
            confirmed: false,
        };
        self.store.put_payment(&bill)?;
        info!(%voter, amount, bill = %bill.bill_no, "payment requested");
        Ok(bill)
    }

    /// Precheck phase: verify the bill without mutating anything.
    pub fn precheck(
        &self,
        bill_no: &BillNo,
        amount: &str,
        rec_account: &str,
    ) -> Result<(), PaymentError> {
        let bill = self
            .store
            .get_payment(bill_no)
            .map_err(|_| PaymentError::UnknownBill(bill_no.clone()))?;
        if bill.amount != amount {
            return Err(PaymentError::AmountMismatch);
        }
        if bill.rec_account != rec_account {
            return Err(PaymentError::AccountMismatch);
        }
        Ok(())
    }

    /// Confirm phase: verify the checksum and apply the terminal state.
    pub fn confirm(&self, request: &ConfirmRequest) -> Result<(), PaymentError> {
        let expected = gateway_checksum(
            &self.rec_account,
            &request.amount,
            &self.secret,
            request.bill_no.as_str(),
            &request.payer_account,
            &request.trans_id,
            &request.trans_date,
        );
        if !request.checksum.eq_ignore_ascii_case(&expected) {
            return Err(PaymentError::ChecksumMismatch);
        }

        let mut bill = self
            .store
            .get_payment(&request.bill_no)
            .map_err(|_| PaymentError::UnknownBill(request.bill_no.clone()))?;
        bill.confirmed = true;
        self.store.put_payment(&bill)?;

        let mut voter = self
            .store
            .get_voter(bill.voter)
            .map_err(|_| PaymentError::VoterNotFound(bill.voter))?;
        voter.is_paid = true;
        if let Some(tier) = WeightTier::from_amount(&bill.amount) {
            voter.votes_count = Some(tier);
        }
        voter.recompute_flags();
        self.store.put_voter(&voter)?;

        info!(
            bill = %bill.bill_no,
            voter = %bill.voter,
            amount = %bill.amount,
            "payment confirmed"
        );
        Ok(())
    }

    /// See [`proof::submit_proof`].
    pub async fn submit_proof(
        &self,
        voter: VoterId,
        image: impl Into<String>,
    ) -> Result<proof::ProofSubmission, PaymentError> {
        proof::submit_proof(self, voter, image.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_mailer::NullMailer;
    use agora_nullables::NullStore;
    use agora_store::voter::{VoterRecord, VoterStore};

    fn ledger() -> (PaymentLedger, Arc<NullStore>) {
        let store = Arc::new(NullStore::new());
        let mut voter = VoterRecord::new(VoterId(1), "voter@agora.am");
        voter.is_email_verified = true;
        voter.recompute_flags();
        store.put_voter(&voter).unwrap();
        let ledger = PaymentLedger::new(
            store.clone(),
            Arc::new(NullMailer::new()),
            "100",
            "S",
            "admin@agora.am",
            "noreply@agora.am",
        );
        (ledger, store)
    }

    #[test]
    fn test_checksum_matches_known_vector() {
        // MD5("100:2.00:S:B1:P1:T1:D1"), uppercased.
        let checksum = gateway_checksum("100", "2.00", "S", "B1", "P1", "T1", "D1");
        assert_eq!(checksum, "D7AE82086D1C61B2F3FB9F83561B50C5");
        // Any single-field mutation must change the digest.
        for mutated in [
            gateway_checksum("101", "2.00", "S", "B1", "P1", "T1", "D1"),
            gateway_checksum("100", "2.01", "S", "B1", "P1", "T1", "D1"),
            gateway_checksum("100", "2.00", "X", "B1", "P1", "T1", "D1"),
            gateway_checksum("100", "2.00", "S", "B2", "P1", "T1", "D1"),
            gateway_checksum("100", "2.00", "S", "B1", "P2", "T1", "D1"),
            gateway_checksum("100", "2.00", "S", "B1", "P1", "T2", "D1"),
            gateway_checksum("100", "2.00", "S", "B1", "P1", "T1", "D2"),
        ] {
            assert_ne!(checksum, mutated);
        }
    }

    fn confirm_request(bill: &PaymentRecord) -> ConfirmRequest {
        ConfirmRequest {
            bill_no: bill.bill_no.clone(),
            amount: bill.amount.clone(),
            payer_account: "P1".into(),
            trans_id: "T1".into(),
            trans_date: "D1".into(),
            checksum: gateway_checksum(
                "100",
                &bill.amount,
                "S",
                bill.bill_no.as_str(),
                "P1",
                "T1",
                "D1",
            ),
        }
    }

    #[test]
    fn test_confirm_flips_bill_and_voter() {
        let (ledger, store) = ledger();
        let bill = ledger.request_voting_payment(VoterId(1), 3).unwrap();
        assert_eq!(bill.amount, "4.00");

        ledger.precheck(&bill.bill_no, "4.00", "100").unwrap();
        ledger.confirm(&confirm_request(&bill)).unwrap();

        assert!(store.get_payment(&bill.bill_no).unwrap().confirmed);
        let voter = store.get_voter(VoterId(1)).unwrap();
        assert!(voter.is_paid);
        assert_eq!(voter.votes_count.map(WeightTier::get), Some(3));
        assert!(voter.is_voter);
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let (ledger, store) = ledger();
        let bill = ledger.request_voting_payment(VoterId(1), 5).unwrap();
        let request = confirm_request(&bill);
        ledger.confirm(&request).unwrap();
        ledger.confirm(&request).unwrap();

        let voter = store.get_voter(VoterId(1)).unwrap();
        assert!(voter.is_paid);
        assert_eq!(voter.votes_count.map(WeightTier::get), Some(5));
    }

    #[test]
    fn test_bad_checksum_mutates_nothing() {
        let (ledger, store) = ledger();
        let bill = ledger.request_voting_payment(VoterId(1), 2).unwrap();
        let mut request = confirm_request(&bill);
        request.checksum = gateway_checksum(
            "100",
            "9.99",
            "S",
            bill.bill_no.as_str(),
            "P1",
            "T1",
            "D1",
        );

        let err = ledger.confirm(&request).unwrap_err();
        assert!(matches!(err, PaymentError::ChecksumMismatch));
        assert!(!store.get_payment(&bill.bill_no).unwrap().confirmed);
        assert!(!store.get_voter(VoterId(1)).unwrap().is_paid);
    }

    #[test]
    fn test_evaluation_payment_sets_no_tier() {
        let (ledger, store) = ledger();
        let bill = ledger.request_evaluation_payment(VoterId(1)).unwrap();
        assert_eq!(bill.amount, EVALUATION_AMOUNT);
        ledger.confirm(&confirm_request(&bill)).unwrap();

        let voter = store.get_voter(VoterId(1)).unwrap();
        assert!(voter.is_paid);
        assert!(voter.votes_count.is_none());
    }

    #[test]
    fn test_pending_bill_is_reused() {
        let (ledger, _) = ledger();
        let first = ledger.request_voting_payment(VoterId(1), 1).unwrap();
        let second = ledger.request_voting_payment(VoterId(1), 1).unwrap();
        assert_eq!(first.bill_no, second.bill_no);
    }

    #[test]
    fn test_paid_voter_cannot_request_again() {
        let (ledger, store) = ledger();
        let mut voter = store.get_voter(VoterId(1)).unwrap();
        voter.is_paid = true;
        store.put_voter(&voter).unwrap();

        assert!(matches!(
            ledger.request_voting_payment(VoterId(1), 1),
            Err(PaymentError::AlreadyPaid(VoterId(1)))
        ));
    }

    #[test]
    fn test_precheck_validates_amount_and_account() {
        let (ledger, _) = ledger();
        let bill = ledger.request_voting_payment(VoterId(1), 1).unwrap();
        assert!(matches!(
            ledger.precheck(&bill.bill_no, "3.00", "100"),
            Err(PaymentError::AmountMismatch)
        ));
        assert!(matches!(
            ledger.precheck(&bill.bill_no, "2.00", "200"),
            Err(PaymentError::AccountMismatch)
        ));
        assert!(matches!(
            ledger.precheck(&BillNo::new("missing"), "2.00", "100"),
            Err(PaymentError::UnknownBill(_))
        ));
    }

    #[test]
    fn test_invalid_tier_request() {
        let (ledger, _) = ledger();
        assert!(matches!(
            ledger.request_voting_payment(VoterId(1), 0),
            Err(PaymentError::InvalidTierRequest(0))
        ));
        assert!(matches!(
            ledger.request_voting_payment(VoterId(1), 6),
            Err(PaymentError::InvalidTierRequest(6))
        ));
    }
}
