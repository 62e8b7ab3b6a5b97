//! The payment-proof channel.
//!
//! A voter uploads a payment receipt image; an administrator reviews it
//! out-of-band and flips the voter's eligibility manually. This module only
//! stores the proof and notifies the admin — there is no automated
//! confirmation.

use serde::Serialize;
use tracing::warn;

use crate::error::PaymentError;
use crate::gateway::PaymentLedger;
use agora_mailer::MailMessage;
use agora_store::payment::ProofRecord;
use agora_store::{PaymentStore, VoterStore};
use agora_types::{ProofId, VoterId};

/// Result of storing a payment proof.
///
/// `mail_error` reports a failed admin notification; the stored proof is
/// kept either way.
#[derive(Clone, Debug, Serialize)]
pub struct ProofSubmission {
    pub proof: ProofRecord,
    pub mail_error: Option<String>,
}

pub(crate) async fn submit_proof(
    ledger: &PaymentLedger,
    voter: VoterId,
    image: String,
) -> Result<ProofSubmission, PaymentError> {
    let record = ledger
        .store()
        .get_voter(voter)
        .map_err(|_| PaymentError::VoterNotFound(voter))?;

    let proof = ProofRecord {
        id: ProofId::generate(),
        voter,
        image,
    };
    ledger.store().put_proof(&proof)?;

    // Best-effort notification; the stored proof stands even if this fails.
    let message = MailMessage {
        from: ledger.mail_from().to_string(),
        to: ledger.admin_email().to_string(),
        subject: Some("Payment proof uploaded".to_string()),
        body: format!(
            "Voter {} ({}) uploaded a payment proof. Please review it and \
             confirm their voter status.",
            voter, record.email
        ),
    };
    let mail_error = match ledger.mailer().send(&message).await {
        Ok(()) => None,
        Err(e) => {
            warn!(%voter, error = %e, "admin notification failed");
            Some(e.to_string())
        }
    };

    Ok(ProofSubmission { proof, mail_error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_mailer::NullMailer;
    use agora_nullables::NullStore;
    use agora_store::payment::PaymentStore;
    use agora_store::voter::{VoterRecord, VoterStore};
    use std::sync::Arc;

    fn ledger_with_mailer(mailer: NullMailer) -> (PaymentLedger, Arc<NullStore>, Arc<NullMailer>) {
        let store = Arc::new(NullStore::new());
        store
            .put_voter(&VoterRecord::new(VoterId(1), "voter@agora.am"))
            .unwrap();
        let mailer = Arc::new(mailer);
        let ledger = PaymentLedger::new(
            store.clone(),
            mailer.clone(),
            "100",
            "S",
            "admin@agora.am",
            "noreply@agora.am",
        );
        (ledger, store, mailer)
    }

    #[tokio::test]
    async fn test_proof_stored_and_admin_notified() {
        let (ledger, store, mailer) = ledger_with_mailer(NullMailer::new());
        let submission = ledger
            .submit_proof(VoterId(1), "payment_images/receipt.jpg")
            .await
            .unwrap();

        assert!(submission.mail_error.is_none());
        assert_eq!(store.iter_proofs().unwrap().len(), 1);
        assert_eq!(mailer.sent_count(), 1);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].to, "admin@agora.am");
    }

    #[tokio::test]
    async fn test_proof_survives_mail_failure() {
        let (ledger, store, _) = ledger_with_mailer(NullMailer::failing());
        let submission = ledger
            .submit_proof(VoterId(1), "payment_images/receipt.jpg")
            .await
            .unwrap();

        assert!(submission.mail_error.is_some());
        assert_eq!(store.iter_proofs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_voter_rejected() {
        let (ledger, _, _) = ledger_with_mailer(NullMailer::new());
        assert!(matches!(
            ledger.submit_proof(VoterId(9), "x.jpg").await,
            Err(PaymentError::VoterNotFound(VoterId(9)))
        ));
    }
}
