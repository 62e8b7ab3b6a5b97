//! Shared application state.

use std::sync::Arc;

use agora_election::{EvaluationLedger, StageService, VoteTally};
use agora_mailer::Mailer;
use agora_payments::PaymentLedger;
use agora_store::ElectionStore;

use crate::config::AppConfig;

/// Everything the handlers need: the engines plus the raw store for the
/// read-only listing endpoints.
pub struct AppState {
    pub store: Arc<dyn ElectionStore>,
    pub stage: StageService,
    pub tally: VoteTally,
    pub evaluations: EvaluationLedger,
    pub payments: PaymentLedger,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ElectionStore>,
        mailer: Arc<dyn Mailer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            stage: StageService::new(store.clone()),
            tally: VoteTally::new(store.clone()),
            evaluations: EvaluationLedger::new(store.clone()),
            payments: PaymentLedger::new(
                store.clone(),
                mailer,
                config.gateway_account.clone(),
                config.gateway_secret.clone(),
                config.admin_email.clone(),
                config.mail_from.clone(),
            ),
            store,
        }
    }
}
