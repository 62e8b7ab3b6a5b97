//! Axum-based API server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// The API server, configured with a port and shared state.
pub struct ApiServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    /// Build the full route table.
    pub fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/stage", get(handlers::get_stage))
            .route("/api/marks", get(handlers::list_marks))
            .route("/api/candidates", get(handlers::list_candidates))
            .route(
                "/api/evaluate",
                get(handlers::get_evaluation).post(handlers::submit_evaluation),
            )
            .route("/api/evaluate/result", get(handlers::evaluation_results))
            .route("/api/vote", post(handlers::submit_ballot))
            .route("/api/vote/result", get(handlers::vote_results))
            .route(
                "/api/pay/evaluation",
                get(handlers::request_evaluation_payment),
            )
            .route("/api/pay/voting", get(handlers::request_voting_payment))
            .route("/api/pay/gateway", post(handlers::gateway_callback))
            .route("/api/pay/proof", post(handlers::submit_proof))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Start serving. Runs until the server is shut down.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let app = Self::router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.port);
        info!("API server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use agora_mailer::NullMailer;
    use agora_nullables::NullStore;
    use agora_payments::gateway_checksum;
    use agora_store::candidate::{CandidateRecord, CandidateStore};
    use agora_store::voter::{VoterRecord, VoterStore};
    use agora_types::{CandidateId, Gender, Stage, VoterId};
    use axum::extract::{Form, Query, State};
    use axum::http::StatusCode;
    use axum::Json;

    fn test_state() -> Arc<AppState> {
        let store = Arc::new(NullStore::new());
        let mut voter = VoterRecord::new(VoterId(1), "voter@agora.am");
        voter.is_email_verified = true;
        store.put_voter(&voter).unwrap();
        for id in 1..=12u64 {
            let gender = if id % 2 == 0 { Gender::Female } else { Gender::Male };
            let mut c = CandidateRecord::new(CandidateId(id), gender);
            c.is_email_verified = true;
            c.is_approved = true;
            c.recompute_flags();
            store.put_candidate(&c).unwrap();
        }
        let mut config = AppConfig::default();
        config.gateway_account = "100".into();
        config.gateway_secret = "S".into();
        Arc::new(AppState::new(store, Arc::new(NullMailer::new()), &config))
    }

    fn empty_callback() -> handlers::GatewayCallback {
        handlers::GatewayCallback {
            precheck: None,
            bill_no: None,
            amount: None,
            rec_account: None,
            payer_account: None,
            trans_id: None,
            trans_date: None,
            checksum: None,
        }
    }

    #[tokio::test]
    async fn test_gateway_precheck_and_confirm_flow() {
        let state = test_state();
        let bill = state
            .payments
            .request_voting_payment(VoterId(1), 1)
            .unwrap();

        let mut precheck = empty_callback();
        precheck.precheck = Some("YES".into());
        precheck.bill_no = Some(bill.bill_no.to_string());
        precheck.amount = Some("2.00".into());
        precheck.rec_account = Some("100".into());
        let (status, body) =
            handlers::gateway_callback(State(state.clone()), Form(precheck)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let mut confirm = empty_callback();
        confirm.bill_no = Some(bill.bill_no.to_string());
        confirm.amount = Some("2.00".into());
        confirm.payer_account = Some("P1".into());
        confirm.trans_id = Some("T1".into());
        confirm.trans_date = Some("D1".into());
        confirm.checksum = Some(gateway_checksum(
            "100",
            "2.00",
            "S",
            bill.bill_no.as_str(),
            "P1",
            "T1",
            "D1",
        ));
        let (status, body) =
            handlers::gateway_callback(State(state.clone()), Form(confirm)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let voter = state.store.get_voter(VoterId(1)).unwrap();
        assert!(voter.is_paid);
        assert!(voter.is_voter);
    }

    #[tokio::test]
    async fn test_gateway_rejects_bad_checksum_with_error_text() {
        let state = test_state();
        let bill = state
            .payments
            .request_voting_payment(VoterId(1), 1)
            .unwrap();

        let mut confirm = empty_callback();
        confirm.bill_no = Some(bill.bill_no.to_string());
        confirm.amount = Some("2.00".into());
        confirm.payer_account = Some("P1".into());
        confirm.trans_id = Some("T1".into());
        confirm.trans_date = Some("D1".into());
        confirm.checksum = Some("F00D".repeat(8));
        let (status, body) = handlers::gateway_callback(State(state.clone()), Form(confirm)).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body, "OK");
        assert!(!state.store.get_voter(VoterId(1)).unwrap().is_paid);
    }

    #[tokio::test]
    async fn test_unpaid_voter_cannot_vote() {
        let state = test_state();
        state
            .stage
            .set_stage(Some(Stage::PrimaryVoting))
            .unwrap();
        let payload = handlers::BallotSubmission {
            voter: 1,
            votes: (1..=10).collect(),
        };
        let err = handlers::submit_ballot(State(state), axum::Json(payload))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, crate::error::ApiError::NotAVoter));
    }

    #[tokio::test]
    async fn test_stage_endpoint_reports_inactive() {
        let state = test_state();
        let Json(response) = handlers::get_stage(State(state)).await.unwrap();
        assert_eq!(response.stage, None);
        assert_eq!(response.name, "No active stage");
    }

    #[tokio::test]
    async fn test_vote_results_closed_while_voting() {
        let state = test_state();
        state
            .stage
            .set_stage(Some(Stage::PrimaryVoting))
            .unwrap();
        let result = handlers::vote_results(
            State(state),
            Query(handlers::VoteResultQuery { id: None }),
        )
        .await;
        assert!(result.is_err());
    }
}
