//! API request handlers.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use agora_election::ElectionError;
use agora_payments::ConfirmRequest;
use agora_store::voter::VoterRecord;
use agora_store::{CandidateStore, MarkStore, VoterStore};
use agora_types::{BillNo, CandidateId, Gender, MarkId, Stage, VoterId};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the caller to a voter record and require the voter capability.
///
/// The upstream session layer authenticates the account; this is the
/// authorization gate for voter-only actions.
fn require_voter(state: &AppState, voter: VoterId) -> Result<VoterRecord, ApiError> {
    let record = state
        .store
        .get_voter(voter)
        .map_err(|_| ApiError::Election(ElectionError::VoterNotFound(voter)))?;
    if !record.is_voter {
        return Err(ApiError::NotAVoter);
    }
    Ok(record)
}

// ── Stage ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StageResponse {
    pub stage: Option<u8>,
    pub name: &'static str,
}

pub async fn get_stage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StageResponse>, ApiError> {
    let stage = state.stage.current()?;
    Ok(Json(StageResponse {
        stage: stage.map(Stage::code),
        name: Stage::display_name(stage),
    }))
}

// ── Catalog listings ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MarkResponse {
    pub id: u64,
    pub content: String,
    pub mark: i8,
}

pub async fn list_marks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MarkResponse>>, ApiError> {
    let marks = state
        .store
        .iter_marks()
        .map_err(ElectionError::from)?
        .into_iter()
        .map(|m| MarkResponse {
            id: m.id.as_u64(),
            content: m.content,
            mark: m.score,
        })
        .collect();
    Ok(Json(marks))
}

#[derive(Serialize)]
pub struct CandidateResponse {
    pub id: u64,
    pub gender: Gender,
}

pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CandidateResponse>>, ApiError> {
    let candidates = state
        .store
        .iter_listed_candidates()
        .map_err(ElectionError::from)?
        .into_iter()
        .map(|c| CandidateResponse {
            id: c.id.as_u64(),
            gender: c.gender,
        })
        .collect();
    Ok(Json(candidates))
}

// ── Evaluation ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EvaluationSubmission {
    pub voter: u64,
    pub candidate: u64,
    /// Mark option id, as the frontend names it.
    pub poll: u64,
}

pub async fn submit_evaluation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EvaluationSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    require_voter(&state, VoterId(payload.voter))?;
    state.evaluations.submit(
        VoterId(payload.voter),
        CandidateId(payload.candidate),
        MarkId(payload.poll),
    )?;
    Ok((StatusCode::OK, "OK"))
}

#[derive(Deserialize)]
pub struct EvaluationQuery {
    pub voter: u64,
    pub candidate: u64,
}

pub async fn get_evaluation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EvaluationQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record = state
        .evaluations
        .evaluation_of(VoterId(query.voter), CandidateId(query.candidate))?;
    Ok(Json(match record {
        Some(model) => json!({ "voted": true, "model": model }),
        None => json!({ "voted": false }),
    }))
}

#[derive(Deserialize)]
pub struct EvaluationResultQuery {
    pub candidate: Option<u64>,
}

pub async fn evaluation_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EvaluationResultQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match query.candidate {
        Some(id) => {
            let points = state.evaluations.result_for(CandidateId(id))?;
            Ok(Json(json!({ "points": points })))
        }
        None => {
            let all = state.evaluations.result_all()?;
            Ok(Json(json!(all)))
        }
    }
}

// ── Voting ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BallotSubmission {
    pub voter: u64,
    pub votes: Vec<u64>,
}

pub async fn submit_ballot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BallotSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    require_voter(&state, VoterId(payload.voter))?;
    let votes: Vec<CandidateId> = payload.votes.into_iter().map(CandidateId).collect();
    state.tally.submit_ballot(VoterId(payload.voter), &votes)?;
    Ok((StatusCode::OK, "OK"))
}

#[derive(Deserialize)]
pub struct VoteResultQuery {
    pub id: Option<u64>,
}

pub async fn vote_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoteResultQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state.tally.visible_results(query.id.map(CandidateId))?;
    Ok(Json(results))
}

// ── Payments ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BillResponse {
    #[serde(rename = "EDP_BILL_NO")]
    pub bill_no: String,
    #[serde(rename = "EDP_AMOUNT")]
    pub amount: String,
    #[serde(rename = "EDP_REC_ACCOUNT")]
    pub rec_account: String,
}

impl From<agora_store::payment::PaymentRecord> for BillResponse {
    fn from(record: agora_store::payment::PaymentRecord) -> Self {
        Self {
            bill_no: record.bill_no.to_string(),
            amount: record.amount,
            rec_account: record.rec_account,
        }
    }
}

#[derive(Deserialize)]
pub struct EvaluationPaymentQuery {
    pub voter: u64,
}

pub async fn request_evaluation_payment(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EvaluationPaymentQuery>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state
        .payments
        .request_evaluation_payment(VoterId(query.voter))?;
    Ok(Json(bill.into()))
}

#[derive(Deserialize)]
pub struct VotingPaymentQuery {
    pub voter: u64,
    pub count: u8,
}

pub async fn request_voting_payment(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VotingPaymentQuery>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state
        .payments
        .request_voting_payment(VoterId(query.voter), query.count)?;
    Ok(Json(bill.into()))
}

/// The gateway webhook payload: precheck and confirm phases share one
/// endpoint and are told apart by which fields are present.
#[derive(Deserialize)]
pub struct GatewayCallback {
    #[serde(rename = "EDP_PRECHECK")]
    pub precheck: Option<String>,
    #[serde(rename = "EDP_BILL_NO")]
    pub bill_no: Option<String>,
    #[serde(rename = "EDP_AMOUNT")]
    pub amount: Option<String>,
    #[serde(rename = "EDP_REC_ACCOUNT")]
    pub rec_account: Option<String>,
    #[serde(rename = "EDP_PAYER_ACCOUNT")]
    pub payer_account: Option<String>,
    #[serde(rename = "EDP_TRANS_ID")]
    pub trans_id: Option<String>,
    #[serde(rename = "EDP_TRANS_DATE")]
    pub trans_date: Option<String>,
    #[serde(rename = "EDP_CHECKSUM")]
    pub checksum: Option<String>,
}

/// The gateway pattern-matches on the literal body `"OK"`, so both phases
/// answer 200 with a plain-text body; failures carry the error text.
pub async fn gateway_callback(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<GatewayCallback>,
) -> (StatusCode, String) {
    if let (Some(precheck), Some(bill_no), Some(amount), Some(rec_account)) = (
        &payload.precheck,
        &payload.bill_no,
        &payload.amount,
        &payload.rec_account,
    ) {
        if precheck == "YES" {
            let result =
                state
                    .payments
                    .precheck(&BillNo::new(bill_no.clone()), amount, rec_account);
            return match result {
                Ok(()) => (StatusCode::OK, "OK".to_string()),
                Err(e) => (StatusCode::OK, e.to_string()),
            };
        }
    }

    if let (Some(bill_no), Some(amount), Some(payer_account), Some(trans_id), Some(checksum)) = (
        payload.bill_no,
        payload.amount,
        payload.payer_account,
        payload.trans_id,
        payload.checksum,
    ) {
        let request = ConfirmRequest {
            bill_no: BillNo::new(bill_no),
            amount,
            payer_account,
            trans_id,
            trans_date: payload.trans_date.unwrap_or_default(),
            checksum,
        };
        return match state.payments.confirm(&request) {
            Ok(()) => (StatusCode::OK, "OK".to_string()),
            Err(e) => (StatusCode::OK, e.to_string()),
        };
    }

    (StatusCode::OK, "missing gateway fields".to_string())
}

#[derive(Deserialize)]
pub struct ProofUpload {
    pub voter: u64,
    /// Reference into the external file store.
    pub image: String,
}

pub async fn submit_proof(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProofUpload>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = state
        .payments
        .submit_proof(VoterId(payload.voter), payload.image)
        .await?;
    Ok(Json(submission))
}
