//! API error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use agora_election::{ElectionError, ErrorKind};
use agora_payments::PaymentError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Election(#[from] ElectionError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("this account is not a registered voter")]
    NotAVoter,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Election(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Locked => StatusCode::LOCKED,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Payment(e) => match e {
                PaymentError::VoterNotFound(_) | PaymentError::UnknownBill(_) => {
                    StatusCode::NOT_FOUND
                }
                PaymentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::NotAVoter => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "internal error");
        }
        (status, self.to_string()).into_response()
    }
}
