//! HTTP API for the agora election platform.
//!
//! Provides endpoints for:
//! - Stage query
//! - Mark catalog and candidate listing
//! - Trust-evaluation submission and results
//! - Ballot submission and ranked-voting results
//! - Payment bills, the gateway webhook, and payment-proof uploads
//!
//! Authentication and session handling live upstream (reverse proxy); the
//! handlers receive the resolved voter id explicitly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::ApiServer;
pub use state::AppState;
