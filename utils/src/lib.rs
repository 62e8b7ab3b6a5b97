//! Shared utilities for the agora election platform.

pub mod logging;

pub use logging::{init_tracing, init_tracing_with_default};
