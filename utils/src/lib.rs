//! Shared utilities for the Vela staking workspace.

pub mod logging;

pub use logging::{init_tracing, init_tracing_with};
