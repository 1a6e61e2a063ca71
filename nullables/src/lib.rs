//! Nullable infrastructure for deterministic testing.
//!
//! The staking ledger's two external dependencies — time and the token
//! service — sit behind seams (`now` parameters and the `TokenLedger` trait).
//! This crate provides controllable stand-ins for both:
//! - [`NullClock`]: time that only advances when told to
//! - [`NullTokenLedger`]: an in-memory token service with scripted refusals
//!
//! Tests drive arbitrary interleavings of time and transfer outcomes without
//! ever touching a real clock or balance store.

pub mod clock;
pub mod token;

pub use clock::NullClock;
pub use token::{Direction, NullTokenLedger, TransferRecord};
