//! Fundamental types for the Vela staking system.
//!
//! This crate defines the core types shared by every other crate in the
//! workspace: account identities, asset amounts, and timestamps.

pub mod account;
pub mod amount;
pub mod time;

pub use account::AccountId;
pub use amount::{RewardAmount, StakeAmount};
pub use time::Timestamp;
