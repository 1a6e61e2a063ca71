//! The Vela staking ledger.
//!
//! Tracks per-user staked principal and time-accrued rewards. Users deposit,
//! withdraw, and claim independently; the admin tunes the global reward rate.
//!
//! This crate owns the bookkeeping — the invariants worth protecting live
//! here:
//! - conservation: `total_staked` always equals the sum over active positions
//! - at-most-once withdrawal: the active→withdrawn flip happens before any
//!   external transfer
//! - accrual correctness: reward is a pure function of elapsed time and the
//!   global rate schedule, settled with checked integer arithmetic
//!
//! Asset movement itself is delegated to the external [`vela_token::TokenLedger`]
//! collaborator.

pub mod accrual;
pub mod admin;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod position;
pub mod snapshot;

pub use accrual::{RateSchedule, RateSegment};
pub use admin::AdminControl;
pub use config::StakingConfig;
pub use error::StakeError;
pub use event::{EventBus, StakeEvent};
pub use ledger::{StakeLedger, WithdrawReceipt};
pub use position::{PositionBook, StakePosition};
pub use snapshot::LedgerSnapshot;
