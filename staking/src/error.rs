//! Staking-specific errors.

use thiserror::Error;
use vela_token::TokenError;
use vela_types::AccountId;

/// Every way a staking operation can fail.
///
/// All failures are surfaced synchronously to the caller; nothing is retried
/// internally. A failed deposit leaves all state unchanged. A transfer
/// refusal after withdraw/claim has committed ledger state is fatal for that
/// call and reported, never swallowed.
#[derive(Debug, Error)]
pub enum StakeError {
    #[error("stake amount must be greater than zero")]
    InvalidAmount,

    #[error("{user} has no position at index {index}")]
    InvalidIndex { user: AccountId, index: usize },

    #[error("position {0} has already been withdrawn")]
    AlreadyWithdrawn(usize),

    #[error("position {0} is no longer accruing")]
    InactiveStake(usize),

    #[error("stake transfer failed: {0}")]
    TransferFailed(TokenError),

    #[error("reward transfer failed: {0}")]
    RewardTransferFailed(TokenError),

    #[error("caller {0} is not the staking admin")]
    Unauthorized(AccountId),

    #[error("arithmetic overflow in reward computation")]
    ArithmeticOverflow,

    #[error("rate change timestamp must not precede current segment start")]
    InvalidTimestamp,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),
}
