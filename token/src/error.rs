//! Token collaborator errors.

use thiserror::Error;

/// Failure reported by the external token ledger.
///
/// The staking ledger never retries these — every refusal is surfaced
/// synchronously to the caller of the operation that triggered the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token service processed the request and declined it
    /// (e.g. insufficient balance, frozen account).
    #[error("transfer rejected: {0}")]
    Rejected(String),

    /// The token service could not be reached or answered out of protocol.
    #[error("token ledger unavailable: {0}")]
    Unavailable(String),
}
