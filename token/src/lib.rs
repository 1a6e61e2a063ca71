//! Token ledger collaborator interface.
//!
//! The staking ledger never moves asset balances itself — it asks an external
//! token service to do so through this narrow trait. Production deployments
//! implement [`TokenLedger`] against their real balance store; tests use the
//! deterministic implementation from `vela-nullables`.

pub mod error;
pub mod ledger;

pub use error::TokenError;
pub use ledger::{AssetKind, TokenLedger};
