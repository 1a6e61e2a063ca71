//! The `TokenLedger` trait.

use crate::TokenError;
use serde::{Deserialize, Serialize};
use vela_types::AccountId;

/// Which of the two fungible assets a transfer moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// The asset users deposit as principal.
    Stake,
    /// The asset rewards are paid in.
    Reward,
}

/// Narrow interface to the external balance-holding service.
///
/// `transfer_in` pulls `amount` raw units of `asset` from `owner` into the
/// staking pool; `transfer_out` pushes from the pool to `owner`. Both either
/// fully succeed or report a [`TokenError`] — there are no partial transfers.
///
/// Call-ordering contract with the staking ledger: on deposit the transfer is
/// confirmed before any ledger state is touched; on withdraw/claim the ledger
/// commits its own state first and treats a transfer refusal as fatal for
/// that call (surfaced, never swallowed or retried).
pub trait TokenLedger {
    fn transfer_in(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError>;

    fn transfer_out(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError>;
}

impl<T: TokenLedger + ?Sized> TokenLedger for &T {
    fn transfer_in(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_in(owner, asset, amount)
    }

    fn transfer_out(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_out(owner, asset, amount)
    }
}

impl<T: TokenLedger + ?Sized> TokenLedger for std::sync::Arc<T> {
    fn transfer_in(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_in(owner, asset, amount)
    }

    fn transfer_out(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_out(owner, asset, amount)
    }
}
