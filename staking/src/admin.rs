//! Admin policy — who may tune the rate and sweep the reward pool.
//!
//! A thin gate over the ledger: every administrative operation checks the
//! caller identity against the configured admin principal before touching
//! anything. Unauthorized calls fail with state untouched.

use crate::error::StakeError;
use crate::ledger::StakeLedger;
use vela_token::TokenLedger;
use vela_types::{AccountId, RewardAmount, Timestamp};

/// Policy layer restricting rate changes and reward-asset sweeps to one
/// designated principal.
#[derive(Clone, Debug)]
pub struct AdminControl {
    admin: AccountId,
}

impl AdminControl {
    pub fn new(admin: AccountId) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    fn authorize(&self, caller: &AccountId) -> Result<(), StakeError> {
        if *caller != self.admin {
            tracing::warn!(%caller, "unauthorized admin call rejected");
            return Err(StakeError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    /// Change the global reward rate, effective for time accrued from `now`
    /// onward — for every active position, immediately.
    pub fn set_reward_rate<T: TokenLedger>(
        &self,
        caller: &AccountId,
        ledger: &mut StakeLedger<T>,
        new_rate: u128,
        now: Timestamp,
    ) -> Result<(), StakeError> {
        self.authorize(caller)?;
        ledger.set_rate(new_rate, now)
    }

    /// Move reward-asset funds out of the pool to the admin.
    ///
    /// Deliberately unbounded by outstanding reward liabilities: the admin is
    /// trusted not to starve future payouts.
    pub fn sweep_reward_asset<T: TokenLedger>(
        &self,
        caller: &AccountId,
        ledger: &StakeLedger<T>,
        amount: RewardAmount,
    ) -> Result<(), StakeError> {
        self.authorize(caller)?;
        ledger.sweep_reward(&self.admin, amount)
    }
}
