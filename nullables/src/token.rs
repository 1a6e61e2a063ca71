//! Nullable token ledger — in-memory transfers with scripted refusals.

use std::collections::VecDeque;
use std::sync::Mutex;
use vela_token::{AssetKind, TokenError, TokenLedger};
use vela_types::AccountId;

/// Which way a recorded transfer moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Pulled from the owner into the staking pool.
    In,
    /// Pushed from the staking pool to the owner.
    Out,
}

/// One completed transfer, as the null ledger observed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub direction: Direction,
    pub owner: AccountId,
    pub asset: AssetKind,
    pub amount: u128,
}

/// An in-memory [`TokenLedger`] for testing.
///
/// Every transfer succeeds and is recorded unless a refusal has been
/// scripted. Refusals are consumed in FIFO order per direction, so a test
/// can let a withdraw's principal transfer through and fail only the reward
/// transfer that follows it.
///
/// Thread-safe: interior state is behind mutexes so the same instance can be
/// shared across threads in concurrency tests.
pub struct NullTokenLedger {
    records: Mutex<Vec<TransferRecord>>,
    planned_in: Mutex<VecDeque<Result<(), TokenError>>>,
    planned_out: Mutex<VecDeque<Result<(), TokenError>>>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            planned_in: Mutex::new(VecDeque::new()),
            planned_out: Mutex::new(VecDeque::new()),
        }
    }

    /// Script the outcome of the next unscripted `transfer_in` call.
    /// Multiple calls queue up outcomes in order.
    pub fn plan_in(&self, outcome: Result<(), TokenError>) {
        self.planned_in.lock().unwrap().push_back(outcome);
    }

    /// Script the outcome of the next unscripted `transfer_out` call.
    /// Multiple calls queue up outcomes in order.
    pub fn plan_out(&self, outcome: Result<(), TokenError>) {
        self.planned_out.lock().unwrap().push_back(outcome);
    }

    /// Shorthand: make the next `transfer_in` fail with `reason`.
    pub fn fail_next_in(&self, reason: &str) {
        self.plan_in(Err(TokenError::Rejected(reason.to_owned())));
    }

    /// Shorthand: make the next `transfer_out` fail with `reason`.
    pub fn fail_next_out(&self, reason: &str) {
        self.plan_out(Err(TokenError::Rejected(reason.to_owned())));
    }

    /// All transfers that actually completed, in call order.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Sum of completed outbound transfers of `asset` to `owner`.
    pub fn total_paid_out(&self, owner: &AccountId, asset: AssetKind) -> u128 {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.direction == Direction::Out && r.owner == *owner && r.asset == asset)
            .map(|r| r.amount)
            .sum()
    }

    fn record(&self, direction: Direction, owner: &AccountId, asset: AssetKind, amount: u128) {
        self.records.lock().unwrap().push(TransferRecord {
            direction,
            owner: owner.clone(),
            asset,
            amount,
        });
    }
}

impl Default for NullTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullTokenLedger {
    fn transfer_in(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        if let Some(outcome) = self.planned_in.lock().unwrap().pop_front() {
            outcome?;
        }
        self.record(Direction::In, owner, asset, amount);
        Ok(())
    }

    fn transfer_out(
        &self,
        owner: &AccountId,
        asset: AssetKind,
        amount: u128,
    ) -> Result<(), TokenError> {
        if let Some(outcome) = self.planned_out.lock().unwrap().pop_front() {
            outcome?;
        }
        self.record(Direction::Out, owner, asset, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AccountId {
        AccountId::new("user-1")
    }

    #[test]
    fn unscripted_transfers_succeed_and_record() {
        let ledger = NullTokenLedger::new();
        ledger.transfer_in(&user(), AssetKind::Stake, 100).unwrap();
        ledger.transfer_out(&user(), AssetKind::Reward, 7).unwrap();

        let records = ledger.transfers();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].direction, Direction::In);
        assert_eq!(records[1].amount, 7);
        assert_eq!(ledger.total_paid_out(&user(), AssetKind::Reward), 7);
    }

    #[test]
    fn scripted_refusal_is_consumed_in_order() {
        let ledger = NullTokenLedger::new();
        ledger.plan_out(Ok(()));
        ledger.fail_next_out("frozen");

        assert!(ledger.transfer_out(&user(), AssetKind::Stake, 1).is_ok());
        let err = ledger
            .transfer_out(&user(), AssetKind::Reward, 2)
            .unwrap_err();
        assert_eq!(err, TokenError::Rejected("frozen".into()));
        // Third call is unscripted again.
        assert!(ledger.transfer_out(&user(), AssetKind::Reward, 3).is_ok());
    }

    #[test]
    fn refused_transfers_are_not_recorded() {
        let ledger = NullTokenLedger::new();
        ledger.fail_next_in("no balance");
        assert!(ledger.transfer_in(&user(), AssetKind::Stake, 50).is_err());
        assert!(ledger.transfers().is_empty());
    }
}
