//! The staking ledger engine.
//!
//! One public operation is one atomicity unit: `now` is resolved once by the
//! caller at entry and used throughout the call, and the engine takes
//! `&mut self` for mutating operations so two calls can never interleave.
//!
//! Call-ordering contract with the token collaborator:
//! - deposit: confirm `transfer_in` BEFORE touching ledger state, so a
//!   refused transfer never leaves a dangling position
//! - withdraw/claim: commit ledger state BEFORE `transfer_out`, so a
//!   re-entrant or repeated call observes the position already settled; a
//!   transfer refusal after commit is fatal for that call and surfaced to the
//!   caller, never swallowed or retried

use std::collections::HashMap;

use crate::accrual::RateSchedule;
use crate::error::StakeError;
use crate::event::{EventBus, StakeEvent};
use crate::position::{PositionBook, StakePosition};
use crate::snapshot::LedgerSnapshot;
use vela_token::{AssetKind, TokenLedger};
use vela_types::{AccountId, RewardAmount, StakeAmount, Timestamp};

/// What a completed withdrawal returned to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub principal: StakeAmount,
    pub reward: RewardAmount,
}

/// The staking ledger — positions per user, the global rate schedule, and
/// the conservation counter.
///
/// Invariant: `total_staked` equals the sum of `amount` over all active
/// positions across all users, after every operation.
pub struct StakeLedger<T: TokenLedger> {
    token: T,
    books: HashMap<AccountId, PositionBook>,
    rates: RateSchedule,
    total_staked: StakeAmount,
    events: EventBus,
}

impl<T: TokenLedger> StakeLedger<T> {
    pub fn new(token: T, initial_rate: u128, genesis: Timestamp) -> Self {
        Self {
            token,
            books: HashMap::new(),
            rates: RateSchedule::new(initial_rate, genesis),
            total_staked: StakeAmount::ZERO,
            events: EventBus::new(),
        }
    }

    /// Rebuild a ledger from a snapshot, reattaching the token collaborator.
    pub fn restore(token: T, snapshot: LedgerSnapshot) -> Self {
        Self {
            token,
            books: snapshot.books,
            rates: snapshot.rates,
            total_staked: snapshot.total_staked,
            events: EventBus::new(),
        }
    }

    /// Subscribe an observer to ledger notifications.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakeEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── User operations ─────────────────────────────────────────────────

    /// Deposit `amount` of the stake asset, creating a new position.
    ///
    /// The token transfer is confirmed before any ledger mutation; a refused
    /// transfer leaves the ledger exactly as it was. Returns the new
    /// position's stable index.
    pub fn deposit(
        &mut self,
        user: &AccountId,
        amount: StakeAmount,
        now: Timestamp,
    ) -> Result<usize, StakeError> {
        if amount.is_zero() {
            return Err(StakeError::InvalidAmount);
        }
        let new_total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakeError::ArithmeticOverflow)?;

        self.token
            .transfer_in(user, AssetKind::Stake, amount.raw())
            .map_err(|e| {
                tracing::warn!(%user, %amount, error = %e, "deposit transfer refused");
                StakeError::TransferFailed(e)
            })?;

        let book = self.books.entry(user.clone()).or_default();
        let index = book.push(StakePosition::new(amount, now));
        self.total_staked = new_total;

        tracing::debug!(%user, %amount, index, "stake deposited");
        self.events.emit(&StakeEvent::Staked {
            user: user.clone(),
            amount: amount.raw(),
            index,
        });
        Ok(index)
    }

    /// Withdraw a position: return its principal and pay out its reward.
    ///
    /// The position flips to inactive and `total_staked` drops before any
    /// external transfer — that flip is the at-most-once guard; a second
    /// withdraw of the same index fails with `AlreadyWithdrawn`. If the
    /// principal transfer succeeds but the reward transfer is refused, the
    /// principal is NOT rolled back: the call fails with
    /// `RewardTransferFailed` and the unpaid reward is reported in the error
    /// path (documented two-phase limitation).
    pub fn withdraw(
        &mut self,
        user: &AccountId,
        index: usize,
        now: Timestamp,
    ) -> Result<WithdrawReceipt, StakeError> {
        let book = self
            .books
            .get_mut(user)
            .ok_or_else(|| StakeError::InvalidIndex {
                user: user.clone(),
                index,
            })?;
        let position = book
            .get_mut(index)
            .ok_or_else(|| StakeError::InvalidIndex {
                user: user.clone(),
                index,
            })?;
        if !position.active {
            return Err(StakeError::AlreadyWithdrawn(index));
        }

        // Settle before mutating: checked arithmetic throughout.
        let live = self.rates.accrued_between(position.started_at, now)?;
        let reward = position
            .banked_reward
            .checked_add(live)
            .ok_or(StakeError::ArithmeticOverflow)?;
        let principal = position.amount;
        let new_total = self
            .total_staked
            .checked_sub(principal)
            .ok_or(StakeError::ArithmeticOverflow)?;

        // Commit: terminal deactivation before any external call.
        position.active = false;
        position.banked_reward = RewardAmount::ZERO;
        self.total_staked = new_total;

        self.token
            .transfer_out(user, AssetKind::Stake, principal.raw())
            .map_err(|e| {
                tracing::warn!(%user, index, %principal, error = %e, "principal transfer refused");
                StakeError::TransferFailed(e)
            })?;
        if !reward.is_zero() {
            self.token
                .transfer_out(user, AssetKind::Reward, reward.raw())
                .map_err(|e| {
                    tracing::warn!(
                        %user, index, %reward, error = %e,
                        "reward transfer refused after principal payout"
                    );
                    StakeError::RewardTransferFailed(e)
                })?;
        }

        tracing::debug!(%user, index, %principal, %reward, "stake withdrawn");
        self.events.emit(&StakeEvent::Withdrawn {
            user: user.clone(),
            amount: principal.raw(),
            index,
        });
        if !reward.is_zero() {
            self.events.emit(&StakeEvent::RewardPaid {
                user: user.clone(),
                amount: reward.raw(),
                index,
            });
        }
        Ok(WithdrawReceipt { principal, reward })
    }

    /// Pay out a position's accrued reward without touching its principal.
    ///
    /// Resets the accrual window: banked reward drops to zero and
    /// `started_at` advances to `now`, so future accrual restarts cleanly and
    /// no elapsed second is counted twice. The reward transfer is requested
    /// and `RewardPaid` emitted even when the computed reward is zero —
    /// preserved reference behavior.
    pub fn claim_reward(
        &mut self,
        user: &AccountId,
        index: usize,
        now: Timestamp,
    ) -> Result<RewardAmount, StakeError> {
        let book = self
            .books
            .get_mut(user)
            .ok_or_else(|| StakeError::InvalidIndex {
                user: user.clone(),
                index,
            })?;
        let position = book
            .get_mut(index)
            .ok_or_else(|| StakeError::InvalidIndex {
                user: user.clone(),
                index,
            })?;
        if !position.active {
            return Err(StakeError::InactiveStake(index));
        }

        let live = self.rates.accrued_between(position.started_at, now)?;
        let reward = position
            .banked_reward
            .checked_add(live)
            .ok_or(StakeError::ArithmeticOverflow)?;

        // Commit the window reset before the external call.
        position.banked_reward = RewardAmount::ZERO;
        position.started_at = now;

        self.token
            .transfer_out(user, AssetKind::Reward, reward.raw())
            .map_err(|e| {
                tracing::warn!(%user, index, %reward, error = %e, "reward transfer refused");
                StakeError::RewardTransferFailed(e)
            })?;

        tracing::debug!(%user, index, %reward, "reward claimed");
        self.events.emit(&StakeEvent::RewardPaid {
            user: user.clone(),
            amount: reward.raw(),
            index,
        });
        Ok(reward)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Point-in-time reward quote for one position: banked plus live accrual
    /// while the position is active, banked only once withdrawn. Read-only
    /// and repeatable.
    pub fn accrued(
        &self,
        user: &AccountId,
        index: usize,
        now: Timestamp,
    ) -> Result<RewardAmount, StakeError> {
        let position = self
            .books
            .get(user)
            .and_then(|book| book.get(index))
            .ok_or_else(|| StakeError::InvalidIndex {
                user: user.clone(),
                index,
            })?;
        if !position.active {
            return Ok(position.banked_reward);
        }
        let live = self.rates.accrued_between(position.started_at, now)?;
        position
            .banked_reward
            .checked_add(live)
            .ok_or(StakeError::ArithmeticOverflow)
    }

    /// Sum of principal over the user's active positions. Unknown users have
    /// an empty book, so this is zero for them.
    pub fn total_active_stake(&self, user: &AccountId) -> StakeAmount {
        self.books
            .get(user)
            .map(PositionBook::total_active_stake)
            .unwrap_or(StakeAmount::ZERO)
    }

    /// Sum of banked reward over ALL of the user's positions, withdrawn ones
    /// included. Banked component only — not a live quote.
    pub fn total_reward_banked(&self, user: &AccountId) -> RewardAmount {
        self.books
            .get(user)
            .map(PositionBook::total_reward_banked)
            .unwrap_or(RewardAmount::ZERO)
    }

    pub fn position(&self, user: &AccountId, index: usize) -> Option<&StakePosition> {
        self.books.get(user).and_then(|book| book.get(index))
    }

    pub fn position_count(&self, user: &AccountId) -> usize {
        self.books.get(user).map_or(0, PositionBook::len)
    }

    /// Global sum of active principal across all users.
    pub fn total_staked(&self) -> StakeAmount {
        self.total_staked
    }

    pub fn current_rate(&self) -> u128 {
        self.rates.current_rate()
    }

    pub fn rate_schedule(&self) -> &RateSchedule {
        &self.rates
    }

    // ── Admin plumbing (policy-gated by `AdminControl`) ─────────────────

    /// Apply a global rate change. O(1): appends one segment to the shared
    /// schedule; every active position's future accrual uses the new rate
    /// from `now` onward.
    pub fn set_rate(&mut self, new_rate: u128, now: Timestamp) -> Result<(), StakeError> {
        self.rates.set_rate(new_rate, now)?;
        tracing::debug!(new_rate, %now, "reward rate changed");
        Ok(())
    }

    /// Move `amount` of the reward asset out of the pool to `to`.
    ///
    /// No bound is enforced against outstanding unpaid reward liabilities —
    /// sweeping can starve future payouts. Intentional trust assumption on
    /// the admin.
    pub fn sweep_reward(&self, to: &AccountId, amount: RewardAmount) -> Result<(), StakeError> {
        self.token
            .transfer_out(to, AssetKind::Reward, amount.raw())
            .map_err(|e| {
                tracing::warn!(%to, %amount, error = %e, "reward sweep refused");
                StakeError::TransferFailed(e)
            })?;
        tracing::debug!(%to, %amount, "reward asset swept");
        Ok(())
    }

    /// Capture the full persistable state of the ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            books: self.books.clone(),
            rates: self.rates.clone(),
            total_staked: self.total_staked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_nullables::NullTokenLedger;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn user(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn ledger_with_rate(rate: u128) -> StakeLedger<NullTokenLedger> {
        StakeLedger::new(NullTokenLedger::new(), rate, ts(0))
    }

    #[test]
    fn deposit_creates_position_and_updates_total() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        let index = ledger
            .deposit(&alice, StakeAmount::new(100), ts(0))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(ledger.total_staked(), StakeAmount::new(100));
        assert_eq!(ledger.total_active_stake(&alice), StakeAmount::new(100));
        let position = ledger.position(&alice, 0).unwrap();
        assert!(position.active);
        assert_eq!(position.started_at, ts(0));
        assert_eq!(position.banked_reward, RewardAmount::ZERO);
    }

    #[test]
    fn zero_deposit_is_rejected_without_any_transfer() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        let result = ledger.deposit(&alice, StakeAmount::ZERO, ts(0));
        assert!(matches!(result, Err(StakeError::InvalidAmount)));
        assert_eq!(ledger.position_count(&alice), 0);
    }

    #[test]
    fn refused_deposit_leaves_ledger_untouched() {
        let token = NullTokenLedger::new();
        token.fail_next_in("insufficient balance");
        let mut ledger = StakeLedger::new(token, 1, ts(0));
        let alice = user("alice");

        let result = ledger.deposit(&alice, StakeAmount::new(100), ts(5));
        assert!(matches!(result, Err(StakeError::TransferFailed(_))));
        assert_eq!(ledger.total_staked(), StakeAmount::ZERO);
        assert_eq!(ledger.position_count(&alice), 0);
    }

    #[test]
    fn withdraw_pays_principal_and_accrued_reward() {
        let mut ledger = ledger_with_rate(2);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();

        let receipt = ledger.withdraw(&alice, 0, ts(10)).unwrap();
        assert_eq!(receipt.principal, StakeAmount::new(100));
        assert_eq!(receipt.reward, RewardAmount::new(20));
        assert_eq!(ledger.total_staked(), StakeAmount::ZERO);
        assert!(!ledger.position(&alice, 0).unwrap().active);
    }

    #[test]
    fn second_withdraw_of_same_index_fails() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();
        ledger.withdraw(&alice, 0, ts(10)).unwrap();

        let result = ledger.withdraw(&alice, 0, ts(20));
        assert!(matches!(result, Err(StakeError::AlreadyWithdrawn(0))));
        // total_staked changed exactly once.
        assert_eq!(ledger.total_staked(), StakeAmount::ZERO);
    }

    #[test]
    fn withdraw_of_unknown_index_fails() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        assert!(matches!(
            ledger.withdraw(&alice, 0, ts(0)),
            Err(StakeError::InvalidIndex { index: 0, .. })
        ));
        ledger.deposit(&alice, StakeAmount::new(10), ts(0)).unwrap();
        assert!(matches!(
            ledger.withdraw(&alice, 1, ts(0)),
            Err(StakeError::InvalidIndex { index: 1, .. })
        ));
    }

    #[test]
    fn claim_resets_the_accrual_window() {
        let mut ledger = ledger_with_rate(3);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();

        let paid = ledger.claim_reward(&alice, 0, ts(10)).unwrap();
        assert_eq!(paid, RewardAmount::new(30));

        // Immediately re-querying accrual yields zero.
        assert_eq!(ledger.accrued(&alice, 0, ts(10)).unwrap(), RewardAmount::ZERO);
        // Accrual resumes linearly from the claim time.
        assert_eq!(
            ledger.accrued(&alice, 0, ts(14)).unwrap(),
            RewardAmount::new(12)
        );
        let position = ledger.position(&alice, 0).unwrap();
        assert!(position.active);
        assert_eq!(position.started_at, ts(10));
    }

    #[test]
    fn claim_on_withdrawn_position_fails_with_inactive_stake() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();
        ledger.withdraw(&alice, 0, ts(5)).unwrap();
        assert!(matches!(
            ledger.claim_reward(&alice, 0, ts(10)),
            Err(StakeError::InactiveStake(0))
        ));
    }

    #[test]
    fn zero_reward_claim_still_requests_transfer_and_emits() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut ledger = ledger_with_rate(5);
        let alice = user("alice");
        let paid_events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&paid_events);
        ledger.subscribe(Box::new(move |event| {
            if matches!(event, StakeEvent::RewardPaid { .. }) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        ledger.deposit(&alice, StakeAmount::new(100), ts(7)).unwrap();
        // Claim at the same instant: zero elapsed time, zero reward.
        let paid = ledger.claim_reward(&alice, 0, ts(7)).unwrap();
        assert_eq!(paid, RewardAmount::ZERO);
        assert_eq!(paid_events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reward_transfer_failure_after_principal_is_surfaced_not_rolled_back() {
        let token = NullTokenLedger::new();
        token.plan_out(Ok(())); // principal goes through
        token.fail_next_out("reward pool empty"); // reward refused
        let mut ledger = StakeLedger::new(token, 1, ts(0));
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();

        let result = ledger.withdraw(&alice, 0, ts(10));
        assert!(matches!(result, Err(StakeError::RewardTransferFailed(_))));
        // Principal left the pool and the position is terminally inactive.
        assert!(!ledger.position(&alice, 0).unwrap().active);
        assert_eq!(ledger.total_staked(), StakeAmount::ZERO);
    }

    #[test]
    fn principal_transfer_failure_is_fatal_and_surfaced() {
        let token = NullTokenLedger::new();
        token.fail_next_out("pool frozen");
        let mut ledger = StakeLedger::new(token, 0, ts(0));
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();

        let result = ledger.withdraw(&alice, 0, ts(10));
        assert!(matches!(result, Err(StakeError::TransferFailed(_))));
        // The at-most-once flip already happened; the failure is fatal for
        // this position, not silently recoverable.
        assert!(!ledger.position(&alice, 0).unwrap().active);
    }

    #[test]
    fn rate_change_applies_to_future_accrual_only() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();

        ledger.set_rate(10, ts(10)).unwrap();

        // [0,10] at rate 1 + [10,15] at rate 10 = 10 + 50.
        assert_eq!(
            ledger.accrued(&alice, 0, ts(15)).unwrap(),
            RewardAmount::new(60)
        );
    }

    #[test]
    fn conservation_holds_across_interleaved_operations() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        let bob = user("bob");

        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();
        ledger.deposit(&bob, StakeAmount::new(50), ts(1)).unwrap();
        ledger.deposit(&alice, StakeAmount::new(25), ts(2)).unwrap();
        ledger.withdraw(&alice, 0, ts(3)).unwrap();
        ledger.claim_reward(&bob, 0, ts(4)).unwrap();

        let expected = ledger.total_active_stake(&alice) + ledger.total_active_stake(&bob);
        assert_eq!(ledger.total_staked(), expected);
        assert_eq!(ledger.total_staked(), StakeAmount::new(75));
    }

    #[test]
    fn operations_on_different_users_are_independent() {
        let mut ledger = ledger_with_rate(1);
        let alice = user("alice");
        let bob = user("bob");
        ledger.deposit(&alice, StakeAmount::new(100), ts(0)).unwrap();
        ledger.deposit(&bob, StakeAmount::new(100), ts(0)).unwrap();

        ledger.withdraw(&bob, 0, ts(10)).unwrap();
        // Alice's position and accrual are untouched.
        assert!(ledger.position(&alice, 0).unwrap().active);
        assert_eq!(
            ledger.accrued(&alice, 0, ts(10)).unwrap(),
            RewardAmount::new(10)
        );
    }

    #[test]
    fn accrued_quote_is_repeatable() {
        let mut ledger = ledger_with_rate(7);
        let alice = user("alice");
        ledger.deposit(&alice, StakeAmount::new(1), ts(100)).unwrap();
        let q1 = ledger.accrued(&alice, 0, ts(150)).unwrap();
        let q2 = ledger.accrued(&alice, 0, ts(150)).unwrap();
        assert_eq!(q1, RewardAmount::new(350));
        assert_eq!(q1, q2);
    }
}
