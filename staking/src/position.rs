//! Stake positions and the per-user position book.

use serde::{Deserialize, Serialize};
use vela_types::{RewardAmount, StakeAmount, Timestamp};

/// One deposit event for one user.
///
/// Lifecycle: created by `deposit`, self-transitions on `claim_reward`
/// (reward settled, accrual window reset), terminally deactivated by
/// `withdraw`. Never deleted — callers address positions by index, and those
/// indices stay valid for the life of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    /// Staked principal. Greater than zero at creation, never mutated.
    pub amount: StakeAmount,
    /// Start of the current (unclaimed) accrual window. Advanced to `now` by
    /// each claim so no second of elapsed time is ever counted twice.
    pub started_at: Timestamp,
    /// Reward settled into this position but not yet paid out. Zeroed by the
    /// payout that settles it.
    pub banked_reward: RewardAmount,
    /// False once withdrawn. Terminal: an inactive position never mutates
    /// again.
    pub active: bool,
}

impl StakePosition {
    pub fn new(amount: StakeAmount, now: Timestamp) -> Self {
        Self {
            amount,
            started_at: now,
            banked_reward: RewardAmount::ZERO,
            active: true,
        }
    }
}

/// The ordered sequence of positions belonging to one user.
///
/// Append-only arena: positions are pushed, never removed, so the integer
/// index handed back by [`PositionBook::push`] is a stable handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionBook {
    positions: Vec<StakePosition>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    /// Append a position, returning its stable index.
    pub fn push(&mut self, position: StakePosition) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&StakePosition> {
        self.positions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut StakePosition> {
        self.positions.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StakePosition> {
        self.positions.iter()
    }

    /// Sum of principal over active positions only.
    pub fn total_active_stake(&self) -> StakeAmount {
        self.positions
            .iter()
            .filter(|p| p.active)
            .fold(StakeAmount::ZERO, |acc, p| {
                // Bounded by total_staked, which is checked on every deposit.
                acc + p.amount
            })
    }

    /// Sum of banked reward over all positions, active and withdrawn.
    /// A banked-component snapshot, not a live quote.
    pub fn total_reward_banked(&self) -> RewardAmount {
        self.positions
            .iter()
            .fold(RewardAmount::ZERO, |acc, p| acc + p.banked_reward)
    }
}
