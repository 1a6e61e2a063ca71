//! Reward accrual — pure computation over the global rate schedule.
//!
//! The reward rate is a global, versioned parameter: a rate change appends
//! one segment to a single shared schedule — O(1), no per-position iteration
//! and no per-position rate snapshots. Settlement reads the schedule and
//! integrates `rate × duration` over the segments a position's accrual window
//! intersects, so a change at `tm` affects elapsed time after `tm` only:
//! a window spanning `[t0, t1]` with a change at `tm` settles exactly
//! `(tm − t0)·r_old + (t1 − tm)·r_new`.
//!
//! The rate is flat per position, independent of the staked amount — a
//! deliberate economic design, not an omission.

use crate::error::StakeError;
use serde::{Deserialize, Serialize};
use vela_types::{RewardAmount, Timestamp};

/// A span of time during which one reward rate was in effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSegment {
    /// Reward raw units accrued per second per position.
    pub rate: u128,
    /// When this rate became effective.
    pub start: Timestamp,
    /// When this rate stopped being effective (`None` if still active).
    pub end: Option<Timestamp>,
}

/// Global append-only schedule of reward rates, shared by every position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub segments: Vec<RateSegment>,
}

impl RateSchedule {
    pub fn new(initial_rate: u128, genesis: Timestamp) -> Self {
        Self {
            segments: vec![RateSegment {
                rate: initial_rate,
                start: genesis,
                end: None,
            }],
        }
    }

    /// Apply a global rate change: close the current segment and append a new
    /// one. All positions' future accrual uses the new rate from `change_at`;
    /// time already elapsed keeps the old rate.
    pub fn set_rate(&mut self, new_rate: u128, change_at: Timestamp) -> Result<(), StakeError> {
        if let Some(current) = self.segments.last() {
            if change_at < current.start {
                return Err(StakeError::InvalidTimestamp);
            }
        }
        if let Some(current) = self.segments.last_mut() {
            current.end = Some(change_at);
        }
        self.segments.push(RateSegment {
            rate: new_rate,
            start: change_at,
            end: None,
        });
        Ok(())
    }

    /// The currently effective rate.
    pub fn current_rate(&self) -> u128 {
        self.segments.last().map(|s| s.rate).unwrap_or(0)
    }

    /// Reward accrued over the window `[start, now]`.
    ///
    /// Pure and repeatable: same inputs, same output. Integer arithmetic
    /// truncating to whole seconds; `now == start` (or `now < start`) yields
    /// zero. Overflow in the multiply or the running sum is an error, never a
    /// wrap.
    pub fn accrued_between(
        &self,
        start: Timestamp,
        now: Timestamp,
    ) -> Result<RewardAmount, StakeError> {
        let mut total = RewardAmount::ZERO;
        for seg in &self.segments {
            // Clamp the segment to the accrual window.
            let effective_start = seg.start.max(start);
            let effective_end = seg.end.map_or(now, |end| end.min(now));
            if effective_start >= effective_end {
                continue;
            }
            let duration = effective_start.elapsed_since(effective_end);
            let earned = seg
                .rate
                .checked_mul(duration as u128)
                .ok_or(StakeError::ArithmeticOverflow)?;
            total = total
                .checked_add(RewardAmount::new(earned))
                .ok_or(StakeError::ArithmeticOverflow)?;
        }
        Ok(total)
    }
}

impl Default for RateSchedule {
    fn default() -> Self {
        Self::new(0, Timestamp::EPOCH)
    }
}
