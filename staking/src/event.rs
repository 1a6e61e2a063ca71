//! Notifications emitted by the staking ledger for observers and indexers.

use vela_types::AccountId;

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StakeEvent {
    /// A deposit was confirmed and a new position created.
    Staked {
        user: AccountId,
        amount: u128,
        index: usize,
    },
    /// A position was withdrawn and its principal returned.
    Withdrawn {
        user: AccountId,
        amount: u128,
        index: usize,
    },
    /// A reward payout was requested for a position. Emitted by claims even
    /// when the computed reward is zero (preserved reference behavior).
    RewardPaid {
        user: AccountId,
        amount: u128,
        index: usize,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting call; keep handlers fast to
/// avoid stalling ledger operations.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&StakeEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakeEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &StakeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
