//! Bincode persistence of full ledger state.
//!
//! The logical layout matches the ledger exactly: per-user ordered position
//! books, the global rate schedule, and the conservation counter. The token
//! collaborator is not part of the snapshot — it is reattached on restore.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::accrual::RateSchedule;
use crate::error::StakeError;
use crate::position::PositionBook;
use vela_types::{AccountId, StakeAmount};

/// A point-in-time copy of everything the ledger persists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub books: HashMap<AccountId, PositionBook>,
    pub rates: RateSchedule,
    pub total_staked: StakeAmount,
}

impl LedgerSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, StakeError> {
        bincode::serialize(self).map_err(|e| StakeError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakeError> {
        bincode::deserialize(bytes).map_err(|e| StakeError::Serialization(e.to_string()))
    }
}
