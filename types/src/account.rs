//! Account identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque principal identity — a user of the staking ledger or the
/// configured admin.
///
/// The staking ledger never interprets the contents; it only compares
/// identities for equality and uses them as map keys. Whatever naming scheme
/// the surrounding deployment uses (addresses, UUIDs, usernames) fits here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips() {
        let id = AccountId::new("alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn equality_is_by_contents() {
        assert_eq!(AccountId::from("bob"), AccountId::new(String::from("bob")));
        assert_ne!(AccountId::from("bob"), AccountId::from("carol"));
    }
}
