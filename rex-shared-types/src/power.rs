//! Assets and power kinds tracked by the ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::{Account, AssetPower};

/// The two governance assets whose balances produce power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// The liquid governance token.
    Rex,
    /// The staked governance token.
    StkRex,
}

impl Asset {
    pub const ALL: [Asset; 2] = [Asset::Rex, Asset::StkRex];

    /// Short tag used inside delegation record keys.
    pub fn tag(self) -> &'static str {
        match self {
            Asset::Rex => "rex",
            Asset::StkRex => "stkrex",
        }
    }

    /// Label stored on delegation records.
    pub fn label(self) -> &'static str {
        match self {
            Asset::Rex => "REX",
            Asset::StkRex => "STKREX",
        }
    }

    /// Whether delegations of this asset maintain the delegate's
    /// representative counters. Only the liquid token does.
    pub fn tracks_representatives(self) -> bool {
        matches!(self, Asset::Rex)
    }

    pub fn power(self, account: &Account) -> &AssetPower {
        match self {
            Asset::Rex => &account.rex,
            Asset::StkRex => &account.stk_rex,
        }
    }

    pub fn power_mut(self, account: &mut Account) -> &mut AssetPower {
        match self {
            Asset::Rex => &mut account.rex,
            Asset::StkRex => &mut account.stk_rex,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single kind of governance power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    Voting,
    Proposition,
}

impl PowerKind {
    /// Maps the on-chain `delegationType` enum (0 = voting, 1 = proposition).
    pub fn from_delegation_type(value: u8) -> Option<Self> {
        match value {
            0 => Some(PowerKind::Voting),
            1 => Some(PowerKind::Proposition),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerKind::Voting => "VOTING",
            PowerKind::Proposition => "PROPOSITION",
        }
    }
}

impl fmt::Display for PowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which power totals a retotal pass should recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerSelector {
    Voting,
    Proposition,
    Both,
}

impl PowerSelector {
    pub fn kinds(self) -> &'static [PowerKind] {
        match self {
            PowerSelector::Voting => &[PowerKind::Voting],
            PowerSelector::Proposition => &[PowerKind::Proposition],
            PowerSelector::Both => &[PowerKind::Voting, PowerKind::Proposition],
        }
    }

    /// Smallest selector covering both `self` and `other`.
    pub fn union(self, other: PowerSelector) -> PowerSelector {
        if self == other {
            self
        } else {
            PowerSelector::Both
        }
    }
}

impl From<PowerKind> for PowerSelector {
    fn from(kind: PowerKind) -> Self {
        match kind {
            PowerKind::Voting => PowerSelector::Voting,
            PowerKind::Proposition => PowerSelector::Proposition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_union() {
        assert_eq!(PowerSelector::Voting.union(PowerSelector::Voting), PowerSelector::Voting);
        assert_eq!(PowerSelector::Voting.union(PowerSelector::Proposition), PowerSelector::Both);
        assert_eq!(PowerSelector::Both.union(PowerSelector::Proposition), PowerSelector::Both);
    }

    #[test]
    fn test_delegation_type_mapping() {
        assert_eq!(PowerKind::from_delegation_type(0), Some(PowerKind::Voting));
        assert_eq!(PowerKind::from_delegation_type(1), Some(PowerKind::Proposition));
        assert_eq!(PowerKind::from_delegation_type(2), None);
    }

    #[test]
    fn test_only_rex_tracks_representatives() {
        assert!(Asset::Rex.tracks_representatives());
        assert!(!Asset::StkRex.tracks_representatives());
    }
}
