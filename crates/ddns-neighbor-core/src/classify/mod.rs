//! Address classification
//!
//! Sorts a neighbor's IPv6 addresses into scopes and usefulness tiers:
//!
//! | Scope        | Condition                         | Priority            |
//! |--------------|-----------------------------------|---------------------|
//! | `invalid`    | empty string                      | `Excluded`          |
//! | `link-local` | starts with `fe80:`               | `Excluded`          |
//! | `ula`        | `fc…` / `fd…`                     | `UniqueLocal`       |
//! | `gua`        | anything else, inside a PD prefix | `DelegatedGlobal`   |
//! | `gua`        | anything else                     | `Global`            |
//!
//! The checks work on the lower-cased text, not on parsed addresses, so
//! classification is total over every string a collector can report.

pub mod prefix;

pub use prefix::{DEFAULT_PREFIX_LENGTH, Prefix, parse_prefixes};

use serde::{Serialize, Serializer};

/// Address scope as seen by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressScope {
    /// `fe80::/10`; never usable as an update source
    LinkLocal,
    /// Unique local (`fc00::/7`)
    Ula,
    /// Global unicast
    Gua,
    /// Empty or otherwise unusable
    Invalid,
}

/// Preference tier of an address; lower sorts first
///
/// Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressPriority {
    /// Global address inside one of our delegated prefixes
    DelegatedGlobal,
    /// Any other global address
    Global,
    /// Unique local address
    UniqueLocal,
    /// Dropped before ranking
    Excluded,
}

impl AddressPriority {
    /// Numeric rank as reported to callers
    pub fn rank(self) -> u8 {
        match self {
            AddressPriority::DelegatedGlobal => 1,
            AddressPriority::Global => 2,
            AddressPriority::UniqueLocal => 3,
            AddressPriority::Excluded => 99,
        }
    }
}

impl Serialize for AddressPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.rank())
    }
}

/// Result of classifying one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub scope: AddressScope,
    pub priority: AddressPriority,
    /// Only ever true for `gua`
    pub matches_pd: bool,
}

impl Classification {
    const fn excluded(scope: AddressScope) -> Self {
        Self {
            scope,
            priority: AddressPriority::Excluded,
            matches_pd: false,
        }
    }

    /// Whether the address survives into a device's address list
    pub fn is_usable(&self) -> bool {
        !matches!(self.scope, AddressScope::LinkLocal | AddressScope::Invalid)
    }
}

/// Classify one address against the known delegated prefixes
pub fn classify(address: &str, prefixes: &[Prefix]) -> Classification {
    if address.is_empty() {
        return Classification::excluded(AddressScope::Invalid);
    }

    let lower = address.to_lowercase();

    if lower.starts_with("fe80:") {
        return Classification::excluded(AddressScope::LinkLocal);
    }

    let mut chars = lower.chars();
    if chars.next() == Some('f') && matches!(chars.next(), Some('c' | 'd')) {
        return Classification {
            scope: AddressScope::Ula,
            priority: AddressPriority::UniqueLocal,
            matches_pd: false,
        };
    }

    let matched = matches_lower(&lower, prefixes);
    Classification {
        scope: AddressScope::Gua,
        priority: if matched {
            AddressPriority::DelegatedGlobal
        } else {
            AddressPriority::Global
        },
        matches_pd: matched,
    }
}

/// Whether `address` starts with the normalized form of any prefix
pub fn matches_prefix(address: &str, prefixes: &[Prefix]) -> bool {
    if address.is_empty() {
        return false;
    }
    matches_lower(&address.to_lowercase(), prefixes)
}

fn matches_lower(lower: &str, prefixes: &[Prefix]) -> bool {
    prefixes.iter().any(|prefix| prefix.matches(lower))
}
