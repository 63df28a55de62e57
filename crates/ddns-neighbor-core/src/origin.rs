//! Query origin
//!
//! An [`Origin`] is the interface or network a neighbor scan runs against.
//! It is also the cache partition: one cache entry per origin.
//!
//! ## Resolution
//!
//! Two options of a DDNS section decide the origin:
//!
//! 1. `ip_interface`: a device name (`br-lan`), or `@<network>` to name a
//!    logical network instead
//! 2. `ip_network`: a logical network name, used when no interface is set
//!
//! Each option is read from the form state first and from the persisted
//! configuration when the form has no value for it. Values are trimmed;
//! blank counts as unset.

use serde::Serialize;
use std::fmt;

use crate::traits::SectionValues;

/// Option holding the interface (or `@network`) to scan
pub const OPTION_IP_INTERFACE: &str = "ip_interface";

/// Option holding the logical network to scan
pub const OPTION_IP_NETWORK: &str = "ip_network";

/// Where a neighbor scan is issued
///
/// Serializes as `{"interface": "<name>"}` or `{"network": "<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A network device, e.g. `br-lan`
    Interface(String),
    /// A logical network, e.g. `lan`
    Network(String),
}

impl Origin {
    /// Create an interface origin
    pub fn interface(name: impl Into<String>) -> Self {
        Origin::Interface(name.into())
    }

    /// Create a network origin
    pub fn network(name: impl Into<String>) -> Self {
        Origin::Network(name.into())
    }

    /// Interface or network name
    pub fn name(&self) -> &str {
        match self {
            Origin::Interface(name) | Origin::Network(name) => name,
        }
    }

    /// Descriptor shown next to each device: `br-lan` or `@lan`
    pub fn via(&self) -> String {
        match self {
            Origin::Interface(name) => name.clone(),
            Origin::Network(name) => format!("@{}", name),
        }
    }

    /// Cache key: `interface:<name>` or `network:<name>`
    pub fn cache_key(&self) -> String {
        self.to_string()
    }

    /// Interpret an `ip_interface` value
    ///
    /// `@lan` selects the network `lan`; a lone `@` is taken as an
    /// interface name.
    pub fn from_interface_value(value: &str) -> Self {
        match value.strip_prefix('@') {
            Some(network) if !network.is_empty() => Origin::network(network),
            _ => Origin::interface(value),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Interface(name) => write!(f, "interface:{}", name),
            Origin::Network(name) => write!(f, "network:{}", name),
        }
    }
}

/// Resolve the origin of `section_id`
///
/// Returns `None` when neither option yields a non-blank value.
pub fn resolve_origin(
    section_id: &str,
    form: Option<&dyn SectionValues>,
    persisted: &dyn SectionValues,
) -> Option<Origin> {
    let lookup = |option: &str| -> Option<String> {
        form.and_then(|f| f.value(section_id, option))
            .or_else(|| persisted.value(section_id, option))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(interface) = lookup(OPTION_IP_INTERFACE) {
        return Some(Origin::from_interface_value(&interface));
    }

    lookup(OPTION_IP_NETWORK).map(Origin::Network)
}
