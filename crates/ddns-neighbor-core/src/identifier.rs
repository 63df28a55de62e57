//! Target device identifiers
//!
//! The `ip_device` option names the downstream device whose address is
//! published. It accepts a MAC address, a hostname, an IPv4 address, or a
//! DHCPv6 DUID; this module recognizes which one a value is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::normalize::NormalizedDevice;

/// `ip_source` value that makes `ip_device` mandatory
pub const DEVICE_SOURCE: &str = "device";

/// What kind of identifier a value is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Mac,
    Ipv4,
    Duid,
    Hostname,
}

/// Configured identifier type (`ip_device_type`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    /// Accept whatever the value looks like
    #[default]
    Auto,
    Mac,
    Hostname,
    Ipv4,
    Duid,
}

/// A recognized device identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentifier {
    value: String,
    kind: IdentifierKind,
}

impl DeviceIdentifier {
    /// Recognize `value` (trimmed)
    ///
    /// Checked in order: MAC, IPv4, DUID, hostname.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::invalid_input("Device identifier cannot be empty"));
        }

        let kind = if is_mac(value) {
            IdentifierKind::Mac
        } else if is_ipv4_shaped(value) {
            IdentifierKind::Ipv4
        } else if is_duid(value) {
            IdentifierKind::Duid
        } else if is_hostname(value) {
            IdentifierKind::Hostname
        } else {
            return Err(Error::invalid_input(format!(
                "Invalid format: '{}'. Accepted: MAC address, hostname, IPv4 address, or DUID.",
                value
            )));
        };

        Ok(Self {
            value: value.to_string(),
            kind,
        })
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Value as entered, trimmed
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether this identifier is acceptable for the configured type
    pub fn conforms_to(&self, expected: IdentifierType) -> bool {
        match expected {
            IdentifierType::Auto => true,
            IdentifierType::Mac => self.kind == IdentifierKind::Mac,
            IdentifierType::Hostname => self.kind == IdentifierKind::Hostname,
            IdentifierType::Ipv4 => self.kind == IdentifierKind::Ipv4,
            IdentifierType::Duid => self.kind == IdentifierKind::Duid,
        }
    }

    /// Whether this identifier names `device`
    ///
    /// MACs compare case-insensitively with `-` and `:` interchangeable;
    /// hostnames compare case-insensitively. IPv4 addresses and DUIDs are
    /// not carried by neighbor records and never match.
    pub fn matches(&self, device: &NormalizedDevice) -> bool {
        match self.kind {
            IdentifierKind::Mac => self.value.to_lowercase().replace('-', ":") == device.mac,
            IdentifierKind::Hostname => device
                .hostname
                .as_deref()
                .is_some_and(|h| h.eq_ignore_ascii_case(&self.value)),
            IdentifierKind::Ipv4 | IdentifierKind::Duid => false,
        }
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Validate an `ip_device` value for a section using `ip_source`
///
/// An empty value means "use the router's own address" and is accepted,
/// except for the `device` source, which needs a target.
pub fn validate_device_option(
    ip_source: Option<&str>,
    value: &str,
) -> Result<Option<DeviceIdentifier>> {
    let value = value.trim();
    if value.is_empty() {
        if ip_source == Some(DEVICE_SOURCE) {
            return Err(Error::invalid_input(
                "Please enter a device identifier for source \"device\".",
            ));
        }
        return Ok(None);
    }

    DeviceIdentifier::parse(value).map(Some)
}

/// Six hex octets separated by `:` or `-`
fn is_mac(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 17
        && bytes.iter().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                *b == b':' || *b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

/// Four dot-separated groups of one to three digits (no range check)
fn is_ipv4_shaped(value: &str) -> bool {
    let groups: Vec<&str> = value.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

/// DUID types 1 through 4
fn is_duid(value: &str) -> bool {
    ["00:01:", "00:02:", "00:03:", "00:04:"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// A letter followed by letters, digits, `-` or `.`
fn is_hostname(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
