// # Prefix Index
//
// Turns delegated prefixes as reported by the router (`2001:db8:1234::/64`)
// into the lower-cased, group-truncated strings that address matching uses.
//
// ## Matching Model
//
// Matching is a textual prefix test, not CIDR containment. A /64 keeps the
// first four colon-separated groups, a /60 also keeps four (16-bit groups,
// rounded up), so a boundary falling inside a group is not distinguished.

use serde::Serialize;
use tracing::debug;

/// Length assumed when a prefix has no usable length
pub const DEFAULT_PREFIX_LENGTH: u32 = 64;

/// Bits per colon-separated IPv6 group
const GROUP_BITS: u32 = 16;

/// A delegated prefix in matchable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefix {
    /// Original string as supplied
    pub raw: String,
    /// Lower-cased address truncated to the groups covered by `length`
    pub normalized: String,
    /// Prefix length in bits
    pub length: u32,
}

impl Prefix {
    /// Parse one `address/length` string
    ///
    /// Returns `None` for empty input or an empty address part.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.split('/');
        let address = parts.next().unwrap_or_default().to_lowercase();
        if address.is_empty() {
            return None;
        }
        let length = parts
            .next()
            .and_then(parse_length)
            .unwrap_or(DEFAULT_PREFIX_LENGTH);

        let groups: Vec<&str> = address.split(':').collect();
        let keep = (length.div_ceil(GROUP_BITS) as usize).min(groups.len());
        let normalized = groups[..keep].join(":");

        Some(Self {
            raw: raw.to_string(),
            normalized,
            length,
        })
    }

    /// Whether `address` (already lower-cased) starts with this prefix
    pub fn matches(&self, lower_address: &str) -> bool {
        lower_address.starts_with(&self.normalized)
    }
}

/// Leading decimal digits of `text`; non-positive or missing yields `None`
fn parse_length(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let digits_end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    text[..digits_end].parse::<u32>().ok().filter(|len| *len > 0)
}

/// Parse a list of raw prefix strings, skipping unusable entries
pub fn parse_prefixes<S: AsRef<str>>(raw: &[S]) -> Vec<Prefix> {
    raw.iter()
        .filter_map(|p| {
            let parsed = Prefix::parse(p.as_ref());
            match &parsed {
                Some(prefix) => debug!(
                    "Prefix {} -> normalized {} (/{})",
                    prefix.raw, prefix.normalized, prefix.length
                ),
                None => debug!("Skipping unusable prefix entry {:?}", p.as_ref()),
            }
            parsed
        })
        .collect()
}
