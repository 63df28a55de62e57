// # Neighbor Payload
//
// Shape check for what the neighbor-listing collaborator returns:
//
// ```json
// {
//   "devices": [
//     { "mac": "AA:BB:CC:11:22:33", "hostname": "nas",
//       "addresses": ["fe80::1", "2001:db8:1234::42"] }
//   ],
//   "prefixes": ["2001:db8:1234::/64"]
// }
// ```
//
// Fields of the wrong type are coerced to "absent" here, so the pipeline
// behind this boundary only sees well-typed records. A JSON `null` means the
// collaborator had nothing to say and is an error; any other non-object is an
// empty payload.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// One neighbor as reported by the collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNeighbor {
    /// Hardware address; records without one are discarded by the normalizer
    pub mac: Option<String>,
    /// Display name, if the collaborator knows one
    pub hostname: Option<String>,
    /// Observed addresses, in reported order, duplicates included
    pub addresses: Vec<String>,
}

impl RawNeighbor {
    /// Create a neighbor record with a MAC and no addresses
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: Some(mac.into()),
            ..Self::default()
        }
    }

    /// Set the hostname
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Append observed addresses
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses.extend(addresses.into_iter().map(Into::into));
        self
    }

    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let addresses = match object.get("addresses") {
            Some(Value::Array(items)) => items.iter().filter_map(non_empty_str).collect(),
            _ => Vec::new(),
        };

        Self {
            mac: object.get("mac").and_then(non_empty_str),
            hostname: object.get("hostname").and_then(non_empty_str),
            addresses,
        }
    }
}

/// Everything one collaborator call reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct NeighborPayload {
    pub devices: Vec<RawNeighbor>,
    /// Delegated prefixes as `address/length` strings
    pub prefixes: Vec<String>,
}

impl NeighborPayload {
    /// Create a payload from already-shaped records
    pub fn new(devices: Vec<RawNeighbor>, prefixes: Vec<String>) -> Self {
        Self { devices, prefixes }
    }

    /// Parse collaborator output text
    pub fn parse_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::payload("empty output"));
        }
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for NeighborPayload {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Err(Error::payload("collector returned null")),
            other => {
                warn!("Ignoring non-object neighbor payload: {}", other);
                return Ok(Self::default());
            }
        };

        let devices = match object.get("devices") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(device) => Some(RawNeighbor::from_object(device)),
                    other => {
                        debug!("Skipping malformed neighbor entry: {}", other);
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let prefixes = match object.get("prefixes") {
            Some(Value::Array(items)) => items.iter().filter_map(non_empty_str).collect(),
            _ => Vec::new(),
        };

        Ok(Self { devices, prefixes })
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
