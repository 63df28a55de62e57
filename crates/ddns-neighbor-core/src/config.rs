//! Configuration types for the neighbor engine
//!
//! This module defines the configuration structures used throughout the crate:
//! which collaborator lists neighbors, and every user-facing string the engine
//! produces.

use serde::{Deserialize, Serialize};

/// Main neighbor engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighborConfig {
    /// Neighbor-listing collaborator configuration
    #[serde(default)]
    pub source: NeighborSourceConfig,

    /// User-facing strings
    #[serde(default)]
    pub messages: Messages,
}

impl NeighborConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.messages.validate()?;
        Ok(())
    }
}

/// Neighbor-listing collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NeighborSourceConfig {
    /// The DDNS helper script (`list_neighbors` command)
    Helper {
        /// Program to execute
        #[serde(default = "default_helper_program")]
        program: String,
        /// Arguments placed before the origin arguments
        #[serde(default)]
        leading_args: Vec<String>,
        /// Upper bound on one invocation, in seconds
        #[serde(default = "default_helper_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom neighbor source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl NeighborSourceConfig {
    /// Create a helper configuration for the given program
    pub fn helper(program: impl Into<String>) -> Self {
        NeighborSourceConfig::Helper {
            program: program.into(),
            leading_args: Vec::new(),
            timeout_secs: default_helper_timeout_secs(),
        }
    }

    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            NeighborSourceConfig::Helper {
                program,
                timeout_secs,
                ..
            } => {
                if program.trim().is_empty() {
                    return Err(crate::Error::config("Helper program cannot be empty"));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Helper timeout must be > 0"));
                }
                Ok(())
            }
            NeighborSourceConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom neighbor source factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom neighbor source config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name used for registry lookups
    pub fn type_name(&self) -> &str {
        match self {
            NeighborSourceConfig::Helper { .. } => "helper",
            NeighborSourceConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for NeighborSourceConfig {
    fn default() -> Self {
        Self::helper(default_helper_program())
    }
}

/// User-facing strings
///
/// `{count}` and `{via}` are substituted literally; everything else is
/// emitted as-is, so a translated set can be dropped in through configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Label placeholder for devices without a hostname
    pub unnamed_device: String,
    /// Joins hostname, MAC and best address in a label
    pub label_separator: String,
    /// Suffix when a device has more than one address
    pub more_addresses: String,
    /// Suffix naming the origin a device was seen on
    pub via: String,
    /// Guidance when neither interface nor network is configured
    pub select_interface: String,
    /// Shown when the collaborator fails
    pub query_failed: String,
    /// Scan status for an empty result
    pub no_neighbors: String,
    /// Scan status for a non-empty result
    pub found_devices: String,
    /// Hint for a best address inside a delegated prefix
    pub pd_match: String,
    /// Hint for a best address outside every delegated prefix
    pub pd_mismatch: String,
}

impl Messages {
    /// Render the "(+N more)" suffix
    pub fn more_addresses(&self, count: usize) -> String {
        self.more_addresses.replace("{count}", &count.to_string())
    }

    /// Render the "[via X]" suffix
    pub fn via(&self, via: &str) -> String {
        self.via.replace("{via}", via)
    }

    /// Render the "Found N device(s)" status
    pub fn found_devices(&self, count: usize) -> String {
        self.found_devices.replace("{count}", &count.to_string())
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if self.label_separator.is_empty() {
            return Err(crate::Error::config("Label separator cannot be empty"));
        }
        Ok(())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            unnamed_device: "Unnamed device".to_string(),
            label_separator: " • ".to_string(),
            more_addresses: "(+{count} more)".to_string(),
            via: "[via {via}]".to_string(),
            select_interface: "Select an interface to scan for IPv6 neighbors.".to_string(),
            query_failed: "Failed to query IPv6 neighbors.".to_string(),
            no_neighbors: "No IPv6 neighbors detected. Try scanning again.".to_string(),
            found_devices: "Found {count} device(s)".to_string(),
            pd_match: "Matches network prefix - publicly accessible".to_string(),
            pd_mismatch: "Does not match network prefix - may not be publicly accessible"
                .to_string(),
        }
    }
}

fn default_helper_program() -> String {
    "/usr/lib/ddns/dynamic_dns_lucihelper.sh".to_string()
}

fn default_helper_timeout_secs() -> u64 {
    10
}
