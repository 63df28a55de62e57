//! Plugin-based neighbor source registry
//!
//! Neighbor-listing collaborators are registered by name at startup, and the
//! configured one is instantiated from [`NeighborSourceConfig`] without the
//! core knowing any concrete implementation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_neighbor_core::registry::SourceRegistry;
//! use ddns_neighbor_core::config::NeighborSourceConfig;
//!
//! let registry = SourceRegistry::new();
//! ddns_neighbor_helper::register(&registry);
//!
//! let config = NeighborSourceConfig::helper("/usr/lib/ddns/dynamic_dns_lucihelper.sh");
//! let source = registry.create_source(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementations register themselves from their own crate:
//!
//! ```rust,ignore
//! pub fn register(registry: &SourceRegistry) {
//!     registry.register_source("helper", Box::new(HelperFactory));
//! }
//! ```

use crate::config::NeighborSourceConfig;
use crate::error::{Error, Result};
use crate::traits::{NeighborSource, NeighborSourceFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry of neighbor source factories
///
/// ## Thread Safety
///
/// Interior mutability through an RwLock: concurrent lookups, exclusive
/// registration. A poisoned lock is recovered, since the map is only ever
/// replaced one insert at a time.
#[derive(Default)]
pub struct SourceRegistry {
    sources: RwLock<HashMap<String, Box<dyn NeighborSourceFactory>>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a neighbor source factory
    ///
    /// # Parameters
    ///
    /// - `name`: Source type name (e.g., "helper")
    /// - `factory`: Factory object for creating source instances
    ///
    /// Registering a name twice replaces the earlier factory.
    pub fn register_source(&self, name: impl Into<String>, factory: Box<dyn NeighborSourceFactory>) {
        let name = name.into();
        let mut sources = self.sources.write().unwrap_or_else(PoisonError::into_inner);
        sources.insert(name, factory);
    }

    /// Create a neighbor source from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn NeighborSource>)`: Created source instance
    /// - `Err(Error)`: If the source type is not registered or creation fails
    pub fn create_source(&self, config: &NeighborSourceConfig) -> Result<Box<dyn NeighborSource>> {
        let source_type = config.type_name();
        let sources = self.sources.read().unwrap_or_else(PoisonError::into_inner);

        let factory = sources.get(source_type).ok_or_else(|| {
            Error::config(format!("Unknown neighbor source type: {}", source_type))
        })?;

        factory.create(config)
    }

    /// List all registered source types, sorted
    pub fn list_sources(&self) -> Vec<String> {
        let sources = self.sources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a source type is registered
    pub fn has_source(&self, name: &str) -> bool {
        let sources = self.sources.read().unwrap_or_else(PoisonError::into_inner);
        sources.contains_key(name)
    }
}
