//! Neighbor choice provider
//!
//! The ChoiceProvider is responsible for:
//! - Resolving which interface or network a section scans
//! - Serving cached results for that origin
//! - Calling the neighbor collector on a miss or forced refresh
//! - Normalizing, ranking and caching fresh results
//!
//! ## Flow
//!
//! ```text
//! form state ─┐
//!             ├─► resolve origin ──► none? ──► guidance message
//! persisted ──┘         │
//!                       ▼
//!             lock origin key ──► force? invalidate
//!                       │
//!                       ▼
//!             cache hit? ──yes──► cached devices
//!                       │no
//!                       ▼
//!             NeighborSource ──err──► failure message (not cached)
//!                       │ok
//!                       ▼
//!             normalize ─► rank ─► cache ─► devices
//! ```

pub mod selection;

pub use selection::{
    OPTION_EVENT_INTERFACE, OPTION_IP_DEVICE, apply_selection, find_choice, related_assignments,
    sync_related_options,
};

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::NeighborCache;
use crate::config::Messages;
use crate::normalize::{NeighborNormalizer, NormalizedDevice};
use crate::origin::{Origin, resolve_origin};
use crate::traits::{NeighborSource, SectionValues};

/// Options for one fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Drop the cached entry for the origin before looking it up
    pub force: bool,
}

impl FetchOptions {
    /// Options for a forced rescan
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// What a fetch hands back to the caller
///
/// Failures never surface as `Err`: they are reported through `error` and
/// `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOutcome {
    /// Ranked devices; empty on guidance or failure
    pub choices: Vec<NormalizedDevice>,
    /// The origin that was scanned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Origin>,
    /// User-facing guidance or failure text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    /// Served without calling the collector
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
}

impl ChoiceOutcome {
    fn guidance(message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::default()
        }
    }

    fn failure(message: String) -> Self {
        Self {
            message: Some(message),
            error: true,
            ..Self::default()
        }
    }

    fn found(choices: Vec<NormalizedDevice>, source: Origin, from_cache: bool) -> Self {
        Self {
            choices,
            source: Some(source),
            from_cache,
            ..Self::default()
        }
    }

    /// One-line scan status
    pub fn status_line(&self, messages: &Messages) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        if self.choices.is_empty() {
            return messages.no_neighbors.clone();
        }
        messages.found_devices(self.choices.len())
    }
}

/// Serves neighbor device choices for DDNS sections
///
/// Owns the neighbor cache. Construct one per view or session, call
/// [`ChoiceProvider::reset`] whenever the view is rendered afresh, and drop it
/// with the view.
///
/// ## Concurrency
///
/// All methods take `&self`. Fetches for the same origin are serialized by a
/// per-origin lock held from the forced invalidation through the cache write,
/// so concurrent non-forced fetches call the collector at most once. Fetches
/// for different origins run independently.
pub struct ChoiceProvider {
    /// Neighbor-listing collaborator
    source: Box<dyn NeighborSource>,

    /// Persisted configuration, consulted when the form has no value
    persisted: Box<dyn SectionValues>,

    normalizer: NeighborNormalizer,

    cache: RwLock<NeighborCache>,

    /// One lock per cache key
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChoiceProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `source`: Neighbor-listing collaborator
    /// - `persisted`: Persisted section configuration
    /// - `messages`: User-facing strings for labels and outcomes
    pub fn new(
        source: Box<dyn NeighborSource>,
        persisted: Box<dyn SectionValues>,
        messages: Messages,
    ) -> Self {
        Self {
            source,
            persisted,
            normalizer: NeighborNormalizer::new(messages),
            cache: RwLock::new(NeighborCache::new()),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// User-facing strings in use
    pub fn messages(&self) -> &Messages {
        self.normalizer.messages()
    }

    /// Fetch device choices for `section_id`
    ///
    /// # Parameters
    ///
    /// - `section_id`: DDNS section being edited
    /// - `form`: Unsaved form state, if an editor is open
    /// - `options`: Fetch options
    pub async fn fetch_choices(
        &self,
        section_id: &str,
        form: Option<&dyn SectionValues>,
        options: FetchOptions,
    ) -> ChoiceOutcome {
        let Some(origin) = resolve_origin(section_id, form, self.persisted.as_ref()) else {
            debug!("Section {} has no interface or network, not scanning", section_id);
            return ChoiceOutcome::guidance(self.messages().select_interface.clone());
        };

        self.fetch_for_origin(origin, options).await
    }

    /// Fetch device choices for an already resolved origin
    pub async fn fetch_for_origin(&self, origin: Origin, options: FetchOptions) -> ChoiceOutcome {
        let key = origin.cache_key();
        let key_lock = self.key_lock(&key).await;
        let _guard = key_lock.lock().await;

        if options.force && self.cache.write().await.invalidate(&key) {
            debug!("Forced rescan, dropped cached {}", key);
        }

        if let Some(entry) = self.cache.read().await.get(&key) {
            debug!(
                "Cache hit for {} ({} device(s), {}s old)",
                key,
                entry.devices.len(),
                entry.age().num_seconds()
            );
            return ChoiceOutcome::found(entry.devices.clone(), origin, true);
        }

        debug!("Cache miss for {}, querying {}", key, self.source.source_name());

        match self.source.list_neighbors(&origin).await {
            Ok(payload) => {
                let devices = self.normalizer.normalize_ranked(&payload, Some(&origin));
                info!("Found {} neighbor device(s) via {}", devices.len(), origin.via());
                self.cache.write().await.put(key, devices.clone());
                ChoiceOutcome::found(devices, origin, false)
            }
            Err(e) => {
                warn!(
                    "Neighbor query via {} failed ({}): {}",
                    origin.via(),
                    self.source.source_name(),
                    e
                );
                ChoiceOutcome::failure(self.messages().query_failed.clone())
            }
        }
    }

    /// Drop the cached entry for `origin`; returns whether one existed
    pub async fn invalidate(&self, origin: &Origin) -> bool {
        let key = origin.cache_key();
        let key_lock = self.key_lock(&key).await;
        let _guard = key_lock.lock().await;
        self.cache.write().await.invalidate(&key)
    }

    /// Drop every cached entry
    ///
    /// Call when the owning view is rendered afresh.
    pub async fn reset(&self) {
        let mut cache = self.cache.write().await;
        if !cache.is_empty() {
            debug!("Clearing {} cached origin(s)", cache.len());
        }
        cache.clear();
    }

    /// Number of origins currently cached
    pub async fn cached_origins(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        locks.entry(key.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization_skips_defaults() {
        let outcome = ChoiceOutcome::guidance("pick one".to_string());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"choices": [], "message": "pick one"})
        );

        let outcome = ChoiceOutcome::found(Vec::new(), Origin::network("lan"), true);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"choices": [], "source": {"network": "lan"}, "fromCache": true})
        );

        let outcome = ChoiceOutcome::failure("nope".to_string());
        assert_eq!(serde_json::to_value(&outcome).unwrap()["error"], true);
    }

    #[test]
    fn test_status_line() {
        let messages = Messages::default();

        let empty = ChoiceOutcome::found(Vec::new(), Origin::interface("br-lan"), false);
        assert_eq!(empty.status_line(&messages), messages.no_neighbors);

        let failed = ChoiceOutcome::failure(messages.query_failed.clone());
        assert_eq!(failed.status_line(&messages), messages.query_failed);

        let payload = crate::payload::NeighborPayload::new(
            vec![
                crate::payload::RawNeighbor::new("aa:00:00:00:00:01"),
                crate::payload::RawNeighbor::new("aa:00:00:00:00:02"),
            ],
            vec![],
        );
        let devices = NeighborNormalizer::default().normalize(&payload, None);
        let found = ChoiceOutcome::found(devices, Origin::interface("br-lan"), false);
        assert_eq!(found.status_line(&messages), "Found 2 device(s)");
    }
}
