//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify behavioral
//! constraints without running a real collector.

#![allow(dead_code)]

use ddns_neighbor_core::error::{Error, Result};
use ddns_neighbor_core::traits::NeighborSource;
use ddns_neighbor_core::{NeighborPayload, Origin, RawNeighbor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A NeighborSource that counts calls and returns a canned answer
pub struct CountingNeighborSource {
    /// Call counter for list_neighbors()
    call_count: Arc<AtomicUsize>,
    /// Origins list_neighbors() was called with, in order
    origins: Arc<Mutex<Vec<Origin>>>,
    /// Payload to return, or `None` to fail
    payload: Option<NeighborPayload>,
    /// Simulated collector run time
    delay: Option<Duration>,
}

impl CountingNeighborSource {
    /// Source answering every call with `payload`
    pub fn new(payload: NeighborPayload) -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            origins: Arc::new(Mutex::new(Vec::new())),
            payload: Some(payload),
            delay: None,
        }
    }

    /// Source failing every call
    pub fn failing() -> Self {
        Self {
            payload: None,
            ..Self::new(NeighborPayload::default())
        }
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times list_neighbors() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the origins list_neighbors() was called with
    pub fn origins(&self) -> Vec<Origin> {
        self.origins.lock().unwrap().clone()
    }

    /// Create a new source that shares counters with an existing one but
    /// answers with `payload` (`None` to fail)
    pub fn sharing_counters_with(other: &Self, payload: Option<NeighborPayload>) -> Self {
        Self {
            call_count: Arc::clone(&other.call_count),
            origins: Arc::clone(&other.origins),
            payload,
            delay: other.delay,
        }
    }
}

#[async_trait::async_trait]
impl NeighborSource for CountingNeighborSource {
    async fn list_neighbors(&self, origin: &Origin) -> Result<NeighborPayload> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.origins.lock().unwrap().push(origin.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.payload
            .clone()
            .ok_or_else(|| Error::collector("helper exited with status 1"))
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// A NeighborSource that hands out the same counters to a test handle
///
/// The provider takes ownership of its source, so tests keep a twin that
/// shares the counters.
pub fn counting_pair(
    payload: Option<NeighborPayload>,
) -> (Box<dyn NeighborSource>, CountingNeighborSource) {
    let handle = match payload.clone() {
        Some(payload) => CountingNeighborSource::new(payload),
        None => CountingNeighborSource::failing(),
    };
    let source = CountingNeighborSource::sharing_counters_with(&handle, payload);
    (Box::new(source), handle)
}

/// Like [`counting_pair`], with a simulated collector run time
pub fn slow_counting_pair(
    payload: NeighborPayload,
    delay: Duration,
) -> (Box<dyn NeighborSource>, CountingNeighborSource) {
    let handle = CountingNeighborSource::new(payload.clone()).with_delay(delay);
    let source = CountingNeighborSource::sharing_counters_with(&handle, Some(payload));
    (Box::new(source), handle)
}

/// Helper to create a small payload: one PD-matching device, one ULA-only
/// device, and the delegated prefix
pub fn minimal_payload() -> NeighborPayload {
    NeighborPayload::new(
        vec![
            RawNeighbor::new("AA:BB:CC:11:22:33")
                .with_hostname("nas")
                .with_addresses(["fe80::1", "fc00::5", "2001:db8:1234::42"]),
            RawNeighbor::new("aa:bb:cc:11:22:44")
                .with_hostname("Apple-TV")
                .with_addresses(["fd00::44"]),
        ],
        vec!["2001:db8:1234::/64".to_string()],
    )
}
