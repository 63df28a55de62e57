//! Neighbor normalization
//!
//! Folds raw neighbor records into one [`NormalizedDevice`] per MAC address:
//!
//! ```text
//! NeighborPayload ──► parse prefixes ──► per record: find-or-create device by MAC
//!                                              │
//!                                              ▼
//!                          classify addresses, drop link-local/invalid,
//!                          merge unseen ones, stable sort by priority
//!                                              │
//!                                              ▼
//!                          label, best address ──► rank
//! ```
//!
//! A MAC may appear in several records (one per collector pass folded into
//! the payload); its addresses accumulate without duplicates and its hostname
//! is the first one any record provides.

pub mod label;
pub mod rank;

pub use label::format_label;
pub use rank::{compare_names, rank_devices};

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::classify::{self, AddressPriority, AddressScope, Classification, Prefix};
use crate::config::Messages;
use crate::origin::Origin;
use crate::payload::NeighborPayload;

/// One surviving address of a device, with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressInfo {
    pub address: String,
    #[serde(rename = "type")]
    pub scope: AddressScope,
    pub priority: AddressPriority,
    #[serde(rename = "matchesPD")]
    pub matches_pd: bool,
}

impl AddressInfo {
    fn new(address: &str, classification: Classification) -> Self {
        Self {
            address: address.to_string(),
            scope: classification.scope,
            priority: classification.priority,
            matches_pd: classification.matches_pd,
        }
    }
}

/// A neighbor device as offered to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDevice {
    /// Lower-cased hardware address
    pub mac: String,
    pub hostname: Option<String>,
    /// `br-lan` or `@lan`
    pub via: Option<String>,
    /// Usable addresses, best first, no duplicates
    pub addresses: Vec<String>,
    /// Classification of each entry of `addresses`
    pub address_info: Vec<AddressInfo>,
    #[serde(rename = "hasPDMatch")]
    pub has_pd_match: bool,
    pub best_address: Option<String>,
    #[serde(rename = "bestAddressMatchesPD")]
    pub best_address_matches_pd: bool,
    pub label: String,
}

impl NormalizedDevice {
    fn new(mac: String, via: Option<String>) -> Self {
        Self {
            mac,
            hostname: None,
            via,
            addresses: Vec::new(),
            address_info: Vec::new(),
            has_pd_match: false,
            best_address: None,
            best_address_matches_pd: false,
            label: String::new(),
        }
    }

    /// Classify `addresses` and merge the usable ones not already present
    ///
    /// The merged list is re-sorted by priority; the sort is stable, so
    /// addresses of equal priority keep first-seen order.
    fn absorb_addresses(&mut self, addresses: &[String], prefixes: &[Prefix]) {
        for address in addresses {
            let classification = classify::classify(address, prefixes);
            if !classification.is_usable() {
                debug!(
                    "Dropping {:?} address {} of {}",
                    classification.scope, address, self.mac
                );
                continue;
            }
            if classification.matches_pd {
                self.has_pd_match = true;
            }
            if !self.addresses.iter().any(|known| known == address) {
                self.addresses.push(address.clone());
                self.address_info.push(AddressInfo::new(address, classification));
            }
        }

        self.address_info.sort_by_key(|info| info.priority);
        self.addresses = self
            .address_info
            .iter()
            .map(|info| info.address.clone())
            .collect();
    }

    /// Compute the derived fields once all records are folded in
    fn finish(&mut self, messages: &Messages) {
        self.best_address = self.addresses.first().cloned();
        self.best_address_matches_pd = self
            .address_info
            .first()
            .map(|info| info.matches_pd)
            .unwrap_or(false);
        self.label = format_label(self, messages);
    }

    /// Upper-case MAC for display
    pub fn display_mac(&self) -> String {
        self.mac.to_uppercase()
    }

    /// Hostname, or the display MAC when there is none
    pub fn display_name(&self) -> String {
        self.hostname.clone().unwrap_or_else(|| self.display_mac())
    }

    /// Whether the best address is reachable through a delegated prefix
    ///
    /// `None` when the device has no usable address.
    pub fn pd_hint<'m>(&self, messages: &'m Messages) -> Option<&'m str> {
        self.best_address.as_ref()?;
        Some(if self.best_address_matches_pd {
            messages.pd_match.as_str()
        } else {
            messages.pd_mismatch.as_str()
        })
    }
}

/// Turns collector payloads into normalized devices
#[derive(Debug, Clone, Default)]
pub struct NeighborNormalizer {
    messages: Messages,
}

impl NeighborNormalizer {
    /// Create a normalizer producing labels with `messages`
    pub fn new(messages: Messages) -> Self {
        Self { messages }
    }

    /// Strings used for labels
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Fold `payload` into one device per MAC, in first-seen order
    ///
    /// The result is unranked; see [`rank_devices`].
    pub fn normalize(
        &self,
        payload: &NeighborPayload,
        origin: Option<&Origin>,
    ) -> Vec<NormalizedDevice> {
        let via = origin.map(Origin::via);
        let prefixes = classify::parse_prefixes(&payload.prefixes);

        let mut devices: Vec<NormalizedDevice> = Vec::new();
        let mut by_mac: HashMap<String, usize> = HashMap::new();

        for raw in &payload.devices {
            let Some(mac) = raw.mac.as_deref().filter(|m| !m.is_empty()) else {
                debug!("Skipping neighbor record without MAC");
                continue;
            };
            let mac = mac.to_lowercase();

            let index = match by_mac.get(&mac) {
                Some(&index) => index,
                None => {
                    devices.push(NormalizedDevice::new(mac.clone(), via.clone()));
                    by_mac.insert(mac, devices.len() - 1);
                    devices.len() - 1
                }
            };

            let device = &mut devices[index];
            if device.hostname.is_none() {
                device.hostname = raw.hostname.clone().filter(|h| !h.is_empty());
            }
            device.absorb_addresses(&raw.addresses, &prefixes);
        }

        for device in &mut devices {
            device.finish(&self.messages);
        }

        debug!(
            "Normalized {} record(s) into {} device(s) with {} prefix(es)",
            payload.devices.len(),
            devices.len(),
            prefixes.len()
        );

        devices
    }

    /// Normalize and rank in one step
    pub fn normalize_ranked(
        &self,
        payload: &NeighborPayload,
        origin: Option<&Origin>,
    ) -> Vec<NormalizedDevice> {
        rank_devices(self.normalize(payload, origin))
    }
}
