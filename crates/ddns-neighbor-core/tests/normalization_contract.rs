//! Contract Test: Device Menu Shape
//!
//! This test verifies what the operator is offered after a scan.
//!
//! Constraints verified:
//! - One device per MAC, link-local and empty addresses never offered
//! - Addresses inside a delegated prefix come first, then GUA, then ULA
//! - PD-matching devices are listed before the rest
//! - Labels carry hostname, MAC, best address and origin

mod common;

use common::*;
use ddns_neighbor_core::{
    AddressPriority, ChoiceProvider, FetchOptions, Messages, MemorySectionStore, NeighborPayload,
};

async fn scan(payload: NeighborPayload) -> Vec<ddns_neighbor_core::NormalizedDevice> {
    let (source, _handle) = counting_pair(Some(payload));
    let mut persisted = MemorySectionStore::new();
    persisted.set("wan6", "ip_interface", "br-lan");
    let provider = ChoiceProvider::new(source, Box::new(persisted), Messages::default());

    let outcome = provider
        .fetch_choices("wan6", None, FetchOptions::default())
        .await;
    assert!(!outcome.error);
    outcome.choices
}

#[tokio::test]
async fn pd_matching_device_is_listed_first() {
    let devices = scan(minimal_payload()).await;

    // "Apple-TV" sorts before "nas" by name, but only nas matches the prefix
    let names: Vec<_> = devices.iter().map(|d| d.display_name()).collect();
    assert_eq!(names, vec!["nas", "Apple-TV"]);

    let nas = &devices[0];
    assert!(nas.has_pd_match);
    assert_eq!(nas.addresses, vec!["2001:db8:1234::42", "fc00::5"]);
    assert_eq!(nas.address_info[0].priority, AddressPriority::DelegatedGlobal);
    assert_eq!(
        nas.label,
        "nas • aa:bb:cc:11:22:33 • 2001:db8:1234::42 (+1 more) [via br-lan]"
    );

    let printer = &devices[1];
    assert!(!printer.has_pd_match);
    assert_eq!(printer.best_address.as_deref(), Some("fd00::44"));
    assert!(!printer.best_address_matches_pd);
}

#[tokio::test]
async fn collector_output_with_junk_is_tolerated() {
    let payload = NeighborPayload::parse_str(
        r#"{
            "devices": [
                {"mac": "AA:BB:CC:00:00:01", "hostname": 7, "addresses": ["", "FE80::1", "2001:DB8::1"]},
                {"hostname": "no-mac", "addresses": ["2001:db8::2"]},
                "garbage",
                {"mac": "aa:bb:cc:00:00:01", "addresses": "not-a-list"}
            ],
            "prefixes": ["", "/64", 12]
        }"#,
    )
    .unwrap();

    let devices = scan(payload).await;
    assert_eq!(devices.len(), 1);
    let device = &devices[0];
    assert_eq!(device.mac, "aa:bb:cc:00:00:01");
    assert_eq!(device.hostname, None);
    assert_eq!(device.addresses, vec!["2001:DB8::1"]);
    assert!(!device.has_pd_match);
    assert_eq!(device.label, "Unnamed device • aa:bb:cc:00:00:01 • 2001:DB8::1 [via br-lan]");
}

#[tokio::test]
async fn devices_without_addresses_are_still_offered() {
    let payload = NeighborPayload::parse_str(
        r#"{"devices": [{"mac": "aa:bb:cc:00:00:09", "hostname": "tv", "addresses": ["fe80::9"]}]}"#,
    )
    .unwrap();

    let devices = scan(payload).await;
    assert_eq!(devices.len(), 1);
    assert!(devices[0].addresses.is_empty());
    assert_eq!(devices[0].best_address, None);
    assert_eq!(devices[0].label, "tv • aa:bb:cc:00:00:09 [via br-lan]");
}
