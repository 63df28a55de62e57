//! Device ranking
//!
//! Devices with an address inside a delegated prefix come first; within each
//! group devices are ordered by hostname, or MAC when there is no hostname.

use std::cmp::Ordering;

use super::NormalizedDevice;

/// Sort devices for presentation
///
/// The sort is stable: devices that compare equal keep their input order.
pub fn rank_devices(mut devices: Vec<NormalizedDevice>) -> Vec<NormalizedDevice> {
    devices.sort_by(compare_devices);
    devices
}

fn compare_devices(a: &NormalizedDevice, b: &NormalizedDevice) -> Ordering {
    b.has_pd_match
        .cmp(&a.has_pd_match)
        .then_with(|| compare_names(sort_name(a), sort_name(b)))
}

fn sort_name(device: &NormalizedDevice) -> &str {
    device.hostname.as_deref().unwrap_or(&device.mac)
}

/// Human-oriented name order
///
/// Letters compare case-insensitively first. Names differing only in case
/// put lower case first (`nas` < `Nas` < `NAS`).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
            .unwrap_or(Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(mac: &str, hostname: Option<&str>, has_pd_match: bool) -> NormalizedDevice {
        NormalizedDevice {
            mac: mac.to_string(),
            hostname: hostname.map(str::to_string),
            via: None,
            addresses: Vec::new(),
            address_info: Vec::new(),
            has_pd_match,
            best_address: None,
            best_address_matches_pd: false,
            label: String::new(),
        }
    }

    fn names(devices: &[NormalizedDevice]) -> Vec<&str> {
        devices.iter().map(sort_name).collect()
    }

    #[test]
    fn test_pd_match_beats_name() {
        let ranked = rank_devices(vec![
            device("aa:00:00:00:00:01", Some("aaa"), false),
            device("aa:00:00:00:00:02", Some("zzz"), true),
        ]);
        assert_eq!(names(&ranked), vec!["zzz", "aaa"]);
    }

    #[test]
    fn test_mac_used_without_hostname() {
        let ranked = rank_devices(vec![
            device("cc:00:00:00:00:01", None, false),
            device("aa:00:00:00:00:02", Some("printer"), false),
            device("00:00:00:00:00:03", None, false),
        ]);
        assert_eq!(
            names(&ranked),
            vec!["00:00:00:00:00:03", "cc:00:00:00:00:01", "printer"]
        );
    }

    #[test]
    fn test_input_order_irrelevant() {
        let a = device("aa:00:00:00:00:01", Some("Alpha"), false);
        let b = device("aa:00:00:00:00:02", Some("beta"), true);
        let c = device("aa:00:00:00:00:03", Some("gamma"), false);

        let forward = rank_devices(vec![a.clone(), b.clone(), c.clone()]);
        let backward = rank_devices(vec![c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(names(&forward), vec!["beta", "Alpha", "gamma"]);
    }

    #[test]
    fn test_true_ties_keep_input_order() {
        let first = device("aa:00:00:00:00:01", Some("nas"), false);
        let second = device("aa:00:00:00:00:02", Some("nas"), false);

        let ranked = rank_devices(vec![first.clone(), second.clone()]);
        assert_eq!(ranked[0].mac, first.mac);
        assert_eq!(ranked[1].mac, second.mac);

        let ranked = rank_devices(vec![second.clone(), first.clone()]);
        assert_eq!(ranked[0].mac, second.mac);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("nas", "Nas"), Ordering::Less);
        assert_eq!(compare_names("Nas", "NAS"), Ordering::Less);
        assert_eq!(compare_names("nas", "nas"), Ordering::Equal);
        assert_eq!(compare_names("nas", "nas2"), Ordering::Less);
    }
}
