// # Device Selection
//
// What happens when the operator picks a device from a scan:
// - the identifier is validated and written to `ip_device` (blank unsets it)
// - if it names a scanned device, the scan origin is copied into related
//   options that are still empty, so the section keeps scanning where the
//   device was found

use tracing::debug;

use crate::error::Result;
use crate::identifier::DeviceIdentifier;
use crate::normalize::NormalizedDevice;
use crate::origin::{OPTION_IP_INTERFACE, OPTION_IP_NETWORK, Origin};
use crate::sections::MemorySectionStore;

use super::ChoiceOutcome;

/// Option holding the target device identifier
pub const OPTION_IP_DEVICE: &str = "ip_device";

/// Option holding the network the update scripts are triggered on
pub const OPTION_EVENT_INTERFACE: &str = "interface";

/// Options a scan of `source` can fill in, with their values
pub fn related_assignments(source: &Origin) -> Vec<(&'static str, String)> {
    match source {
        Origin::Interface(name) => vec![(OPTION_IP_INTERFACE, name.clone())],
        Origin::Network(name) => vec![
            (OPTION_IP_NETWORK, name.clone()),
            (OPTION_EVENT_INTERFACE, name.clone()),
        ],
    }
}

/// Copy `source` into the empty related options of `section_id`
///
/// Returns the options that were written.
pub fn sync_related_options(
    form: &mut MemorySectionStore,
    section_id: &str,
    source: &Origin,
) -> Vec<&'static str> {
    related_assignments(source)
        .into_iter()
        .filter(|(option, value)| form.assign_if_empty(section_id, option, value))
        .map(|(option, _)| option)
        .collect()
}

/// Find the scanned device named by `identifier`
pub fn find_choice<'a>(
    choices: &'a [NormalizedDevice],
    identifier: &DeviceIdentifier,
) -> Option<&'a NormalizedDevice> {
    choices.iter().find(|device| identifier.matches(device))
}

/// Record the operator's choice of `value` for `section_id`
///
/// Returns the scanned device the value names, if any.
pub fn apply_selection<'a>(
    outcome: &'a ChoiceOutcome,
    form: &mut MemorySectionStore,
    section_id: &str,
    value: &str,
) -> Result<Option<&'a NormalizedDevice>> {
    let value = value.trim();
    if value.is_empty() {
        form.unset(section_id, OPTION_IP_DEVICE);
        return Ok(None);
    }

    let identifier = DeviceIdentifier::parse(value)?;
    form.set(section_id, OPTION_IP_DEVICE, identifier.as_str());

    let device = find_choice(&outcome.choices, &identifier);
    if let (Some(device), Some(source)) = (device, outcome.source.as_ref()) {
        let written = sync_related_options(form, section_id, source);
        debug!(
            "Selected {} on {}; filled {:?}",
            device.mac,
            source.via(),
            written
        );
    }

    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NeighborNormalizer;
    use crate::payload::{NeighborPayload, RawNeighbor};
    use crate::traits::SectionValues;

    fn outcome(source: Origin) -> ChoiceOutcome {
        let payload = NeighborPayload::new(
            vec![
                RawNeighbor::new("AA:BB:CC:11:22:33")
                    .with_hostname("nas")
                    .with_addresses(["2001:db8::42"]),
                RawNeighbor::new("aa:bb:cc:11:22:44"),
            ],
            vec![],
        );
        let choices = NeighborNormalizer::default().normalize_ranked(&payload, Some(&source));
        ChoiceOutcome {
            choices,
            source: Some(source),
            ..ChoiceOutcome::default()
        }
    }

    #[test]
    fn test_related_assignments() {
        assert_eq!(
            related_assignments(&Origin::interface("br-lan")),
            vec![(OPTION_IP_INTERFACE, "br-lan".to_string())]
        );
        assert_eq!(
            related_assignments(&Origin::network("lan")),
            vec![
                (OPTION_IP_NETWORK, "lan".to_string()),
                (OPTION_EVENT_INTERFACE, "lan".to_string())
            ]
        );
    }

    #[test]
    fn test_find_choice_by_mac_and_hostname() {
        let outcome = outcome(Origin::interface("br-lan"));

        let by_mac = DeviceIdentifier::parse("aa-bb-cc-11-22-44").unwrap();
        assert_eq!(
            find_choice(&outcome.choices, &by_mac).map(|d| d.mac.as_str()),
            Some("aa:bb:cc:11:22:44")
        );

        let by_name = DeviceIdentifier::parse("NAS").unwrap();
        assert_eq!(
            find_choice(&outcome.choices, &by_name).map(|d| d.mac.as_str()),
            Some("aa:bb:cc:11:22:33")
        );

        let unknown = DeviceIdentifier::parse("10.0.0.1").unwrap();
        assert!(find_choice(&outcome.choices, &unknown).is_none());
    }

    #[test]
    fn test_apply_selection_fills_empty_related_options() {
        let outcome = outcome(Origin::network("lan"));
        let mut form = MemorySectionStore::new();
        form.set("wan6", OPTION_EVENT_INTERFACE, "wan");

        let device = apply_selection(&outcome, &mut form, "wan6", " AA:BB:CC:11:22:33 ")
            .unwrap()
            .unwrap();

        assert_eq!(device.hostname.as_deref(), Some("nas"));
        assert_eq!(
            form.value("wan6", OPTION_IP_DEVICE).as_deref(),
            Some("AA:BB:CC:11:22:33")
        );
        assert_eq!(form.value("wan6", OPTION_IP_NETWORK).as_deref(), Some("lan"));
        // already set, left alone
        assert_eq!(form.value("wan6", OPTION_EVENT_INTERFACE).as_deref(), Some("wan"));
    }

    #[test]
    fn test_apply_selection_of_unscanned_device() {
        let outcome = outcome(Origin::interface("br-lan"));
        let mut form = MemorySectionStore::new();

        let device = apply_selection(&outcome, &mut form, "wan6", "printer").unwrap();
        assert!(device.is_none());
        assert_eq!(form.value("wan6", OPTION_IP_DEVICE).as_deref(), Some("printer"));
        assert_eq!(form.value("wan6", OPTION_IP_INTERFACE), None);
    }

    #[test]
    fn test_blank_selection_unsets() {
        let outcome = outcome(Origin::interface("br-lan"));
        let mut form = MemorySectionStore::new();
        form.set("wan6", OPTION_IP_DEVICE, "nas");

        assert!(apply_selection(&outcome, &mut form, "wan6", "  ").unwrap().is_none());
        assert_eq!(form.value("wan6", OPTION_IP_DEVICE), None);

        assert!(apply_selection(&outcome, &mut form, "wan6", "bad value!").is_err());
        assert_eq!(form.value("wan6", OPTION_IP_DEVICE), None);
    }
}
