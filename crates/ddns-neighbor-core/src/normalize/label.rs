//! Device label formatting
//!
//! `nas • aa:bb:cc:11:22:33 • 2001:db8::42 (+1 more) [via br-lan]`

use crate::config::Messages;

use super::NormalizedDevice;

/// Build the one-line label of a device
///
/// Hostname (or the unnamed placeholder), MAC and best address are joined by
/// the separator; the address-count and origin suffixes follow, space
/// separated, when they apply.
pub fn format_label(device: &NormalizedDevice, messages: &Messages) -> String {
    let mut parts: Vec<&str> = vec![
        device
            .hostname
            .as_deref()
            .unwrap_or(messages.unnamed_device.as_str()),
        device.mac.as_str(),
    ];
    if let Some(best) = device.addresses.first() {
        parts.push(best);
    }

    let mut label = parts.join(&messages.label_separator);

    if device.addresses.len() > 1 {
        label.push(' ');
        label.push_str(&messages.more_addresses(device.addresses.len() - 1));
    }

    if let Some(via) = device.via.as_deref() {
        label.push(' ');
        label.push_str(&messages.via(via));
    }

    label
}
