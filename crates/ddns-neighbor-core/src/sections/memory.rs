// # Memory Section Store
//
// In-memory implementation of SectionValues.
//
// ## Purpose
//
// Holds option values for one or more configuration sections. It serves as
// the form state of an open editor, and as the persisted configuration when
// that configuration is loaded from elsewhere (environment, a parsed file).
//
// ## Placeholders
//
// Some editors show `--` for "nothing selected". `assign_if_empty` treats
// that the same as an empty value.

use std::collections::HashMap;

use crate::traits::SectionValues;

/// Placeholder value some widgets report for "nothing selected"
const UNSELECTED_PLACEHOLDER: &str = "--";

/// In-memory section store
///
/// # Example
///
/// ```rust
/// use ddns_neighbor_core::sections::MemorySectionStore;
/// use ddns_neighbor_core::traits::SectionValues;
///
/// let mut store = MemorySectionStore::new();
/// store.set("wan6", "ip_interface", "br-lan");
///
/// assert_eq!(store.value("wan6", "ip_interface").as_deref(), Some("br-lan"));
/// assert_eq!(store.value("wan6", "ip_network"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySectionStore {
    sections: HashMap<String, HashMap<String, String>>,
}

impl MemorySectionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option value
    pub fn set(&mut self, section_id: &str, option: &str, value: impl Into<String>) {
        self.sections
            .entry(section_id.to_string())
            .or_default()
            .insert(option.to_string(), value.into());
    }

    /// Remove an option; returns the previous value
    pub fn unset(&mut self, section_id: &str, option: &str) -> Option<String> {
        let section = self.sections.get_mut(section_id)?;
        let previous = section.remove(option);
        if section.is_empty() {
            self.sections.remove(section_id);
        }
        previous
    }

    /// Set an option only if it is missing, empty, or the `--` placeholder
    ///
    /// Returns `true` if the value was written.
    pub fn assign_if_empty(&mut self, section_id: &str, option: &str, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        let current = self
            .sections
            .get(section_id)
            .and_then(|section| section.get(option));

        match current {
            Some(v) if !v.is_empty() && v != UNSELECTED_PLACEHOLDER => false,
            _ => {
                self.set(section_id, option, value);
                true
            }
        }
    }

    /// Number of options set across all sections
    pub fn len(&self) -> usize {
        self.sections.values().map(HashMap::len).sum()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Remove all sections
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl SectionValues for MemorySectionStore {
    fn value(&self, section_id: &str, option: &str) -> Option<String> {
        self.sections
            .get(section_id)
            .and_then(|section| section.get(option))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemorySectionStore::new();

        // Initially empty
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);

        // Set and get
        store.set("wan6", "ip_interface", "br-lan");
        store.set("wan6", "ip_network", "lan");
        assert_eq!(store.len(), 2);
        assert_eq!(store.value("wan6", "ip_interface").as_deref(), Some("br-lan"));
        assert_eq!(store.value("other", "ip_interface"), None);

        // Unset
        assert_eq!(store.unset("wan6", "ip_interface").as_deref(), Some("br-lan"));
        assert_eq!(store.unset("wan6", "ip_interface"), None);
        assert_eq!(store.len(), 1);

        store.unset("wan6", "ip_network");
        assert!(store.is_empty());
    }

    #[test]
    fn test_assign_if_empty() {
        let mut store = MemorySectionStore::new();

        assert!(store.assign_if_empty("wan6", "ip_interface", "br-lan"));
        assert!(!store.assign_if_empty("wan6", "ip_interface", "eth0"));
        assert_eq!(store.value("wan6", "ip_interface").as_deref(), Some("br-lan"));

        store.set("wan6", "ip_network", "--");
        assert!(store.assign_if_empty("wan6", "ip_network", "lan"));

        store.set("wan6", "interface", "");
        assert!(store.assign_if_empty("wan6", "interface", "lan"));

        assert!(!store.assign_if_empty("wan6", "ip_device", ""));
        assert_eq!(store.value("wan6", "ip_device"), None);
    }
}
