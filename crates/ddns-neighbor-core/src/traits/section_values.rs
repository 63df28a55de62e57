// # Section Values Trait
//
// Read access to the option values of a configuration section. The same
// trait covers the transient form state of an open editor and the persisted
// configuration behind it; origin resolution consults the first and falls
// back to the second per option.

/// Read-only view of configuration options, keyed by section and option
pub trait SectionValues: Send + Sync {
    /// Get the value of `option` in `section_id`
    ///
    /// `None` means "not set here", which lets a caller fall back to another
    /// layer. An empty string is a set (if blank) value.
    fn value(&self, section_id: &str, option: &str) -> Option<String>;
}
