//! Selection of entries by name

use regex::Regex;

/// Decides whether an entry, identified by its normalized name, should be selected
///
/// Implemented for closures taking the name, and for [`Regex`], which matches anywhere in the
/// name. Build the regex with `(?i)` to match the case-insensitive way archives store names.
pub trait EntryFilter {
    /// Returns `true` if the entry named `path` is selected
    fn matches(&self, path: &str) -> bool;
}

impl<F> EntryFilter for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, path: &str) -> bool {
        self(path)
    }
}

impl EntryFilter for Regex {
    fn matches(&self, path: &str) -> bool {
        self.is_match(path)
    }
}

/// Selects every entry
#[derive(Debug, Default, Copy, Clone)]
pub struct All;

impl EntryFilter for All {
    fn matches(&self, _path: &str) -> bool {
        true
    }
}
