//! Build options selected by the user.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A normalized build option name (e.g. `with-homebrew-httpd24`).
///
/// Leading dashes are stripped and the name is lowercased, so `--with-Python`
/// and `with-python` refer to the same option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OptionName(String);

impl OptionName {
    /// Create a new option name, normalizing the input.
    pub fn new(name: &str) -> Self {
        Self(name.trim().trim_start_matches('-').to_lowercase())
    }

    /// Return the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OptionName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<OptionName> for String {
    fn from(name: OptionName) -> Self {
        name.0
    }
}

/// The set of options enabled for one resolution.
///
/// An option that is absent is off. The set is built once from user input
/// and passed by reference into the resolver; it is never mutated there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(BTreeSet<OptionName>);

impl OptionSet {
    /// An empty set: every option at its default (off).
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this set with `name` enabled.
    pub fn with(mut self, name: impl Into<OptionName>) -> Self {
        self.0.insert(name.into());
        self
    }

    /// Whether the option is enabled.
    pub fn contains(&self, name: &OptionName) -> bool {
        self.0.contains(name)
    }

    /// Whether the option, given as a raw string, is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.contains(&OptionName::new(name))
    }

    /// Iterate enabled options in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionName> {
        self.0.iter()
    }

    /// Number of enabled options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no option is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<OptionName>> FromIterator<N> for OptionSet {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a OptionName;
    type IntoIter = std::collections::btree_set::Iter<'a, OptionName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
