//! Captured route parameters
//!
//! A compiled pattern describes its parameters as an ordered list of
//! [`ParamSpec`]s; a successful match produces a [`Params`] list in the
//! same order. Anonymous captures (wildcards, bare regex groups) get
//! auto-assigned integer names, explicit `:name` parameters keep their
//! label, and both live in one ordered sequence so positional capture
//! groups map back to names without a second bookkeeping table.

use std::fmt;

/// Name of a route parameter: either an explicit `:name` label or the
/// auto-assigned index of an anonymous capture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamName {
    /// Explicit `:name` parameter
    Named(String),
    /// Anonymous capture, numbered left to right
    Index(usize),
}

impl ParamName {
    /// Compare against a string key; integer names match their decimal
    /// representation.
    pub fn is(&self, key: &str) -> bool {
        match self {
            ParamName::Named(name) => name == key,
            ParamName::Index(i) => key == i.to_string(),
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamName::Named(name) => write!(f, "{}", name),
            ParamName::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for ParamName {
    fn from(name: &str) -> Self {
        ParamName::Named(name.to_string())
    }
}

impl From<usize> for ParamName {
    fn from(index: usize) -> Self {
        ParamName::Index(index)
    }
}

/// One parameter slot of a compiled pattern.
///
/// Order within the matcher equals capture-group order in the compiled
/// expression; that invariant is what lets a match zip captures back to
/// names positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name
    pub name: ParamName,
    /// Regex fragment this parameter contributes (capture group included)
    pub fragment: String,
    /// Whether the parameter may be absent from a matching string
    pub optional: bool,
}

/// Ordered list of captured parameter values with lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(ParamName, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: ParamName, value: String) {
        self.entries.push((name, value));
    }

    /// Look up a value by name. Anonymous captures are addressed by
    /// their decimal index (`params.get("0")`).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.is(key))
            .map(|(_, value)| value.as_str())
    }

    /// Look up an anonymous capture by index.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == ParamName::Index(index))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamName, &str)> {
        self.entries.iter().map(|(name, value)| (name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<ParamName>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
