//! Ordered header multimap.
//!
//! # Design Decisions
//! - Name lookup is case-insensitive (RFC 9110)
//! - The first spelling seen for a name is kept for iteration
//! - Keys iterate in insertion order, values in append order
//! - Values are stored verbatim, never normalized or deduplicated

use http::HeaderMap;

/// Name of the header carrying the entity media type.
pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

/// Mapping from header name to an ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultimap {
    entries: Vec<HeaderEntry>,
}

impl HeaderMultimap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Append a value, keeping any values already present for the name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].values.push(value.into()),
            None => self.entries.push(HeaderEntry {
                name,
                values: vec![value.into()],
            }),
        }
    }

    /// Replace all values for a name.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].values = values,
            None => self.entries.push(HeaderEntry { name, values }),
        }
    }

    /// All values for a name, or an empty slice.
    pub fn get(&self, name: &str) -> &[String] {
        self.position(name)
            .map(|idx| self.entries[idx].values.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    /// First `Content-Type` value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.get_first(CONTENT_TYPE)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|idx| self.entries.remove(idx).values)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each name with all of its values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.values.as_slice()))
    }

    /// Flattened `(name, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMultimap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for HeaderMultimap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl From<&HeaderMap> for HeaderMultimap {
    fn from(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                // Opaque bytes are kept lossily rather than dropped
                let value = value
                    .to_str()
                    .map(str::to_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(value.as_bytes()).into_owned());
                (name.as_str().to_owned(), value)
            })
            .collect()
    }
}
