use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The raw reference dictionary: raw key → target values.
///
/// Keys are unique by raw spelling and keep their first-insertion order, so
/// every index built from the same dictionary is identical run to run.
/// Inserting a key that already exists appends to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceDictionary {
    entries: IndexMap<String, Vec<String>>,
}

impl ReferenceDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` to the entry for `key`, creating it if needed.
    pub fn insert<K, I, V>(&mut self, key: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Append a single value to the entry for `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for ReferenceDictionary
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Self::new();
        for (key, values) in iter {
            dict.insert(key, values);
        }
        dict
    }
}
