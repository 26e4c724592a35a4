//! Track attribute mapping
//!
//! Every attribute holds a list of string values. Scalar tags such as `key`
//! or `bpm` are single-element lists; `genre` and `mood` may hold several.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Track metadata shared between the host and in-flight lookups
pub type SharedMetadata = Arc<Mutex<Metadata>>;

/// Tag names read and written by the plugin
pub mod tags {
    pub const RECORDING_ID: &str = "musicbrainz_recordingid";
    pub const TITLE: &str = "title";
    pub const KEY: &str = "key";
    pub const BPM: &str = "bpm";
    pub const GENRE: &str = "genre";
    pub const MOOD: &str = "mood";
}

/// Attribute name → values, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    values: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the shared form used by processors
    pub fn into_shared(self) -> SharedMetadata {
        Arc::new(Mutex::new(self))
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values of `name` (empty if unset)
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Replace `name` with a single value
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), vec![value.into()]);
    }

    /// Replace `name` with a list of values
    pub fn set_all(&mut self, name: &str, values: Vec<String>) {
        self.values.insert(name.to_string(), values);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.values.entry(k.into()).or_default().push(v.into());
        }
        metadata
    }
}
