//! Mutable connection configuration merged from JSON documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error loading a configuration document.
///
/// Every variant is non-fatal and leaves the store entirely unchanged.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration must be an object")]
    NotAnObject,
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// Connection and client options keyed by librdkafka property name.
///
/// Values keep their JSON shape until a client is built. Merging a new
/// document is a shallow override: every key present in the document
/// replaces the stored value, keys absent from the document stay
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    entries: BTreeMap<String, Value>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the JSON document at `path` into the store.
    ///
    /// Returns the merged delta for display. A document that cannot be
    /// read or parsed, or whose top level is not an object, is rejected
    /// as a whole; there is no partial merge.
    pub fn load(&mut self, path: &Path) -> Result<BTreeMap<String, Value>> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        let document: Value = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_owned(),
            source,
        })?;
        let Value::Object(document) = document else {
            return Err(LoadError::NotAnObject);
        };

        let delta: BTreeMap<String, Value> = document.into_iter().collect();
        self.merge(&delta);
        Ok(delta)
    }

    /// Shallow override-wins union; the source document stays untouched.
    pub(crate) fn merge(&mut self, delta: &BTreeMap<String, Value>) {
        for (key, value) in delta {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored `(key, value)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Flatten a JSON value to the string form librdkafka expects.
///
/// Strings are used verbatim, arrays become comma-separated lists, and
/// everything else renders through its JSON representation.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
