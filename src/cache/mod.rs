//! Timestamp cache file
//!
//! An ordered JSON object mapping project-relative paths to
//! `{"created": .., "modified": ..}`. Key order follows insertion order and
//! updates keep a key in place, so successive writes of the same content are
//! byte-identical and diffs stay small.
//!
//! Entries that are not a plain stamp (grouped/nested objects left by older
//! tooling, foreign keys) are carried through untouched.

pub mod paths;

pub use paths::{normalize_relative, resolve_cache_path};

use crate::error::{StampError, StampResult};
use crate::models::Stamp;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampCache {
    entries: Map<String, Value>,
}

impl StampCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from `path`.
    ///
    /// A missing file gives an empty cache. Unparseable content is logged at
    /// warn level and also gives an empty cache. Only other I/O failures
    /// (permissions, path is a directory, ...) are returned as errors.
    pub fn load(path: &Path) -> StampResult<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {}", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StampError::CacheRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let cache = Self::from_slice(&bytes).unwrap_or_else(|reason| {
            warn!(
                "Could not read in cache file @ {} ({}); starting from an empty cache",
                path.display(),
                reason
            );
            Self::new()
        });
        debug!("Loaded {} cache entries from {}", cache.len(), path.display());
        Ok(cache)
    }

    /// Parse cache content. The top level must be a JSON object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(entries)) => Ok(Self { entries }),
            Ok(other) => Err(format!("expected a JSON object, found {}", kind_of(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Pretty-printed JSON in key order.
    pub fn serialize(&self) -> StampResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.entries)?)
    }

    /// The stamp stored under `key`, if it is a well-formed stamp entry.
    pub fn get(&self, key: &str) -> Option<Stamp> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value::<Stamp>(v.clone()).ok())
    }

    /// Insert or overwrite `key`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, stamp: Stamp) {
        self.entries.insert(
            key.into(),
            serde_json::json!({ "created": stamp.created, "modified": stamp.modified }),
        );
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Well-formed stamp entries in key order.
    pub fn stamps(&self) -> impl Iterator<Item = (&str, Stamp)> {
        self.entries.iter().filter_map(|(k, v)| {
            serde_json::from_value::<Stamp>(v.clone())
                .ok()
                .map(|s| (k.as_str(), s))
        })
    }

    /// The underlying JSON object, e.g. for printing.
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.entries
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
