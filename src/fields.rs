//! Insertion-ordered key/value context attached to loggers and records.
//!
//! Setting a key that already exists updates its value in place; the key
//! keeps the position where it was first seen. Keys are never removed.
//!
//! The map is backed by a persistent vector, so cloning it for a forked
//! logger shares structure with the parent instead of copying every entry.

use crate::log_error::{LogError, Result};
use im::Vector;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vector<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a flat `key, value, key, value, ...` list.
    pub fn from_pairs(pairs: &[&dyn fmt::Display]) -> Result<Self> {
        let mut map = Self::new();
        map.extend_pairs(pairs)?;
        Ok(map)
    }

    /// Reject odd-length argument lists without formatting anything.
    pub fn check_pairs(pairs: &[&dyn fmt::Display]) -> Result<()> {
        if pairs.len() % 2 != 0 {
            return Err(LogError::OddArguments { count: pairs.len() });
        }
        Ok(())
    }

    /// Upsert every pair of a flat `key, value, ...` list, in order.
    pub fn extend_pairs(&mut self, pairs: &[&dyn fmt::Display]) -> Result<()> {
        Self::check_pairs(pairs)?;
        for pair in pairs.chunks_exact(2) {
            self.set(pair[0].to_string(), pair[1].to_string());
        }
        Ok(())
    }

    /// Insert `key`, or overwrite its value if it is already present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.entries.set(index, (key, value));
            }
            None => self.entries.push_back((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in insertion order. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}
