//! # Batch Result
//!
//! Ordered mapping from the raw address token a caller sent to the outcome of
//! probing it. Keys are never normalized: `"Host"` and `"host"` are distinct
//! entries, and a token that appears twice keeps the position of its first
//! occurrence and the value of its last one, exactly like assigning into a
//! map keyed by the raw string.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::status::ProbeResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    entries: Vec<(String, ProbeResult)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `result` to `raw`, replacing any earlier value in place.
    pub fn insert(&mut self, raw: String, result: ProbeResult) {
        match self.entries.iter_mut().find(|(key, _)| *key == raw) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((raw, result)),
        }
    }

    pub fn get(&self, raw: &str) -> Option<&ProbeResult> {
        self.entries
            .iter()
            .find(|(key, _)| key == raw)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProbeResult)> {
        self.entries.iter().map(|(key, result)| (key.as_str(), result))
    }
}

/// Builds a [`BatchResult`] from `(raw, result)` pairs in the order given.
pub fn aggregate<I>(pairs: I) -> BatchResult
where
    I: IntoIterator<Item = (String, ProbeResult)>,
{
    let mut batch: BatchResult = BatchResult::new();
    for (raw, result) in pairs {
        batch.insert(raw, result);
    }
    batch
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, result) in &self.entries {
            map.serialize_entry(key, result)?;
        }
        map.end()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
