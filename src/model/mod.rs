use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single telemetry or control message: string keys, arbitrary JSON values.
// serde_json::Map is insertion-ordered here (preserve_order feature)
pub type Record = serde_json::Map<String, Value>;

/// Per-station running extremes. `high` only ever goes up, `low` only down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationExtremes {
    pub high: f64,
    pub low: f64,
}

impl StationExtremes {
    pub fn new(temperature: f64) -> Self {
        Self {
            high: temperature,
            low: temperature,
        }
    }

    pub fn observe(&mut self, temperature: f64) {
        self.high = f64::max(self.high, temperature);
        self.low = f64::min(self.low, temperature);
    }
}

/// Stations keyed by name, in first-seen order so snapshots are deterministic.
pub type StationTable = IndexMap<String, StationExtremes>;
