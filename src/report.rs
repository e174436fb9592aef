use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Latency summary, `average`/`stdev`/`max` in microseconds.
///
/// `variance` is the `+/- Stdev` percentage column and is kept as the plain
/// number wrk printed.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LatencyStats {
    pub average: f64,
    pub stdev: f64,
    pub max: f64,
    pub variance: f64,
}

/// Totals from the `N requests in T, B read` line plus `Requests/sec`.
///
/// `requests`, `time` (seconds) and `bytes` are either all present or all
/// absent. `rps` falls back to 0.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ThroughputSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<f64>,
    pub rps: u64,
}

impl ThroughputSummary {
    pub fn has_totals(&self) -> bool {
        self.requests.is_some()
    }
}

/// Response counts by status label, per wrk thread and summed over threads.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct StatusBreakdown {
    pub threads: BTreeMap<String, BTreeMap<String, u64>>,
    pub statuses: BTreeMap<String, u64>,
}

impl StatusBreakdown {
    /// Records one `Thread: <id>, <status>: <count>` observation. The
    /// per-thread slot is overwritten, the aggregate is summed. Thread ids
    /// are kept as printed, so `01` and `1` are different threads.
    pub fn record(&mut self, thread: &str, status: &str, count: u64) {
        self.threads
            .entry(thread.to_string())
            .or_default()
            .insert(status.to_string(), count);
        let total = self.statuses.entry(status.to_string()).or_insert(0);
        *total = total.saturating_add(count);
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty() && self.statuses.is_empty()
    }
}

/// Percentile label to value, kept in the order labels were first seen.
#[derive(Debug, Clone, Default)]
pub struct PercentileBreakdown {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl PartialEq for PercentileBreakdown {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl PercentileBreakdown {
    /// Sets `label` to `value`; a repeated label keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, label: &str, value: u64) {
        match self.index.get(label) {
            Some(&idx) => self.entries[idx].1 = value,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), value));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.index.get(label).map(|&idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PercentileBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Everything recognised in one wrk report.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ParsedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyStats>,
    #[serde(flatten)]
    pub throughput: ThroughputSummary,
    pub percentiles: PercentileBreakdown,
    #[serde(flatten)]
    pub status: StatusBreakdown,
}

impl ParsedResult {
    /// True when no section of the report was recognised. A zero `rps` on
    /// its own does not count as data.
    pub fn is_empty(&self) -> bool {
        self.latency.is_none()
            && !self.throughput.has_totals()
            && self.throughput.rps == 0
            && self.percentiles.is_empty()
            && self.status.is_empty()
    }
}
