//! Sample records collected for the monitored process.

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

/// Timestamp layout used in reports and logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// One sample of the monitored process.
///
/// Field order matches the CSV column order: timestamp first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    #[serde(rename = "time", serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Local>,
    /// Unique set size in megabytes (`bytes / 1024 / 1024`).
    #[serde(rename = "memory_usage")]
    pub memory_usage_mb: f64,
    #[serde(rename = "threads_used")]
    pub thread_count: u64,
    /// CPU utilisation since the previous sample. Can exceed 100 on multi-core hosts.
    #[serde(rename = "cpu_usage")]
    pub cpu_usage_percent: f64,
}

impl MetricRecord {
    pub fn new(
        timestamp: DateTime<Local>,
        memory_usage_mb: f64,
        cpu_usage_percent: f64,
        thread_count: u64,
    ) -> Self {
        Self {
            timestamp,
            memory_usage_mb,
            thread_count,
            cpu_usage_percent,
        }
    }
}

fn serialize_timestamp<S>(timestamp: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Converts a byte count to megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Append-only sequence of samples, in production order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<MetricRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Returns the records ordered ascending by timestamp.
    ///
    /// The sort is stable, so records sharing a timestamp keep their
    /// production order.
    pub fn sorted(&self) -> Vec<MetricRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        records
    }
}

impl FromIterator<MetricRecord> for RecordTable {
    fn from_iter<I: IntoIterator<Item = MetricRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
