//! # Metric report.
//!
//! A [`MetricReport`] is a single usage sample. The pipeline only inspects
//! [`MetricReport::name`] to pick a route; every other field is forwarded untouched.
//!
//! ## Example
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use meterline::{MetricReport, MetricValue};
//!
//! let start = SystemTime::UNIX_EPOCH;
//! let report = MetricReport::new("requests", MetricValue::Int(10))
//!     .with_interval(start, start + Duration::from_secs(60))
//!     .with_label("zone", "us-east1-b");
//!
//! assert_eq!(report.name, "requests");
//! assert_eq!(report.labels.get("zone").map(String::as_str), Some("us-east1-b"));
//! ```

use std::collections::BTreeMap;
use std::time::SystemTime;

/// Sample value carried by a report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricValue {
    /// Integer sample (counts, bytes).
    Int(i64),
    /// Floating-point sample (durations, ratios).
    Double(f64),
}

/// One usage sample for a named metric over a time interval.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricReport {
    /// Metric name; the routing key.
    pub name: String,
    /// Start of the measured interval.
    pub start_time: SystemTime,
    /// End of the measured interval.
    pub end_time: SystemTime,
    /// Sample value.
    pub value: MetricValue,
    /// Free-form labels.
    pub labels: BTreeMap<String, String>,
}

impl MetricReport {
    /// Creates a report with an empty interval at the current time and no labels.
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        let now = SystemTime::now();
        Self {
            name: name.into(),
            start_time: now,
            end_time: now,
            value,
            labels: BTreeMap::new(),
        }
    }

    /// Sets the measured interval.
    #[must_use]
    pub fn with_interval(mut self, start: SystemTime, end: SystemTime) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Adds or replaces one label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Replaces all labels.
    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }
}
