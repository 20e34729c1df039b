//! # Metric reports flowing through the pipeline.
//!
//! - [`MetricReport`] - one usage sample, routed by its [`name`](MetricReport::name)
//! - [`MetricValue`] - integer or floating-point sample value

mod report;

pub use report::{MetricReport, MetricValue};
