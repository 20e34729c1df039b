//! # Selector: routes reports to one input by metric name.
//!
//! A [`Selector`] holds a routing table `metric name → InputRef`, fixed at construction.
//! Each report goes to exactly one input, the one registered under its name.
//!
//! ## Architecture
//! ```text
//!                    ┌──► "cpu" ──► aggregator A
//! report ──► Selector┼──► "mem" ──► aggregator B
//!                    └──► other ──► Err(UnknownMetric)
//!
//! release() (last ref) ──► release_all([A, B])   (concurrent, errors merged)
//! ```
//!
//! ## Rules
//! - The selector takes one reference to every routed input when it is built.
//! - The routing table is never mutated afterwards; lookups need no locking.
//! - Tearing down the selector releases every routed input once per route.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::metrics::MetricReport;
use crate::pipeline::{Component, Input, InputRef, UsageTracker, release_all_with};

/// Input that dispatches each report to the input registered for its metric name.
///
/// # Example
/// ```
/// use meterline::{Component, Input, InputFn, InputRef, MetricReport, MetricValue, Selector};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cpu: InputRef = InputFn::arc("cpu", |_r: MetricReport| async { Ok(()) });
/// let mem: InputRef = InputFn::arc("mem", |_r: MetricReport| async { Ok(()) });
///
/// let selector = Selector::new([("cpu", cpu), ("mem", mem)]);
/// selector.acquire();
///
/// selector.add_report(MetricReport::new("cpu", MetricValue::Int(1))).await.unwrap();
/// assert!(selector.add_report(MetricReport::new("disk", MetricValue::Int(1))).await.is_err());
///
/// selector.release().await.unwrap();
/// # }
/// ```
pub struct Selector {
    inputs: HashMap<String, InputRef>,
    cfg: Config,
    tracker: UsageTracker,
}

impl Selector {
    /// Creates a selector over the given routes with the default [`Config`].
    ///
    /// Acquires one reference to every routed input.
    pub fn new<I, K>(routes: I) -> Self
    where
        I: IntoIterator<Item = (K, InputRef)>,
        K: Into<String>,
    {
        Self::with_config(routes, Config::default())
    }

    /// Creates a selector whose teardown fan-out follows `cfg`.
    pub fn with_config<I, K>(routes: I, cfg: Config) -> Self
    where
        I: IntoIterator<Item = (K, InputRef)>,
        K: Into<String>,
    {
        let inputs: HashMap<String, InputRef> = routes
            .into_iter()
            .map(|(name, input)| (name.into(), input))
            .collect();
        for input in inputs.values() {
            input.acquire();
        }
        Self {
            inputs,
            cfg,
            tracker: UsageTracker::new(),
        }
    }

    /// Returns sorted list of routed metric names.
    pub fn routes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True if the selector routes nothing.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[async_trait]
impl Component for Selector {
    fn acquire(&self) {
        self.tracker.acquire();
    }

    async fn release(&self) -> Result<(), PipelineError> {
        self.tracker
            .release(move || async move {
                debug!(routes = self.inputs.len(), "selector: releasing routed inputs");
                release_all_with(self.inputs.values().cloned(), &self.cfg).await
            })
            .await
    }
}

#[async_trait]
impl Input for Selector {
    async fn add_report(&self, report: MetricReport) -> Result<(), PipelineError> {
        match self.inputs.get(&report.name) {
            Some(input) => input.add_report(report).await,
            None => {
                warn!(metric = %report.name, "selector: no route for metric");
                Err(PipelineError::UnknownMetric { name: report.name })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;
    use crate::pipeline::mock::MockInput;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Barrier;
    use tracing_test::traced_test;

    fn cpu_mem(a: &Arc<MockInput>, b: &Arc<MockInput>) -> Selector {
        let cpu: InputRef = a.clone();
        let mem: InputRef = b.clone();
        Selector::new([("cpu", cpu), ("mem", mem)])
    }

    fn cpu_report() -> MetricReport {
        MetricReport::new("cpu", MetricValue::Double(0.75)).with_label("host", "a1")
    }

    #[tokio::test]
    async fn test_construction_acquires_each_input_once() {
        let a = MockInput::new();
        let b = MockInput::new();
        let selector = cpu_mem(&a, &b);

        assert_eq!(a.acquires(), 1);
        assert_eq!(b.acquires(), 1);
        assert_eq!(selector.routes(), vec!["cpu", "mem"]);
        assert_eq!(selector.len(), 2);
    }

    #[tokio::test]
    async fn test_routes_report_to_matching_input_only() {
        let a = MockInput::new();
        let b = MockInput::new();
        let selector = cpu_mem(&a, &b);

        selector.add_report(cpu_report()).await.unwrap();

        let received = a.reports();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "cpu");
        assert_eq!(received[0].value, MetricValue::Double(0.75));
        assert_eq!(received[0].labels.get("host").map(String::as_str), Some("a1"));
        assert!(b.reports().is_empty());
    }

    #[tokio::test]
    async fn test_forwards_route_error_unchanged() {
        let a = MockInput::failing_reports("aggregator full");
        let selector = Selector::new([("cpu", a.clone() as InputRef)]);

        let err = selector.add_report(cpu_report()).await.unwrap_err();
        assert_eq!(err.to_string(), "aggregator full");
        assert_eq!(a.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_metric_touches_nothing() {
        let a = MockInput::new();
        let b = MockInput::new();
        let selector = cpu_mem(&a, &b);

        let err = selector
            .add_report(MetricReport::new("disk", MetricValue::Int(3)))
            .await
            .unwrap_err();

        assert!(matches!(&err, PipelineError::UnknownMetric { name } if name == "disk"));
        assert!(err.to_string().contains("disk"));
        assert!(a.reports().is_empty());
        assert!(b.reports().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unknown_metric_is_logged_as_warning() {
        let a = MockInput::new();
        let selector = Selector::new([("cpu", a.clone() as InputRef)]);

        let _ = selector
            .add_report(MetricReport::new("disk", MetricValue::Int(1)))
            .await;

        assert!(logs_contain("WARN"));
        assert!(logs_contain("selector: no route for metric"));
        assert!(logs_contain("metric=disk"));
    }

    #[tokio::test]
    async fn test_release_before_last_reference_keeps_inputs() {
        let a = MockInput::new();
        let selector = Selector::new([("cpu", a.clone() as InputRef)]);
        selector.acquire();
        selector.acquire();

        selector.release().await.unwrap();
        assert_eq!(a.releases(), 0);

        selector.release().await.unwrap();
        assert_eq!(a.releases(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_last_release_releases_inputs_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let a = MockInput::gated(barrier.clone());
        let b = MockInput::gated(barrier);
        let selector = cpu_mem(&a, &b);

        selector.acquire();
        tokio::time::timeout(Duration::from_secs(5), selector.release())
            .await
            .expect("inputs were not released concurrently")
            .unwrap();

        assert_eq!(a.releases(), 1);
        assert_eq!(b.releases(), 1);
    }

    #[tokio::test]
    async fn test_release_merges_input_failures() {
        let a = MockInput::failing_release("a failed");
        let b = MockInput::new();
        let selector = cpu_mem(&a, &b);
        selector.acquire();

        let err = selector.release().await.unwrap_err();
        let PipelineError::Aggregate(agg) = err else {
            panic!("expected aggregate");
        };
        assert_eq!(agg.len(), 1);
        assert_eq!(b.releases(), 1);
    }

    #[tokio::test]
    async fn test_shared_input_released_once_per_route() {
        let shared = MockInput::new();
        let selector = Selector::new([
            ("cpu", shared.clone() as InputRef),
            ("cpu_total", shared.clone() as InputRef),
        ]);
        assert_eq!(shared.acquires(), 2);

        selector.acquire();
        selector.release().await.unwrap();
        assert_eq!(shared.releases(), 2);
    }
}
