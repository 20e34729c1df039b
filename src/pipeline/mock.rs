//! Recording input for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::error::PipelineError;
use crate::metrics::MetricReport;
use crate::pipeline::{Component, Input};

/// Input that records every call instead of tracking references.
#[derive(Default)]
pub(crate) struct MockInput {
    reports: Mutex<Vec<MetricReport>>,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    report_error: Option<String>,
    release_error: Option<String>,
    release_barrier: Option<Arc<Barrier>>,
    release_panics: bool,
}

impl MockInput {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing_reports(error: &str) -> Arc<Self> {
        Arc::new(Self {
            report_error: Some(error.to_string()),
            ..Self::default()
        })
    }

    pub(crate) fn failing_release(error: &str) -> Arc<Self> {
        Arc::new(Self {
            release_error: Some(error.to_string()),
            ..Self::default()
        })
    }

    pub(crate) fn panicking_release() -> Arc<Self> {
        Arc::new(Self {
            release_panics: true,
            ..Self::default()
        })
    }

    /// Release waits on `barrier` before returning.
    pub(crate) fn gated(barrier: Arc<Barrier>) -> Arc<Self> {
        Arc::new(Self {
            release_barrier: Some(barrier),
            ..Self::default()
        })
    }

    pub(crate) fn reports(&self) -> Vec<MetricReport> {
        self.reports.lock().unwrap().clone()
    }

    pub(crate) fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Component for MockInput {
    fn acquire(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }

    async fn release(&self) -> Result<(), PipelineError> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.release_barrier {
            barrier.wait().await;
        }
        if self.release_panics {
            panic!("mock release panicked");
        }
        match &self.release_error {
            Some(error) => Err(PipelineError::failed(error.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Input for MockInput {
    async fn add_report(&self, report: MetricReport) -> Result<(), PipelineError> {
        self.reports.lock().unwrap().push(report);
        match &self.report_error {
            Some(error) => Err(PipelineError::failed(error.clone())),
            None => Ok(()),
        }
    }
}
