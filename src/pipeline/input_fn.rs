//! # Function-backed input (`InputFn`)
//!
//! [`InputFn`] wraps a closure `F: Fn(MetricReport) -> Fut` as a leaf [`Input`].
//! Each report produces a fresh future; shared state goes in an `Arc<...>` captured
//! by the closure. Teardown only marks the input as released.
//!
//! ## Example
//! ```rust
//! use meterline::{InputFn, InputRef, MetricReport, PipelineError};
//!
//! let sink: InputRef = InputFn::arc("stdout", |report: MetricReport| async move {
//!     println!("{} = {:?}", report.name, report.value);
//!     Ok::<_, PipelineError>(())
//! });
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PipelineError;
use crate::metrics::MetricReport;
use crate::pipeline::{Component, Input, UsageTracker};

/// Function-backed leaf input.
pub struct InputFn<F> {
    name: Cow<'static, str>,
    f: F,
    tracker: UsageTracker,
}

impl<F, Fut> InputFn<F>
where
    F: Fn(MetricReport) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    /// Creates a new function-backed input.
    ///
    /// Prefer [`InputFn::arc`] when you immediately need an [`InputRef`](crate::InputRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            tracker: UsageTracker::new(),
        }
    }

    /// Creates the input and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Returns the input name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the last reference has been released.
    pub fn is_released(&self) -> bool {
        self.tracker.is_torn_down()
    }
}

#[async_trait]
impl<F, Fut> Component for InputFn<F>
where
    F: Fn(MetricReport) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    fn acquire(&self) {
        self.tracker.acquire();
    }

    async fn release(&self) -> Result<(), PipelineError> {
        self.tracker
            .release(move || async move {
                debug!(input = %self.name, "input released");
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl<F, Fut> Input for InputFn<F>
where
    F: Fn(MetricReport) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    async fn add_report(&self, report: MetricReport) -> Result<(), PipelineError> {
        (self.f)(report).await
    }
}
