//! # Callback input: attaches a shutdown hook to an existing input.
//!
//! [`CallbackInput`] forwards every report to its delegate unchanged. When its last
//! reference is released it runs the hook first, then releases the delegate.
//!
//! ## Teardown sequence
//! ```text
//! release() (last ref)
//!   ├─► shutdown().await          (error or panic captured)
//!   ├─► delegate.release().await  (always, even if shutdown failed)
//!   └─► merge(shutdown_err, release_err)
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::metrics::MetricReport;
use crate::pipeline::{Component, Input, InputRef, UsageTracker};

/// Input decorator that runs a one-shot shutdown hook before releasing its delegate.
///
/// The hook is a closure `F: Fn() -> Fut`; it is invoked at most once.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use meterline::{CallbackInput, Component, InputFn, InputRef, MetricReport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sink: InputRef = InputFn::arc("sink", |_r: MetricReport| async { Ok(()) });
/// let flushed = Arc::new(AtomicBool::new(false));
///
/// let flag = flushed.clone();
/// let input = CallbackInput::new(sink, move || {
///     let flag = flag.clone();
///     async move {
///         flag.store(true, Ordering::SeqCst);
///         Ok(())
///     }
/// });
///
/// input.acquire();
/// input.release().await.unwrap();
/// assert!(flushed.load(Ordering::SeqCst));
/// # }
/// ```
pub struct CallbackInput<F> {
    delegate: InputRef,
    shutdown: F,
    tracker: UsageTracker,
}

impl<F, Fut> CallbackInput<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    /// Wraps `delegate`, acquiring one reference to it.
    pub fn new(delegate: InputRef, shutdown: F) -> Self {
        delegate.acquire();
        Self {
            delegate,
            shutdown,
            tracker: UsageTracker::new(),
        }
    }

    /// Creates the input and returns it as a shared handle.
    ///
    /// Prefer this when you immediately need an [`InputRef`].
    pub fn arc(delegate: InputRef, shutdown: F) -> Arc<Self> {
        Arc::new(Self::new(delegate, shutdown))
    }

    /// Runs the hook, turning a panic into an error so the delegate is still released.
    ///
    /// The hook is called inside the guarded future, so a panic raised before it
    /// returns its future is caught as well.
    async fn run_shutdown(&self) -> Result<(), PipelineError> {
        let hook = AssertUnwindSafe(async { (self.shutdown)().await });
        match hook.catch_unwind().await {
            Ok(res) => res,
            Err(panic_err) => {
                let info = {
                    let any = &*panic_err;
                    if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    }
                };
                warn!(panic = %info, "shutdown hook panicked");
                Err(PipelineError::failed(format!("shutdown hook panicked: {info}")))
            }
        }
    }
}

#[async_trait]
impl<F, Fut> Component for CallbackInput<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    fn acquire(&self) {
        self.tracker.acquire();
    }

    async fn release(&self) -> Result<(), PipelineError> {
        self.tracker
            .release(move || async move {
                debug!("callback input: running shutdown hook");
                let shutdown = self.run_shutdown().await;
                let released = self.delegate.release().await;
                PipelineError::merge(shutdown.err().into_iter().chain(released.err()))
            })
            .await
    }
}

#[async_trait]
impl<F, Fut> Input for CallbackInput<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    async fn add_report(&self, report: MetricReport) -> Result<(), PipelineError> {
        self.delegate.add_report(report).await
    }
}
