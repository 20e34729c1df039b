//! # Concurrent release fan-out.
//!
//! [`release_all`] releases a set of components in parallel and merges every failure
//! into a single [`PipelineError::Aggregate`].
//!
//! ## Diagram
//! ```text
//!   release_all([C1, C2, ..., CN])
//!        │
//!        ├──► spawn ─► C1.release() ─┐
//!        ├──► spawn ─► C2.release() ─┼──► join all ──► AggregateError (or Ok)
//!        └──► spawn ─► CN.release() ─┘
//! ```
//!
//! ## What it guarantees
//! - Every component is released exactly once, whatever its siblings return.
//! - The call returns only after every release has completed.
//! - Failures (including panics inside a release) are all collected, none is dropped.
//!
//! ## What it does **not** guarantee
//! - No ordering between siblings.
//! - No deadline: a hanging release blocks the fan-out.
//!
//! Must be called from within a tokio runtime.

use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::error;

use crate::config::Config;
use crate::error::{AggregateError, PipelineError};
use crate::pipeline::Component;

/// Releases every component concurrently, with no concurrency cap.
///
/// # Example
/// ```
/// use meterline::{Component, InputFn, InputRef, MetricReport, release_all};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sink: InputRef = InputFn::arc("sink", |_r: MetricReport| async { Ok(()) });
/// sink.acquire();
///
/// release_all([sink]).await.unwrap();
/// # }
/// ```
pub async fn release_all<I, C>(components: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = Arc<C>>,
    C: Component + ?Sized,
{
    release_all_with(components, &Config::default()).await
}

/// Releases every component concurrently, honoring [`Config::max_concurrent_releases`].
pub async fn release_all_with<I, C>(components: I, cfg: &Config) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = Arc<C>>,
    C: Component + ?Sized,
{
    let semaphore = build_semaphore(cfg);
    let mut set = JoinSet::new();

    for component in components {
        let semaphore = semaphore.clone();
        set.spawn(async move {
            let _permit = match semaphore {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            component.release().await
        });
    }

    let mut errors = AggregateError::default();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => errors.push(err),
            Err(join_err) => {
                error!(error = %join_err, "component release task failed");
                errors.push(PipelineError::ReleasePanicked {
                    error: join_err.to_string(),
                });
            }
        }
    }
    errors.into_result()
}

/// Builds a semaphore if `max_concurrent_releases > 0`; otherwise no cap.
fn build_semaphore(cfg: &Config) -> Option<Arc<Semaphore>> {
    cfg.release_limit().map(|n| Arc::new(Semaphore::new(n)))
}
