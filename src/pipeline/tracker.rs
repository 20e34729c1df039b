//! # Usage tracker: reference count with run-once teardown.
//!
//! Every component owns one [`UsageTracker`] and forwards its `acquire`/`release`
//! calls to it. The tracker decides which `release` is the last one and runs the
//! component's teardown exactly once.
//!
//! ## Architecture
//! ```text
//! acquire() ──► refs += 1
//!
//! release(teardown) ──► refs.checked_sub(1)   (single CAS step)
//!                          ├─ None        ──► Err(ReleaseUnderflow), refs untouched
//!                          ├─ Some(0)     ──► fired: false → true ? teardown().await : Ok
//!                          └─ Some(n > 0) ──► Ok
//! ```
//!
//! ## Rules
//! - The count never goes negative; an unmatched `release` is rejected.
//! - Teardown fires only on the `1 → 0` transition, and at most once per tracker.
//! - No lock is held while teardown runs; concurrent `acquire` calls never wait on it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::{debug, warn};

use crate::error::PipelineError;

/// Thread-safe reference counter with a run-once teardown trigger.
///
/// Starts with zero references.
///
/// # Example
/// ```
/// use meterline::{PipelineError, UsageTracker};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tracker = UsageTracker::new();
/// tracker.acquire();
/// tracker.acquire();
///
/// // Not the last reference: teardown does not run.
/// let res = tracker.release(|| async { Err(PipelineError::failed("too early")) }).await;
/// assert!(res.is_ok());
///
/// // Last reference: teardown runs and its result is returned.
/// let res = tracker.release(|| async { Ok(()) }).await;
/// assert!(res.is_ok());
/// assert!(tracker.is_torn_down());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct UsageTracker {
    refs: AtomicUsize,
    fired: AtomicBool,
}

impl UsageTracker {
    /// Creates a tracker with no outstanding references.
    pub const fn new() -> Self {
        Self {
            refs: AtomicUsize::new(0),
            fired: AtomicBool::new(false),
        }
    }

    /// Registers one more reference.
    pub fn acquire(&self) {
        let prev = self.refs.fetch_add(1, Ordering::AcqRel);
        if self.fired.load(Ordering::Acquire) {
            warn!(refs = prev + 1, "component acquired after teardown");
        }
    }

    /// Drops one reference; runs `teardown` if it was the last one.
    ///
    /// Returns teardown's result on the `1 → 0` transition, `Ok(())` on any other
    /// transition, and [`PipelineError::ReleaseUnderflow`] when there is no
    /// outstanding reference to drop.
    ///
    /// # Cancellation
    /// The run-once guard is set before `teardown` starts. If the winning `release`
    /// future is dropped while teardown is in progress (for example when a parent
    /// `release_all` is dropped and its tasks are aborted), teardown does not finish
    /// and is never run again by this tracker. Drive the last `release` to completion.
    pub async fn release<F, Fut>(&self, teardown: F) -> Result<(), PipelineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), PipelineError>>,
    {
        let prev = self
            .refs
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match prev {
            Err(_) => {
                warn!("component released more times than it was acquired");
                Err(PipelineError::ReleaseUnderflow)
            }
            Ok(1) => {
                if self
                    .fired
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    warn!("last reference released again after teardown; ignoring");
                    return Ok(());
                }
                debug!("last reference released; running teardown");
                teardown().await
            }
            Ok(_) => Ok(()),
        }
    }

    /// Number of outstanding references.
    pub fn refs(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }

    /// True once teardown has been triggered.
    pub fn is_torn_down(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
