//! # Component and input capabilities.
//!
//! Every pipeline node implements [`Component`] (shared ownership via `acquire`/`release`).
//! Nodes that accept traffic additionally implement [`Input`].
//! The common handle type is [`InputRef`], an `Arc<dyn Input>` suitable for sharing
//! between several upstream holders.
//!
//! ## Ownership protocol
//! ```text
//! holder A ── acquire() ──┐
//! holder B ── acquire() ──┼──► refs = 2
//!                         │
//! holder A ── release() ──┼──► refs = 1   (no teardown)
//! holder B ── release() ──┘──► refs = 0   ──► teardown (exactly once)
//! ```
//!
//! ## Rules
//! - Construction does not imply a reference; the creator calls `acquire` like any other holder.
//! - Each `acquire` is paired with exactly one `release`.
//! - A component is not used again once its last reference is released.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::metrics::MetricReport;

/// Shared reference to an input (`Arc<dyn Input>`).
pub type InputRef = Arc<dyn Input>;

/// # Reference-counted pipeline node.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use meterline::{Component, PipelineError, UsageTracker};
///
/// struct Sender {
///     tracker: UsageTracker,
/// }
///
/// #[async_trait]
/// impl Component for Sender {
///     fn acquire(&self) {
///         self.tracker.acquire();
///     }
///
///     async fn release(&self) -> Result<(), PipelineError> {
///         self.tracker.release(|| async {
///             // flush buffers, close connections...
///             Ok(())
///         }).await
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Registers one more holder of this component.
    fn acquire(&self);

    /// Relinquishes one reference.
    ///
    /// When the last reference is released the component tears itself down and
    /// returns the teardown result; otherwise returns `Ok(())`.
    async fn release(&self) -> Result<(), PipelineError>;
}

/// # Component that accepts metric reports.
#[async_trait]
pub trait Input: Component {
    /// Handles one report.
    ///
    /// May be called concurrently by several producers until the component is torn down.
    async fn add_report(&self, report: MetricReport) -> Result<(), PipelineError>;
}
