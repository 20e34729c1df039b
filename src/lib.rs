//! # meterline
//!
//! **Meterline** provides the shared-lifecycle and routing core for metric-processing
//! pipelines.
//!
//! A pipeline is a graph of stateful components (aggregators, senders) that ingest
//! [`MetricReport`]s. Several upstream holders may share one downstream component;
//! meterline guarantees that such a component is torn down exactly once, after the
//! last holder lets go, and that teardown failures from many components are reported
//! together instead of dropped.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        report
//!          │
//!          ▼
//!   ┌──────────────┐  "cpu"   ┌───────────────────┐         ┌──────────────┐
//!   │   Selector   │ ───────► │   CallbackInput   │ ──────► │ aggregator A │
//!   │ (route by    │          │ (shutdown hook)   │         └──────────────┘
//!   │  name)       │  "mem"   └───────────────────┘         ┌──────────────┐
//!   │              │ ─────────────────────────────────────► │ aggregator B │
//!   └──────────────┘                                        └──────────────┘
//!          ▲                                                       ▲
//!          │ acquire/release                     acquire/release   │
//!       holder                                  (another selector) ┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! constructor ──► acquires each wrapped child once          (node refs = 0)
//! holder.acquire()  ──► refs += 1
//! holder.release()  ──► refs -= 1
//!   └─ refs == 0 ──► teardown (exactly once)
//!        ├─ Selector      ─► release_all(children)      (concurrent, errors merged)
//!        └─ CallbackInput ─► shutdown() then delegate.release() (errors merged)
//! ```
//!
//! ## Features
//! | Area           | Description                                                  | Key types / functions                    |
//! |----------------|--------------------------------------------------------------|------------------------------------------|
//! | **Lifecycle**  | Reference counting with run-once teardown.                   | [`Component`], [`UsageTracker`]          |
//! | **Routing**    | Dispatch a report to one input by metric name.               | [`Input`], [`Selector`]                  |
//! | **Hooks**      | Run a shutdown hook before releasing a delegate.             | [`CallbackInput`]                        |
//! | **Fan-out**    | Release many components in parallel, merging all failures.   | [`release_all`], [`release_all_with`]    |
//! | **Errors**     | Typed errors and error merging.                              | [`PipelineError`], [`AggregateError`]    |
//! | **Configuration** | Release concurrency settings.                             | [`Config`]                               |
//!
//! ## Example
//! ```rust
//! use meterline::{
//!     CallbackInput, Component, Input, InputFn, InputRef, MetricReport, MetricValue, Selector,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cpu: InputRef = InputFn::arc("cpu-aggregator", |_r: MetricReport| async { Ok(()) });
//!     let cpu: InputRef = CallbackInput::arc(cpu, || async {
//!         println!("cpu route shut down");
//!         Ok(())
//!     });
//!     let mem: InputRef = InputFn::arc("mem-aggregator", |_r: MetricReport| async { Ok(()) });
//!
//!     let selector = Selector::new([("cpu", cpu), ("mem", mem)]);
//!     selector.acquire();
//!
//!     selector.add_report(MetricReport::new("cpu", MetricValue::Double(0.5))).await?;
//!
//!     // Last reference: releases every route concurrently.
//!     selector.release().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod metrics;
mod pipeline;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{AggregateError, PipelineError};
pub use metrics::{MetricReport, MetricValue};
pub use pipeline::{
    CallbackInput, Component, Input, InputFn, InputRef, Selector, UsageTracker, release_all,
    release_all_with,
};
