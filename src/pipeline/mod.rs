//! # Pipeline nodes and their shared lifecycle.
//!
//! This module provides:
//! - [`Component`] / [`Input`] - the capabilities every node implements
//! - [`UsageTracker`] - reference count with run-once teardown, embedded in every node
//! - [`release_all`] - concurrent, failure-tolerant release of many components
//! - [`Selector`] - routes a report to one input by metric name
//! - [`CallbackInput`] - runs a shutdown hook before releasing its delegate
//! - [`InputFn`] - function-backed leaf input

mod callback;
mod component;
mod input_fn;
mod release;
mod selector;
mod tracker;

#[cfg(test)]
pub(crate) mod mock;

pub use callback::CallbackInput;
pub use component::{Component, Input, InputRef};
pub use input_fn::InputFn;
pub use release::{release_all, release_all_with};
pub use selector::Selector;
pub use tracker::UsageTracker;
