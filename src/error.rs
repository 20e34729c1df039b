//! Error types used by pipeline components.
//!
//! This module defines:
//!
//! - [`PipelineError`] - every failure a component can report, from routing misses to teardown failures.
//! - [`AggregateError`] - the merge of several independent failures (fan-out release, two-step teardown).
//!
//! [`PipelineError`] provides helper methods (`as_label`, `as_message`) for logging/metrics
//! and [`PipelineError::merge`], which collapses a set of errors into one value.

use std::fmt;

use thiserror::Error;

/// # Errors produced by pipeline components.
///
/// Routing errors are raised by [`Selector`](crate::Selector) before any downstream input
/// is touched. Teardown errors come from leaf components or shutdown hooks and are
/// propagated as-is. Several failures are combined into [`PipelineError::Aggregate`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No route is registered for the report's metric name.
    #[error("selector: unknown metric: {name}")]
    UnknownMetric {
        /// The metric name that had no route.
        name: String,
    },

    /// A component or shutdown hook failed.
    #[error("{error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// A spawned release task panicked or was cancelled before completing.
    #[error("release task panicked: {error}")]
    ReleasePanicked {
        /// Description of the join failure.
        error: String,
    },

    /// `release` was called without a matching `acquire`.
    #[error("component released more times than it was acquired")]
    ReleaseUnderflow,

    /// Several independent failures.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::Failed`].
    ///
    /// # Example
    /// ```
    /// use meterline::PipelineError;
    ///
    /// let err = PipelineError::failed("disk full");
    /// assert_eq!(err.to_string(), "disk full");
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        PipelineError::Failed {
            error: error.into(),
        }
    }

    /// Merges zero or more errors into one.
    ///
    /// Returns `Ok(())` when the iterator is empty; otherwise an
    /// [`PipelineError::Aggregate`] holding every error exactly once.
    /// Nested aggregates are flattened.
    ///
    /// # Example
    /// ```
    /// use meterline::PipelineError;
    ///
    /// assert!(PipelineError::merge(Vec::new()).is_ok());
    ///
    /// let merged = PipelineError::merge(vec![
    ///     PipelineError::failed("a"),
    ///     PipelineError::failed("b"),
    /// ]).unwrap_err();
    /// assert_eq!(merged.as_label(), "pipeline_aggregate");
    /// ```
    pub fn merge<I>(errors: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = PipelineError>,
    {
        let mut agg = AggregateError::default();
        for err in errors {
            agg.push(err);
        }
        agg.into_result()
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use meterline::PipelineError;
    ///
    /// let err = PipelineError::UnknownMetric { name: "disk".into() };
    /// assert_eq!(err.as_label(), "pipeline_unknown_metric");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PipelineError::UnknownMetric { .. } => "pipeline_unknown_metric",
            PipelineError::Failed { .. } => "pipeline_failed",
            PipelineError::ReleasePanicked { .. } => "pipeline_release_panicked",
            PipelineError::ReleaseUnderflow => "pipeline_release_underflow",
            PipelineError::Aggregate(_) => "pipeline_aggregate",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PipelineError::UnknownMetric { name } => format!("unknown metric: {name}"),
            PipelineError::Failed { error } => format!("error: {error}"),
            PipelineError::ReleasePanicked { error } => format!("release panicked: {error}"),
            PipelineError::ReleaseUnderflow => "release without acquire".to_string(),
            PipelineError::Aggregate(agg) => format!("{} errors", agg.len()),
        }
    }
}

/// # Merge of several independent failures.
///
/// Built by [`PipelineError::merge`]. Order follows insertion order; nested aggregates are
/// flattened so every entry is a leaf error.
#[derive(Debug, Default)]
pub struct AggregateError {
    errors: Vec<PipelineError>,
}

impl AggregateError {
    /// Appends an error, flattening it if it is itself an aggregate.
    pub fn push(&mut self, err: PipelineError) {
        match err {
            PipelineError::Aggregate(inner) => self.errors.extend(inner.errors),
            other => self.errors.push(other),
        }
    }

    /// Returns the collected errors.
    pub fn errors(&self) -> &[PipelineError] {
        &self.errors
    }

    /// Consumes the aggregate and returns the collected errors.
    pub fn into_errors(self) -> Vec<PipelineError> {
        self.errors
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if empty, otherwise `Err(PipelineError::Aggregate(self))`.
    pub fn into_result(self) -> Result<(), PipelineError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Aggregate(self))
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            1 => write!(f, "1 error occurred:")?,
            n => write!(f, "{n} errors occurred:")?,
        }
        for err in &self.errors {
            write!(f, "\n\t* {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
