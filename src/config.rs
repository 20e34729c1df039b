//! # Pipeline configuration.
//!
//! Provides [`Config`] settings shared by the release fan-out and the routing node.
//!
//! Config is used in two ways:
//! 1. **Selector creation**: `Selector::with_config(routes, config)`
//! 2. **Direct fan-out**: `release_all_with(components, &config)`
//!
//! ## Sentinel values
//! - `max_concurrent_releases = 0` → unlimited (no semaphore created)
//!
//! # Example
//! ```
//! use meterline::Config;
//!
//! let mut cfg = Config::default();
//! assert_eq!(cfg.max_concurrent_releases, 0);
//!
//! cfg.max_concurrent_releases = 4;
//! assert_eq!(cfg.release_limit(), Some(4));
//! ```

/// Configuration for component teardown.
///
/// ## Field semantics
/// - `max_concurrent_releases`: how many child releases a fan-out runs at once (`0` = unlimited)
///
/// With the default every child is released at the same time, so a fan-out takes as
/// long as its slowest child.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Maximum number of child releases running concurrently during a fan-out.
    ///
    /// - `0` = unlimited (no semaphore)
    /// - `n > 0` = at most `n` releases in flight
    ///
    /// Every child is still released exactly once; the cap only delays the start of some.
    pub max_concurrent_releases: usize,
}

impl Config {
    /// Returns the release concurrency cap, or `None` if unlimited.
    pub fn release_limit(&self) -> Option<usize> {
        match self.max_concurrent_releases {
            0 => None,
            n => Some(n),
        }
    }
}
