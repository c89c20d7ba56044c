use std::fmt;
use std::time::Duration;

use chunks_packet::DEFAULT_INTEREST_LIFETIME;

use crate::error::OptionsError;

/// Largest accepted window size.
pub const MAX_WINDOW_SIZE: usize = 1024;

/// Largest accepted bounded retry count.
pub const MAX_RETRIES: u32 = 1024;

/// How many times a single segment request may be re-expressed.
///
/// Timeouts and Nacks are counted separately; each counter is compared
/// against the same limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryLimit {
    Unlimited,
    Bounded(u32),
}

impl RetryLimit {
    /// Interpret a raw command-line style value: `-1` is unlimited, `0..=1024`
    /// is a bound.
    pub fn from_raw(raw: i64) -> Result<Self, OptionsError> {
        match raw {
            -1 => Ok(Self::Unlimited),
            0..=1024 => Ok(Self::Bounded(raw as u32)),
            _ => Err(OptionsError::Retries(raw)),
        }
    }

    /// Whether a request that has already failed `failures` times may be
    /// expressed again.
    pub fn allows(&self, failures: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Bounded(max) => failures <= *max,
        }
    }
}

impl Default for RetryLimit {
    fn default() -> Self { Self::Bounded(15) }
}

impl fmt::Display for RetryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Bounded(max) => write!(f, "{max}"),
        }
    }
}

/// Configuration for a fixed-window pipeline.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use chunks_fetch::{PipelineOptions, RetryLimit};
///
/// let options = PipelineOptions::default()
///     .window_size(8)
///     .max_retries(RetryLimit::Bounded(3))
///     .interest_lifetime(Duration::from_secs(1));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Number of segment requests kept in flight.
    ///
    /// Default: 1
    pub window_size: usize,

    /// Retry limit applied to each segment request.
    ///
    /// Default: 15
    pub max_retries: RetryLimit,

    /// Whether expressed Interests ask for fresh Data only.
    ///
    /// Default: false
    pub must_be_fresh: bool,

    /// Lifetime of each expressed Interest.
    ///
    /// Default: 4s
    pub interest_lifetime: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            window_size:       1,
            max_retries:       RetryLimit::default(),
            must_be_fresh:     false,
            interest_lifetime: DEFAULT_INTEREST_LIFETIME,
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: RetryLimit) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    #[must_use]
    pub fn interest_lifetime(mut self, lifetime: Duration) -> Self {
        self.interest_lifetime = lifetime;
        self
    }

    /// Check the option ranges.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(1..=MAX_WINDOW_SIZE).contains(&self.window_size) {
            return Err(OptionsError::WindowSize(self.window_size));
        }
        if let RetryLimit::Bounded(max) = self.max_retries
            && max > MAX_RETRIES
        {
            return Err(OptionsError::Retries(i64::from(max)));
        }
        Ok(())
    }
}
