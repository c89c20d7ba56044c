//! Immutable configuration and the values a pipeline reports.

pub mod events;
pub mod options;

pub use events::{PipelineEvent, Segment, Summary};
pub use options::{MAX_RETRIES, MAX_WINDOW_SIZE, PipelineOptions, RetryLimit};
