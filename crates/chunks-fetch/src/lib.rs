//! Segment retrieval over a named-data network.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and reported events
//! - [`core`] - Pure window bookkeeping, chain authentication and backoff
//! - [`effects`] - The [`Face`] abstraction, fetch tasks and the pipeline
//!
//! # Key Features
//!
//! - **Fixed Window**: at most `window_size` segment requests in flight
//! - **Chained Integrity**: each segment is authenticated by the commitment
//!   its predecessor carried; segments are delivered in sequence order
//! - **End Discovery**: the first final-segment marker bounds the fetch and
//!   cancels requests past it
//! - **Message Passing**: one controller task owns all pipeline state

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{congestion_backoff, retry_delay};
pub use self::data::{MAX_RETRIES, MAX_WINDOW_SIZE, PipelineEvent, PipelineOptions, RetryLimit, Segment, Summary};
pub use self::effects::{EventStream, Face, Fault, FixedPipeline, InterestError, MemoryFace, Pipeline, SegmentFetcher};
pub use self::error::{FetchFailure, IntegrityError, OptionsError, PipelineError, Result};
