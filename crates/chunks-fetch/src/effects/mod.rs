//! I/O edge of the crate: the network face abstraction, per-segment fetch
//! tasks and the controller task driving a pipeline.

mod controller;
mod face;
mod fetcher;
mod memory;
mod pipeline;

pub use face::{Face, InterestError};
pub use fetcher::SegmentFetcher;
pub use memory::{Fault, MemoryFace};
pub use pipeline::{EventStream, FixedPipeline, Pipeline};
