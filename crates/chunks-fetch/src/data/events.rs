use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use chunks_packet::Data;

use crate::error::PipelineError;

/// A verified segment, handed to the consumer in sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub number:  u64,
    /// The content bytes with the integrity commitment stripped.
    pub payload: Bytes,
    pub data:    Data,
}

/// Statistics reported when every segment has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub segments: u64,
    pub bytes:    u64,
    pub elapsed:  Duration,
}

impl Summary {
    /// Delivered payload rate in bits per second.
    pub fn goodput_bps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.bytes * 8) as f64 / secs
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} segments, {} bytes in {:.3}s, goodput {:.1} kbit/s",
            self.segments,
            self.bytes,
            self.elapsed.as_secs_f64(),
            self.goodput_bps() / 1000.0
        )
    }
}

/// Everything a running pipeline reports to its consumer.
///
/// A stream of events is zero or more `Segment`s followed by at most one
/// terminal `Failed` or `Completed`. A canceled pipeline ends without a
/// terminal event.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Segment(Segment),
    Failed(PipelineError),
    Completed(Summary),
}

impl PipelineEvent {
    pub fn is_terminal(&self) -> bool { !matches!(self, Self::Segment(_)) }
}
