//! Error types for chunks-fetch.

use chunks_packet::{Name, NackReason, PacketError};
use chunks_verify::VerificationError;
use thiserror::Error;

/// Why a single segment request gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("Reached the maximum number of timeout retries ({retries}) while retrieving data for {name}")]
    TimeoutRetriesExhausted { name: Name, retries: u32 },

    #[error("Reached the maximum number of nack retries ({retries}) while retrieving data for {name}")]
    NackRetriesExhausted { name: Name, retries: u32 },

    #[error("Could not retrieve data for {name}, reason: {reason}")]
    Nacked { name: Name, reason: NackReason },
}

/// Why a received segment could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("signature does not cover the packet: {0}")]
    BadSignature(VerificationError),

    #[error(transparent)]
    Mismatch(VerificationError),

    #[error("predecessor declared no commitment")]
    MissingCommitment,

    #[error("malformed content: {0}")]
    MalformedContent(#[from] PacketError),
}

/// Terminal pipeline failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Fetching terminated but no final segment number has been found")]
    FinalSegmentNotFound,

    #[error("Failure retrieving segment #{segment}")]
    SegmentFailed { segment: u64 },

    #[error("segment #{segment}: {source}")]
    Fetch {
        segment: u64,
        #[source]
        source:  FetchFailure,
    },

    #[error("integrity check failed for segment #{segment}: {source}")]
    Integrity {
        segment: u64,
        #[source]
        source:  IntegrityError,
    },

    #[error("no request outstanding while segment #{next} is still missing")]
    Stalled { next: u64 },

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

/// Option values outside their accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("pipeline size must be between 1 and 1024, got {0}")]
    WindowSize(usize),

    #[error("retries value must be between -1 and 1024, got {0}")]
    Retries(i64),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
