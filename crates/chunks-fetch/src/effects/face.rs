use std::future::Future;

use chunks_packet::{Data, Interest, NackReason};
use thiserror::Error;

/// Outcome of an Interest that brought back no Data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InterestError {
    #[error("interest timed out")]
    Timeout,

    #[error("interest nacked: {0}")]
    Nack(NackReason),
}

/// Asynchronous network face abstraction.
///
/// This trait provides the minimal interface the pipeline needs: express one
/// Interest, wait for its outcome. Implementations enforce the Interest's
/// lifetime themselves and resolve with [`InterestError::Timeout`] when it
/// expires.
///
/// # Implementations
///
/// - [`MemoryFace`](crate::MemoryFace): serves a fixed set of Data packets
/// - Scripted faces for testing
pub trait Face: Send + Sync + 'static {
    fn express_interest(
        &self,
        interest: Interest,
    ) -> impl Future<Output = Result<Data, InterestError>> + Send;
}
