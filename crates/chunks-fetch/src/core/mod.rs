//! Pure pipeline logic: window bookkeeping, chain authentication and
//! retry backoff. Nothing here performs I/O or touches the runtime.

mod chain;
mod retry;
mod window;

pub use chain::{ChainVerifier, Submitted, Verified};
pub use retry::{MAX_CONGESTION_BACKOFF, congestion_backoff, retry_delay};
pub use window::{FailureOutcome, FetchId, NextRequest, Slot, SlotState, Window};
