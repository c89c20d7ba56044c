use std::sync::Arc;

use chunks_packet::{Data, Interest, NackReason};
use tracing::{debug, warn};

use crate::core::congestion_backoff;
use crate::data::RetryLimit;
use crate::effects::face::{Face, InterestError};
use crate::error::FetchFailure;

/// Fetches one segment, re-expressing its Interest on transient failures.
///
/// Timeouts and Nacks are counted separately against the same limit. Every
/// retry carries a fresh nonce; Congestion Nacks additionally back off.
pub struct SegmentFetcher<F> {
    face:               Arc<F>,
    interest:           Interest,
    max_retries:        RetryLimit,
    timeouts:           u32,
    nacks:              u32,
    congestion_retries: u32,
}

impl<F: Face> SegmentFetcher<F> {
    pub fn new(face: Arc<F>, interest: Interest, max_retries: RetryLimit) -> Self {
        Self {
            face,
            interest,
            max_retries,
            timeouts: 0,
            nacks: 0,
            congestion_retries: 0,
        }
    }

    pub async fn run(mut self) -> Result<Data, FetchFailure> {
        loop {
            let error = match self.face.express_interest(self.interest.clone()).await {
                Ok(data) => return Ok(data),
                Err(error) => error,
            };

            match error {
                InterestError::Timeout => {
                    self.timeouts += 1;
                    if !self.max_retries.allows(self.timeouts) {
                        return Err(FetchFailure::TimeoutRetriesExhausted {
                            name:    self.interest.name.clone(),
                            retries: self.timeouts - 1,
                        });
                    }
                    warn!(name = %self.interest.name, retries = self.timeouts, "interest timed out, retrying");
                }
                InterestError::Nack(reason) => {
                    self.nacks += 1;
                    if !self.max_retries.allows(self.nacks) {
                        return Err(FetchFailure::NackRetriesExhausted {
                            name:    self.interest.name.clone(),
                            retries: self.nacks - 1,
                        });
                    }
                    match reason {
                        NackReason::Duplicate => {
                            debug!(name = %self.interest.name, "duplicate nack, retrying with a fresh nonce");
                        }
                        NackReason::Congestion => {
                            let backoff = congestion_backoff(self.congestion_retries);
                            self.congestion_retries = self.congestion_retries.saturating_add(1);
                            warn!(name = %self.interest.name, ?backoff, "congestion nack, backing off");
                            tokio::time::sleep(backoff).await;
                        }
                        reason => {
                            return Err(FetchFailure::Nacked {
                                name: self.interest.name.clone(),
                                reason,
                            });
                        }
                    }
                }
            }
            self.interest.refresh_nonce();
        }
    }
}
