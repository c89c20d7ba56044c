//! Sequential authentication of a commitment chain.
//!
//! Every segment's signature must cover its own bytes. Segment 0 anchors the
//! chain; every later segment `n` is accepted only once segment `n - 1` has
//! itself been accepted, by comparing `n`'s signature value with the
//! commitment `n - 1` carried. Segments that arrive early are
//! held until their predecessor is accepted, so accepted segments always
//! form a prefix `0..next_segment`.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chunks_packet::{Data, SegmentContent};
use chunks_verify::{DigestSha256, check_commitment};

use crate::error::{IntegrityError, PipelineError};

/// A segment that passed authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub segment: u64,
    pub payload: Bytes,
    pub data:    Data,
}

/// Result of [`ChainVerifier::submit`].
///
/// Segments authenticated before a failure are still reported, in order,
/// ahead of the error.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Submitted {
    pub verified: Vec<Verified>,
    pub error:    Option<PipelineError>,
}

#[derive(Debug)]
struct Held {
    data:    Data,
    content: SegmentContent,
}

#[derive(Debug, Default)]
pub struct ChainVerifier {
    /// Commitments declared by accepted segments, keyed by declaring segment.
    commitments:  HashMap<u64, Bytes>,
    /// Received segments whose predecessor has not been accepted yet.
    pending:      BTreeMap<u64, Held>,
    next_segment: u64,
}

impl ChainVerifier {
    pub fn new() -> Self { Self::default() }

    /// Number of segments accepted so far; also the next one expected.
    pub fn next_segment(&self) -> u64 { self.next_segment }

    pub fn pending_len(&self) -> usize { self.pending.len() }

    /// Take in a received segment and report every segment that became
    /// authenticated as a result, in sequence order.
    ///
    /// No verified segments and no error means the segment is held waiting
    /// for its predecessor (or was a duplicate of an accepted one).
    pub fn submit(&mut self, segment: u64, data: Data) -> Submitted {
        let mut submitted = Submitted::default();
        if segment < self.next_segment {
            return submitted;
        }
        let content = match data.parse_content() {
            Ok(content) => content,
            Err(e) => {
                submitted.error = Some(PipelineError::Integrity {
                    segment,
                    source: IntegrityError::MalformedContent(e),
                });
                return submitted;
            }
        };
        let held = Held { data, content };

        if segment > self.next_segment {
            self.pending.insert(segment, held);
            return submitted;
        }

        let mut current = Some((segment, held));
        while let Some((n, held)) = current.take() {
            if let Err(error) = self.authenticate(n, &held.data) {
                submitted.error = Some(error);
                break;
            }

            if let Some(previous) = n.checked_sub(1) {
                self.commitments.remove(&previous);
            }
            if let Some(commitment) = &held.content.commitment {
                self.commitments.insert(n, commitment.clone());
            }
            self.next_segment = n + 1;
            submitted.verified.push(Verified {
                segment: n,
                payload: held.content.payload,
                data:    held.data,
            });

            current = self.pending.remove(&(n + 1)).map(|next| (n + 1, next));
        }
        submitted
    }

    /// Forget held segments numbered above `final_segment`.
    pub fn discard_beyond(&mut self, final_segment: u64) {
        self.pending.retain(|&segment, _| segment <= final_segment);
    }

    /// The segment's signature must cover its own bytes, and every segment
    /// but the first must carry the signature its predecessor committed to.
    fn authenticate(&self, segment: u64, data: &Data) -> Result<(), PipelineError> {
        let integrity = |source| PipelineError::Integrity { segment, source };
        DigestSha256::verify(data).map_err(|e| integrity(IntegrityError::BadSignature(e)))?;

        let Some(previous) = segment.checked_sub(1) else {
            return Ok(());
        };
        match self.commitments.get(&previous) {
            Some(commitment) => check_commitment(commitment, data)
                .map_err(|e| integrity(IntegrityError::Mismatch(e))),
            None => Err(integrity(IntegrityError::MissingCommitment)),
        }
    }
}
