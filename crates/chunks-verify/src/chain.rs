//! Commitment chains linking consecutive segments.
//!
//! Segment `n` embeds, in its content, the signature value of segment `n + 1`.
//! A consumer holding a verified segment `n` can therefore authenticate
//! segment `n + 1` by comparing signature values, without checking a signature
//! against a trust anchor for every packet.

use bytes::Bytes;
use chunks_packet::{Component, Data, Name, SegmentContent};

use crate::error::{Result, VerificationError};
use crate::signer::DigestSha256;

/// Check `data`'s signature value against the commitment its predecessor
/// declared.
pub fn check_commitment(commitment: &[u8], data: &Data) -> Result<()> {
    if commitment != data.signature_value.as_ref() {
        return Err(VerificationError::Mismatch {
            expected: commitment.to_vec(),
            actual:   data.signature_value.to_vec(),
        });
    }
    Ok(())
}

/// Split `payload` into pieces of at most `segment_size` bytes.
///
/// Empty input yields a single empty piece so the content still has a
/// segment 0.
pub fn split_payload(payload: &[u8], segment_size: usize) -> Vec<Bytes> {
    if payload.is_empty() || segment_size == 0 {
        return vec![Bytes::copy_from_slice(payload)];
    }
    payload
        .chunks(segment_size)
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Which sealed segments declare the final segment number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalMarker {
    #[default]
    EverySegment,
    LastSegment,
    Omitted,
}

/// Build signed, chained segments `prefix/seg=0 ..` from `pieces`.
///
/// Segments are sealed last-first: each one's commitment is the signature
/// value of its successor.
pub fn seal_chain(prefix: &Name, pieces: Vec<Bytes>, marker: FinalMarker) -> Vec<Data> {
    let Some(last) = pieces.len().checked_sub(1) else {
        return Vec::new();
    };
    let final_block = Component::from_segment(last as u64);

    let mut sealed: Vec<Data> = Vec::with_capacity(pieces.len());
    let mut next_signature: Option<Bytes> = None;
    for (segment, payload) in pieces.into_iter().enumerate().rev() {
        let mut content = SegmentContent::new(payload);
        if let Some(signature) = next_signature.take() {
            content = content.with_commitment(signature);
        }
        let mut data = Data::new(prefix.clone().append_segment(segment as u64), content.encode());
        let declares_final = match marker {
            FinalMarker::EverySegment => true,
            FinalMarker::LastSegment => segment == last,
            FinalMarker::Omitted => false,
        };
        if declares_final {
            data = data.final_block_id(final_block.clone());
        }
        let data = DigestSha256::sign(data);
        next_signature = Some(data.signature_value.clone());
        sealed.push(data);
    }
    sealed.reverse();
    sealed
}
