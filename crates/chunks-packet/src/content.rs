//! Layout of a segment's content.
//!
//! A segment's content is a sequence of TLV elements. `CONTENT` elements carry
//! application payload and are concatenated in order. A single
//! `SIGNATURE_VALUE` element carries the commitment: the signature value the
//! next segment is expected to have. Other element types are skipped.

use bytes::{Bytes, BytesMut};

use crate::error::{PacketError, Result};
use crate::tlv;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentContent {
    pub payload:    Bytes,
    pub commitment: Option<Bytes>,
}

impl SegmentContent {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload:    payload.into(),
            commitment: None,
        }
    }

    #[must_use]
    pub fn with_commitment(mut self, commitment: impl Into<Bytes>) -> Self {
        self.commitment = Some(commitment.into());
        self
    }

    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.payload.len() + 48);
        tlv::write_element(&mut out, tlv::CONTENT, &self.payload);
        if let Some(commitment) = &self.commitment {
            tlv::write_element(&mut out, tlv::SIGNATURE_VALUE, commitment);
        }
        out.freeze()
    }

    pub fn decode(content: &[u8]) -> Result<Self> {
        let mut payload = BytesMut::new();
        let mut commitment = None;

        for element in tlv::elements(content) {
            let element = element?;
            match element.typ {
                tlv::CONTENT => payload.extend_from_slice(element.value),
                tlv::SIGNATURE_VALUE => {
                    if commitment.is_some() {
                        return Err(PacketError::DuplicateElement(tlv::SIGNATURE_VALUE));
                    }
                    commitment = Some(Bytes::copy_from_slice(element.value));
                }
                _ => {}
            }
        }

        Ok(Self {
            payload: payload.freeze(),
            commitment,
        })
    }
}
