use bytes::{Bytes, BytesMut};

use crate::content::SegmentContent;
use crate::error::Result;
use crate::name::{Component, Name};
use crate::tlv;

/// A named, signed piece of content answering an [`Interest`](crate::Interest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub name:            Name,
    pub content:         Bytes,
    /// Last component of the name of the final segment, when the producer
    /// declares where the content ends.
    pub final_block_id:  Option<Component>,
    pub signature_value: Bytes,
}

impl Data {
    pub fn new(name: Name, content: impl Into<Bytes>) -> Self {
        Self {
            name,
            content:         content.into(),
            final_block_id:  None,
            signature_value: Bytes::new(),
        }
    }

    #[must_use]
    pub fn final_block_id(mut self, component: Component) -> Self {
        self.final_block_id = Some(component);
        self
    }

    #[must_use]
    pub fn signature_value(mut self, value: impl Into<Bytes>) -> Self {
        self.signature_value = value.into();
        self
    }

    /// Segment number of this packet, from the last name component.
    pub fn segment(&self) -> Option<u64> { self.name.segment() }

    /// Final segment number, if declared and encoded as a segment component.
    pub fn final_segment(&self) -> Option<u64> {
        self.final_block_id
            .as_ref()
            .and_then(|component| component.to_segment().ok())
    }

    pub fn parse_content(&self) -> Result<SegmentContent> { SegmentContent::decode(&self.content) }

    /// Bytes covered by the signature: Name, MetaInfo and Content elements.
    pub fn signed_portion(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.content.len() + 64);
        self.name.encode(&mut out);

        let mut meta = BytesMut::new();
        if let Some(final_block) = &self.final_block_id {
            let mut component = BytesMut::new();
            tlv::write_element(&mut component, final_block.typ, &final_block.value);
            tlv::write_element(&mut meta, tlv::FINAL_BLOCK_ID, &component);
        }
        tlv::write_element(&mut out, tlv::META_INFO, &meta);
        tlv::write_element(&mut out, tlv::CONTENT, &self.content);
        out.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name { uri.parse().unwrap() }

    #[test]
    fn final_segment_requires_segment_component() {
        let data = Data::new(name("/a/seg=0"), "x").final_block_id(Component::from_segment(9));
        assert_eq!(data.segment(), Some(0));
        assert_eq!(data.final_segment(), Some(9));

        let data = Data::new(name("/a/seg=0"), "x").final_block_id(Component::generic("end"));
        assert_eq!(data.final_segment(), None);
    }

    #[test]
    fn signed_portion_covers_final_block() {
        let plain = Data::new(name("/a/seg=0"), "x");
        let marked = plain.clone().final_block_id(Component::from_segment(0));
        assert_ne!(plain.signed_portion(), marked.signed_portion());
        assert_eq!(plain.signed_portion(), plain.clone().signature_value("sig").signed_portion());
    }
}
