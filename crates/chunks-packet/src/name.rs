//! Hierarchical names and their URI form.

use std::fmt;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};

use crate::error::{PacketError, Result};
use crate::tlv;

/// A single name component: a TLV type and an opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    pub typ:   u64,
    pub value: Bytes,
}

impl Component {
    pub fn generic(value: impl Into<Bytes>) -> Self {
        Self {
            typ:   tlv::GENERIC_NAME_COMPONENT,
            value: value.into(),
        }
    }

    /// A typed segment-number component.
    pub fn from_segment(segment: u64) -> Self {
        Self {
            typ:   tlv::SEGMENT_NAME_COMPONENT,
            value: Bytes::from(tlv::encode_non_negative_integer(segment)),
        }
    }

    pub fn is_segment(&self) -> bool { self.typ == tlv::SEGMENT_NAME_COMPONENT }

    /// Decode this component as a segment number.
    pub fn to_segment(&self) -> Result<u64> {
        if !self.is_segment() {
            return Err(PacketError::NotASegment);
        }
        tlv::decode_non_negative_integer(&self.value)
    }

    fn write_escaped(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.iter().all(|b| *b == b'.') {
            // "", ".", ".." are reserved in URIs; pad with three periods.
            for _ in 0..self.value.len() + 3 {
                f.write_str(".")?;
            }
            return Ok(());
        }
        for &b in self.value.iter() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_segment() {
            Ok(segment) => write!(f, "seg={}", segment),
            Err(_) if self.typ == tlv::GENERIC_NAME_COMPONENT => self.write_escaped(f),
            Err(_) => {
                write!(f, "{}=", self.typ)?;
                self.write_escaped(f)
            }
        }
    }
}

impl FromStr for Component {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(number) = s.strip_prefix("seg=") {
            let segment = number
                .parse::<u64>()
                .map_err(|_| PacketError::InvalidUri(s.to_string()))?;
            return Ok(Self::from_segment(segment));
        }

        let value = unescape(s)?;
        if !value.is_empty() && value.iter().all(|b| *b == b'.') {
            if value.len() < 3 {
                return Err(PacketError::InvalidUri(s.to_string()));
            }
            return Ok(Self::generic(value[3..].to_vec()));
        }
        Ok(Self::generic(value))
    }
}

fn unescape(s: &str) -> Result<Vec<u8>> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s
                .get(i + 1..i + 3)
                .ok_or_else(|| PacketError::InvalidUri(s.to_string()))?;
            let b = u8::from_str_radix(hex, 16)
                .map_err(|_| PacketError::InvalidUri(s.to_string()))?;
            out.push(b);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// An ordered sequence of components, e.g. `/example/data/v=3/seg=0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.components.len() }

    pub fn is_empty(&self) -> bool { self.components.is_empty() }

    pub fn components(&self) -> &[Component] { &self.components }

    pub fn last(&self) -> Option<&Component> { self.components.last() }

    #[must_use]
    pub fn append(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    #[must_use]
    pub fn append_segment(self, segment: u64) -> Self {
        self.append(Component::from_segment(segment))
    }

    /// The segment number carried by the last component, if any.
    pub fn segment(&self) -> Option<u64> { self.last().and_then(|c| c.to_segment().ok()) }

    /// Name with the last `n` components removed.
    pub fn prefix(&self, n: usize) -> Name {
        let keep = self.components.len().saturating_sub(n);
        Name {
            components: self.components[..keep].to_vec(),
        }
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.components.starts_with(&self.components)
    }

    pub fn encode(&self, out: &mut BytesMut) {
        let mut inner = BytesMut::new();
        for component in &self.components {
            tlv::write_element(&mut inner, component.typ, &component.value);
        }
        tlv::write_element(out, tlv::NAME, &inner);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.strip_prefix("ndn:").unwrap_or(s);
        if !path.starts_with('/') {
            return Err(PacketError::InvalidUri(s.to_string()));
        }
        let components = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(Component::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Name { components })
    }
}
