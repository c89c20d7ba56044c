//! Type-Length-Value codec.
//!
//! TYPE and LENGTH are variable-size numbers: values below 253 take one byte,
//! larger values are prefixed with 253, 254 or 255 followed by a 2, 4 or 8
//! byte big-endian integer.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{PacketError, Result};

pub const NAME: u64 = 0x07;
pub const GENERIC_NAME_COMPONENT: u64 = 0x08;
pub const META_INFO: u64 = 0x14;
pub const CONTENT: u64 = 0x15;
pub const SIGNATURE_VALUE: u64 = 0x17;
pub const FINAL_BLOCK_ID: u64 = 0x1a;
pub const SEGMENT_NAME_COMPONENT: u64 = 0x32;

/// One decoded TLV element borrowing its value from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub typ:   u64,
    pub value: &'a [u8],
}

fn ensure(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(PacketError::Truncated {
            needed,
            remaining: buf.len(),
        });
    }
    Ok(())
}

/// Read a variable-size number, advancing `buf` past it.
pub fn read_var_number(buf: &mut &[u8]) -> Result<u64> {
    ensure(buf, 1)?;
    match buf.get_u8() {
        253 => {
            ensure(buf, 2)?;
            Ok(u64::from(buf.get_u16()))
        }
        254 => {
            ensure(buf, 4)?;
            Ok(u64::from(buf.get_u32()))
        }
        255 => {
            ensure(buf, 8)?;
            Ok(buf.get_u64())
        }
        n => Ok(u64::from(n)),
    }
}

pub fn write_var_number(out: &mut BytesMut, n: u64) {
    if n < 253 {
        out.put_u8(n as u8);
    } else if n <= u64::from(u16::MAX) {
        out.put_u8(253);
        out.put_u16(n as u16);
    } else if n <= u64::from(u32::MAX) {
        out.put_u8(254);
        out.put_u32(n as u32);
    } else {
        out.put_u8(255);
        out.put_u64(n);
    }
}

/// Read one element, advancing `buf` past it.
pub fn read_element<'a>(buf: &mut &'a [u8]) -> Result<Element<'a>> {
    let typ = read_var_number(buf)?;
    let len = read_var_number(buf)?;
    let len = usize::try_from(len).map_err(|_| PacketError::Truncated {
        needed:    usize::MAX,
        remaining: buf.len(),
    })?;
    ensure(buf, len)?;
    let (value, rest) = buf.split_at(len);
    *buf = rest;
    Ok(Element { typ, value })
}

pub fn write_element(out: &mut BytesMut, typ: u64, value: &[u8]) {
    write_var_number(out, typ);
    write_var_number(out, value.len() as u64);
    out.put_slice(value);
}

/// Iterate over the consecutive elements of `buf`.
///
/// The iterator stops after the first decoding error.
pub fn elements(buf: &[u8]) -> Elements<'_> {
    Elements { rest: buf, failed: false }
}

pub struct Elements<'a> {
    rest:   &'a [u8],
    failed: bool,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        let item = read_element(&mut self.rest);
        self.failed = item.is_err();
        Some(item)
    }
}

/// Minimal-length big-endian encoding (1, 2, 4 or 8 bytes).
pub fn encode_non_negative_integer(n: u64) -> Vec<u8> {
    if n <= u64::from(u8::MAX) {
        vec![n as u8]
    } else if n <= u64::from(u16::MAX) {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u64::from(u32::MAX) {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

pub fn decode_non_negative_integer(mut value: &[u8]) -> Result<u64> {
    match value.len() {
        1 => Ok(u64::from(value.get_u8())),
        2 => Ok(u64::from(value.get_u16())),
        4 => Ok(u64::from(value.get_u32())),
        8 => Ok(value.get_u64()),
        len => Err(PacketError::InvalidIntegerLength(len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(n: u64) -> Vec<u8> {
        let mut out = BytesMut::new();
        write_var_number(&mut out, n);
        out.to_vec()
    }

    #[test]
    fn var_number_boundaries() {
        assert_eq!(encode(252), vec![252]);
        assert_eq!(encode(253), vec![253, 0x00, 0xfd]);
        assert_eq!(encode(65536), vec![254, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(encode(1 << 32)[0], 255);

        for n in [0, 252, 253, 65535, 65536, u64::from(u32::MAX) + 1] {
            let bytes = encode(n);
            let mut slice = bytes.as_slice();
            assert_eq!(read_var_number(&mut slice).unwrap(), n);
            assert!(slice.is_empty());
        }
    }

    #[test]
    fn truncated_var_number() {
        let mut slice: &[u8] = &[253, 0x01];
        assert_eq!(
            read_var_number(&mut slice),
            Err(PacketError::Truncated { needed: 2, remaining: 1 })
        );
    }

    #[test]
    fn element_iteration_stops_on_error() {
        let mut out = BytesMut::new();
        write_element(&mut out, CONTENT, b"abc");
        out.put_slice(&[SIGNATURE_VALUE as u8, 10, 1, 2]);

        let items: Vec<_> = elements(&out).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            Ok(Element { typ: CONTENT, value: b"abc" })
        );
        assert!(items[1].is_err());
    }

    #[test]
    fn non_negative_integer_is_minimal() {
        assert_eq!(encode_non_negative_integer(0), vec![0]);
        assert_eq!(encode_non_negative_integer(256), vec![1, 0]);
        assert_eq!(encode_non_negative_integer(65536).len(), 4);
        assert_eq!(encode_non_negative_integer(u64::MAX).len(), 8);
        assert_eq!(decode_non_negative_integer(&[1, 0]).unwrap(), 256);
        assert_eq!(
            decode_non_negative_integer(&[1, 2, 3]),
            Err(PacketError::InvalidIntegerLength(3))
        );
    }
}
