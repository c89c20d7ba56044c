use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("truncated TLV: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid non-negative integer length: {0}")]
    InvalidIntegerLength(usize),

    #[error("duplicate TLV element of type {0:#x}")]
    DuplicateElement(u64),

    #[error("component is not a segment number")]
    NotASegment,

    #[error("invalid name URI: {0}")]
    InvalidUri(String),
}

pub type Result<T> = std::result::Result<T, PacketError>;
