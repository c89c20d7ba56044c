//! Packet model for named-data segment retrieval.
//!
//! - [`Name`] and [`Component`] with URI parsing and typed segment components
//! - [`Interest`] and [`Data`], the request/response pair a face exchanges
//! - [`SegmentContent`], the content layout carrying the integrity commitment
//! - [`tlv`], the variable-length Type-Length-Value codec underneath

pub mod tlv;

mod content;
mod data;
mod error;
mod interest;
mod name;

pub use content::SegmentContent;
pub use data::Data;
pub use error::{PacketError, Result};
pub use interest::{DEFAULT_INTEREST_LIFETIME, Interest, NackReason};
pub use name::{Component, Name};
