//! Integrity primitives for retrieved segments.
//!
//! - [`Hasher`] / `Sha256Hasher`: incremental hashing
//! - `DigestSha256`: packet signatures over the signed portion of a Data
//! - [`check_commitment`]: authenticate a segment against the commitment its
//!   predecessor declared
//!
//! # Example
//!
//! ```
//! use chunks_verify::{FinalMarker, check_commitment, seal_chain, split_payload};
//!
//! let prefix = "/example/file".parse().unwrap();
//! let chain = seal_chain(&prefix, split_payload(b"hello chained world", 8), FinalMarker::EverySegment);
//!
//! let declared = chain[0].parse_content().unwrap().commitment.unwrap();
//! check_commitment(&declared, &chain[1]).unwrap();
//! ```

pub use self::error::{Result, VerificationError};
pub use self::hasher::Hasher;

#[cfg(feature = "sha256")]
pub use self::chain::{FinalMarker, check_commitment, seal_chain, split_payload};
#[cfg(feature = "sha256")]
pub use self::hasher::Sha256Hasher;
#[cfg(feature = "sha256")]
pub use self::signer::DigestSha256;

#[cfg(feature = "sha256")]
mod chain;
mod error;
mod hasher;
#[cfg(feature = "sha256")]
mod signer;
