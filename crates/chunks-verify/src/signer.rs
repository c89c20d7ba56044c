//! DigestSha256 signatures: the signature value is the SHA-256 digest of the
//! packet's signed portion.

use chunks_packet::Data;

use crate::error::{Result, VerificationError};
use crate::hasher::{Hasher, Sha256Hasher};

pub struct DigestSha256;

impl DigestSha256 {
    pub fn signature_of(data: &Data) -> Vec<u8> {
        let mut hasher = Sha256Hasher::new();
        hasher.update(&data.signed_portion());
        hasher.finalize()
    }

    /// Fill in `data`'s signature value.
    pub fn sign(data: Data) -> Data {
        let signature = Self::signature_of(&data);
        data.signature_value(signature)
    }

    pub fn verify(data: &Data) -> Result<()> {
        if data.signature_value.is_empty() {
            return Err(VerificationError::MissingSignature);
        }
        let actual = Self::signature_of(data);
        if actual.as_slice() != data.signature_value.as_ref() {
            return Err(VerificationError::Mismatch {
                expected: data.signature_value.to_vec(),
                actual,
            });
        }
        Ok(())
    }
}
