//! Digest primitives shared by the challenge canonicalization and the signer.

use sha2::{Digest, Sha256};

/// Length in bytes of a SHA-256 digest.
pub const SHA256_LEN: usize = 32;

/// Compute the SHA-256 of the given `data`.
pub fn sha256(data: &[u8]) -> [u8; SHA256_LEN] {
    Sha256::digest(data).into()
}
