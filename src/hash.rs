//! Digest primitives backing [`crate::op::Op`]'s hash variants and
//! [`crate::filehash::HashAlgorithm`].
//!
//! Each algorithm gets a thin wrapper around a RustCrypto `Digest` impl so
//! callers never need to depend on the underlying crates directly.

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use sha3::Keccak256;

/// SHA1 digest length in bytes.
pub const SHA1_LEN: usize = 20;
/// RIPEMD160 digest length in bytes.
pub const RIPEMD160_LEN: usize = 20;
/// SHA256 digest length in bytes.
pub const SHA256_LEN: usize = 32;
/// KECCAK256 digest length in bytes.
pub const KECCAK256_LEN: usize = 32;

/// Computes the SHA1 digest of `msg`.
pub fn sha1(msg: &[u8]) -> Vec<u8> {
    Sha1::digest(msg).to_vec()
}

/// Computes the RIPEMD160 digest of `msg`.
pub fn ripemd160(msg: &[u8]) -> Vec<u8> {
    Ripemd160::digest(msg).to_vec()
}

/// Computes the SHA256 digest of `msg`.
pub fn sha256(msg: &[u8]) -> Vec<u8> {
    Sha256::digest(msg).to_vec()
}

/// Computes the KECCAK256 digest of `msg`.
pub fn keccak256(msg: &[u8]) -> Vec<u8> {
    Keccak256::digest(msg).to_vec()
}
