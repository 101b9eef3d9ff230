//! [`HashAlgorithm`] and [`FileHash`] — the root of a [`crate::Timestamp`].

use std::io::Read;
use std::io::Write;

use crate::error::CodecError;
use crate::error::ValidationError;
use crate::hash;

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;

/// One of the four hash algorithms a [`FileHash`] (or a hash [`crate::op::Op`])
/// may use. Tags match the corresponding `Op` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HashAlgorithm {
    Sha1,
    Ripemd160,
    Sha256,
    Keccak256,
}

impl HashAlgorithm {
    /// Wire tag for this algorithm, shared with the corresponding hash `Op`.
    pub const fn tag(self) -> u8 {
        match self {
            HashAlgorithm::Sha1 => 0x02,
            HashAlgorithm::Ripemd160 => 0x03,
            HashAlgorithm::Sha256 => 0x08,
            HashAlgorithm::Keccak256 => 0x67,
        }
    }

    /// Parses a tag byte into a [`HashAlgorithm`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x02 => Some(HashAlgorithm::Sha1),
            0x03 => Some(HashAlgorithm::Ripemd160),
            0x08 => Some(HashAlgorithm::Sha256),
            0x67 => Some(HashAlgorithm::Keccak256),
            _ => None,
        }
    }

    /// Digest length in bytes for this algorithm.
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => hash::SHA1_LEN,
            HashAlgorithm::Ripemd160 => hash::RIPEMD160_LEN,
            HashAlgorithm::Sha256 => hash::SHA256_LEN,
            HashAlgorithm::Keccak256 => hash::KECCAK256_LEN,
        }
    }

    /// Lowercase name used in `info` rendering (e.g. `sha256(FILE)`).
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Ripemd160 => "ripemd160",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Keccak256 => "keccak256",
        }
    }

    /// Computes the digest of `msg` under this algorithm.
    pub fn digest(self, msg: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => hash::sha1(msg),
            HashAlgorithm::Ripemd160 => hash::ripemd160(msg),
            HashAlgorithm::Sha256 => hash::sha256(msg),
            HashAlgorithm::Keccak256 => hash::keccak256(msg),
        }
    }
}

/// A hashed representation of the original file: algorithm plus digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileHash {
    pub algorithm: HashAlgorithm,
    pub value: Vec<u8>,
}

impl FileHash {
    /// Builds a `FileHash`, checking the value length matches the algorithm.
    pub fn new(algorithm: HashAlgorithm, value: Vec<u8>) -> Result<Self, ValidationError> {
        if value.len() != algorithm.digest_len() {
            return Err(ValidationError::WrongDigestLength {
                algorithm: algorithm.name(),
                expected: algorithm.digest_len(),
                actual: value.len(),
            });
        }
        Ok(FileHash { algorithm, value })
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&[self.algorithm.tag()])?;
        writer.write_all(&self.value)
    }

    pub(crate) fn read<R: Read>(reader: &mut R, offset: &mut usize) -> Result<Self, CodecError> {
        let mut tag = [0u8; 1];
        reader
            .read_exact(&mut tag)
            .map_err(|_| CodecError::Truncated {
                offset: *offset,
                context: "FileHash tag",
            })?;
        *offset += 1;
        let algorithm =
            HashAlgorithm::from_tag(tag[0]).ok_or(CodecError::UnknownHashAlgorithm {
                tag: tag[0],
                offset: *offset - 1,
            })?;
        let mut value = vec![0u8; algorithm.digest_len()];
        reader
            .read_exact(&mut value)
            .map_err(|_| CodecError::Truncated {
                offset: *offset,
                context: "FileHash value",
            })?;
        *offset += value.len();
        Ok(FileHash { algorithm, value })
    }
}
