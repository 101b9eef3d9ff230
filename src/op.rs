//! [`Op`] — the closed set of message transforms that label a [`crate::tree::Tree`]'s edges.

use crate::error::ValidationError;
use crate::filehash::HashAlgorithm;

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;

/// A message-transforming operation. Unary ops carry a payload; the rest
/// are nullary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    Append(Vec<u8>),
    Prepend(Vec<u8>),
    Reverse,
    Hexlify,
    Sha1,
    Ripemd160,
    Sha256,
    Keccak256,
}

impl Op {
    /// Wire tag for this op.
    pub const fn tag(&self) -> u8 {
        match self {
            Op::Append(_) => 0xF0,
            Op::Prepend(_) => 0xF1,
            Op::Reverse => 0xF2,
            Op::Hexlify => 0xF3,
            Op::Sha1 => 0x02,
            Op::Ripemd160 => 0x03,
            Op::Sha256 => 0x08,
            Op::Keccak256 => 0x67,
        }
    }

    /// Builds a hash `Op` for `algorithm`.
    pub const fn from_hash_algorithm(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha1 => Op::Sha1,
            HashAlgorithm::Ripemd160 => Op::Ripemd160,
            HashAlgorithm::Sha256 => Op::Sha256,
            HashAlgorithm::Keccak256 => Op::Keccak256,
        }
    }

    /// The unary payload, if this is `Append`/`Prepend`.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Op::Append(p) | Op::Prepend(p) => Some(p),
            _ => None,
        }
    }

    /// Checks the 1..=4096 byte payload-length constraint the codec
    /// enforces on write for unary ops.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(payload) = self.payload() {
            if payload.is_empty() || payload.len() > 4096 {
                return Err(ValidationError::PayloadLengthOutOfRange { len: payload.len() });
            }
        }
        Ok(())
    }

    /// Applies this op's semantics to `msg`, returning the transformed message.
    pub fn apply(&self, msg: &[u8]) -> Vec<u8> {
        match self {
            Op::Append(payload) => {
                let mut out = Vec::with_capacity(msg.len() + payload.len());
                out.extend_from_slice(msg);
                out.extend_from_slice(payload);
                out
            }
            Op::Prepend(payload) => {
                let mut out = Vec::with_capacity(msg.len() + payload.len());
                out.extend_from_slice(payload);
                out.extend_from_slice(msg);
                out
            }
            Op::Reverse => msg.iter().rev().copied().collect(),
            Op::Hexlify => hex::encode(msg).into_bytes(),
            Op::Sha1 => crate::hash::sha1(msg),
            Op::Ripemd160 => crate::hash::ripemd160(msg),
            Op::Sha256 => crate::hash::sha256(msg),
            Op::Keccak256 => crate::hash::keccak256(msg),
        }
    }
}

/// Ops order by tag, then payload lexicographically — this total order is
/// also the serialization order for a [`crate::tree::Tree`]'s edges.
impl PartialOrd for Op {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Op {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tag()
            .cmp(&other.tag())
            .then_with(|| self.payload().cmp(&other.payload()))
    }
}
