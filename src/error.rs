//! Error kinds raised by the codec, validation, network and verifier layers.
//!
//! Pure operations (codec, validation, predicates, shrink, info, the tree
//! walk inside verify) raise immediately on the first failure. Batched
//! network operations (submit, upgrade, verify) never raise for a single
//! item's failure; those are collected into an `errors` map/list instead
//! and never appear as an [`OtsError`].

use thiserror::Error;

/// Truncation, garbage-at-EOF, unknown-but-required tag, oversized length.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("truncated input at byte offset {offset}: expected {context}")]
    Truncated { offset: usize, context: &'static str },

    #[error("garbage at EOF: {remaining} unread byte(s) after offset {offset}")]
    GarbageAtEof { offset: usize, remaining: usize },

    #[error("unknown edge tag 0x{tag:02x} at byte offset {offset}")]
    UnknownOpTag { tag: u8, offset: usize },

    #[error("unsupported timestamp version {version}")]
    UnsupportedVersion { version: u64 },

    #[error("varint at byte offset {offset} exceeds maximum length")]
    VarIntTooLong { offset: usize },

    #[error("VARBYTES length {len} at byte offset {offset} exceeds the implementation limit of {limit}")]
    LengthTooLarge { len: u64, offset: usize, limit: u64 },

    #[error("empty tree at byte offset {offset}: at least one record is required")]
    EmptyTree { offset: usize },

    #[error("unsupported file hash algorithm tag 0x{tag:02x} at byte offset {offset}")]
    UnknownHashAlgorithm { tag: u8, offset: usize },
}

/// Structural well-formedness failures for an in-memory [`crate::Timestamp`].
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("file hash value has length {actual}, expected {expected} for algorithm {algorithm}")]
    WrongDigestLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported timestamp version {version}")]
    UnsupportedVersion { version: u64 },

    #[error("empty sub-tree reachable via an edge: every edge must lead somewhere")]
    EmptyNestedTree,

    #[error("append/prepend payload length {len} is outside the 1..=4096 byte range")]
    PayloadLengthOutOfRange { len: usize },
}

/// Transport failures: timeout, DNS, TLS, non-2xx HTTP.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("calendar {url} returned HTTP {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("transport error talking to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A blockchain lookup returned an error or an inconsistent response.
#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("verifier {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// Invariant violations in the pure transforms, e.g. shrinking a chain that
/// isn't present.
#[derive(Error, Debug)]
pub enum LogicError {
    #[error("cannot shrink: no leaf of chain {chain} is reachable in this timestamp")]
    NoSuchChain { chain: &'static str },
}

/// The union of every error kind a pure (non-batched) operation can raise.
#[derive(Error, Debug)]
pub enum OtsError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    #[error(transparent)]
    Logic(#[from] LogicError),
}
