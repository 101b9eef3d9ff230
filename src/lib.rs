//! A library for creating, serializing, transforming and verifying
//! OpenTimestamps proofs.
//!
//! An OpenTimestamps [`Timestamp`] is a Merkle-style proof tree rooted at a
//! [`FileHash`]: each path from the root folds a sequence of [`Op`]
//! transforms over the hash and ends in a [`Leaf`] attestation (a pending
//! calendar, or a blockchain block height). The four pure transforms —
//! [`validate`], the [`predicate`] checks, [`shrink`] and [`info`] — never
//! touch the network; [`submit`], [`upgrade`] and [`verify`] do, fanning
//! out concurrently over a pluggable [`calendar::CalendarClient`] /
//! [`verify::BoxVerifier`] collaborator.

pub mod calendar;
pub mod codec;
pub mod config;
pub mod error;
pub mod filehash;
pub mod hash;
pub mod info;
pub mod leaf;
pub mod op;
pub mod predicate;
pub mod shrink;
pub mod submit;
pub mod tree;
pub mod upgrade;
pub mod validate;
pub mod varint;
pub mod verify;

pub use calendar::CalendarClient;
#[cfg(feature = "client")]
pub use calendar::ReqwestCalendarClient;
pub use codec::Timestamp;
pub use error::CodecError;
pub use error::LogicError;
pub use error::NetworkError;
pub use error::OtsError;
pub use error::ValidationError;
pub use error::VerifierError;
pub use filehash::FileHash;
pub use filehash::HashAlgorithm;
pub use leaf::Leaf;
pub use op::Op;
pub use predicate::can_shrink;
pub use predicate::can_upgrade;
pub use predicate::can_verify;
pub use shrink::shrink;
pub use submit::submit;
pub use submit::SubmitOutcome;
pub use tree::Tree;
pub use upgrade::upgrade;
pub use upgrade::UpgradeOutcome;
pub use validate::validate;
pub use verify::verify;
pub use verify::BoxVerifier;
pub use verify::VerifyOutcome;
