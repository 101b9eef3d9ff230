//! Structural well-formedness checks (C6) for an in-memory [`Timestamp`],
//! independent of whether it arrived via the codec or was built by hand.

use crate::codec::Timestamp;
use crate::codec::CURRENT_VERSION;
use crate::error::ValidationError;
use crate::tree::Tree;

/// Checks `ts` is well-formed: supported version, a FileHash whose value
/// length matches its algorithm, and a tree with no empty sub-tree at any
/// position (including the top level).
pub fn validate(ts: &Timestamp) -> Result<(), ValidationError> {
    if ts.version != CURRENT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: ts.version,
        });
    }
    if ts.file_hash.value.len() != ts.file_hash.algorithm.digest_len() {
        return Err(ValidationError::WrongDigestLength {
            algorithm: ts.file_hash.algorithm.name(),
            expected: ts.file_hash.algorithm.digest_len(),
            actual: ts.file_hash.value.len(),
        });
    }
    validate_tree(&ts.tree, true)
}

fn validate_tree(tree: &Tree, is_top: bool) -> Result<(), ValidationError> {
    if tree.is_empty() {
        if is_top {
            // An empty top-level tree is a legal in-memory value (it's only
            // illegal to *read* one back from the wire); callers that need
            // the wire invariant should check this explicitly.
            return Ok(());
        }
        return Err(ValidationError::EmptyNestedTree);
    }
    for (op, subtree) in &tree.edges {
        op.validate()?;
        validate_tree(subtree, false)?;
    }
    Ok(())
}
