//! Predicates (C7) classifying a [`Timestamp`] as verifiable, upgradable
//! or shrinkable.

use crate::codec::Timestamp;

/// True iff at least one non-pending leaf exists in `ts`'s tree.
pub fn can_verify(ts: &Timestamp) -> bool {
    ts.tree
        .paths()
        .iter()
        .any(|(_, leaf)| !leaf.is_pending())
}

/// True iff at least one pending leaf exists in `ts`'s tree.
pub fn can_upgrade(ts: &Timestamp) -> bool {
    ts.tree.paths().iter().any(|(_, leaf)| leaf.is_pending())
}

/// True iff `ts` has at least one leaf of kind `chain`, total leaf count is
/// at least 2, and at least one other leaf (of any kind) exists.
pub fn can_shrink(ts: &Timestamp, chain: &str) -> bool {
    let paths = ts.tree.paths();
    if paths.len() < 2 {
        return false;
    }
    paths.iter().any(|(_, leaf)| leaf.chain() == Some(chain))
}
