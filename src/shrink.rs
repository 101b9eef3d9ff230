//! Shrink (C11): prune a [`Timestamp`] down to the single oldest leaf on a
//! given chain.

use crate::codec::Timestamp;
use crate::op::Op;
use crate::tree::Tree;

/// Prunes `ts` to the path ending in the earliest (lowest-height) leaf of
/// kind `chain`, discarding every other leaf and path. Ties on height are
/// broken by [`Op`]'s total order on the path. If no leaf of kind `chain`
/// exists, `ts` is returned unchanged. Idempotent.
pub fn shrink(ts: &Timestamp, chain: &str) -> Timestamp {
    let candidates: Vec<(Vec<Op>, u64)> = ts
        .tree
        .paths()
        .into_iter()
        .filter_map(|(ops, leaf)| {
            if leaf.chain() == Some(chain) {
                leaf.height().map(|h| (ops, h))
            } else {
                None
            }
        })
        .collect();

    let Some((best_ops, best_height)) = candidates
        .into_iter()
        .min_by(|(ops_a, h_a), (ops_b, h_b)| h_a.cmp(h_b).then_with(|| ops_a.cmp(ops_b)))
    else {
        return ts.clone();
    };

    let leaf = crate::leaf::Leaf::new_for_chain(chain, best_height);
    let mut new_tree = Tree::new();
    if best_ops.is_empty() {
        new_tree.leaves.insert(leaf);
    } else {
        let mut cursor = &mut new_tree;
        for op in &best_ops[..best_ops.len() - 1] {
            cursor
                .edges
                .insert(op.clone(), Box::new(Tree::new()));
            cursor = cursor.edges.get_mut(op).unwrap();
        }
        let last_op = best_ops.last().unwrap().clone();
        let mut leaf_tree = Tree::new();
        leaf_tree.leaves.insert(leaf);
        cursor.edges.insert(last_op, Box::new(leaf_tree));
    }

    Timestamp {
        version: ts.version,
        file_hash: ts.file_hash.clone(),
        tree: new_tree,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filehash::FileHash;
    use crate::filehash::HashAlgorithm;
    use crate::info;
    use crate::leaf::Leaf;

    fn ts(tree: Tree) -> Timestamp {
        Timestamp {
            version: 1,
            file_hash: FileHash::new(HashAlgorithm::Sha1, vec![0u8; 20]).unwrap(),
            tree,
        }
    }

    #[test]
    fn picks_minimum_height() {
        let mut tree = Tree::new();
        tree.leaves.insert(Leaf::Bitcoin { height: 456 });
        tree.leaves.insert(Leaf::Bitcoin { height: 123 });
        let shrunk = shrink(&ts(tree), "bitcoin");
        let paths = shrunk.tree.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].1, Leaf::Bitcoin { height: 123 });
    }

    #[test]
    fn unchanged_when_chain_absent() {
        let mut tree = Tree::new();
        tree.leaves.insert(Leaf::Pending {
            url: "https://example.com".into(),
        });
        let t = ts(tree);
        assert_eq!(shrink(&t, "bitcoin"), t);
    }

    #[test]
    fn idempotent() {
        let mut tree = Tree::new();
        tree.leaves.insert(Leaf::Bitcoin { height: 456 });
        tree.leaves.insert(Leaf::Bitcoin { height: 123 });
        let t = ts(tree);
        let once = shrink(&t, "bitcoin");
        let twice = shrink(&once, "bitcoin");
        assert_eq!(once, twice);
    }

    #[test]
    fn matches_spec_info_example() {
        let mut tree = Tree::new();
        tree.leaves.insert(Leaf::Bitcoin { height: 456 });
        tree.leaves.insert(Leaf::Bitcoin { height: 123 });
        let shrunk = shrink(&ts(tree), "bitcoin");
        assert_eq!(
            info::render(&shrunk, false),
            "msg = sha1(FILE)\nbitcoinVerify(msg, 123)"
        );
    }
}
