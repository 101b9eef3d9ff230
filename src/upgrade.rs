//! Upgrade (C10): replace each `pending` leaf with whatever the calendar
//! now has to offer, fanned out concurrently with `futures::future::join_all`
//! exactly like [`crate::submit`].

use std::collections::BTreeMap;

use crate::calendar::CalendarClient;
use crate::codec;
use crate::codec::Timestamp;
use crate::config::UpgradeOptions;
use crate::error::NetworkError;
use crate::leaf::Leaf;
use crate::op::Op;
use crate::tree::Tree;

/// One pending leaf's upgrade attempt failing, keyed by the calendar URL it
/// was waiting on.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("calendar {url} sent an unparseable tree: {source}")]
    Codec {
        url: String,
        source: crate::error::CodecError,
    },
}

/// Result of [`upgrade`]: a new timestamp with every successfully-upgraded
/// pending leaf grafted in, plus one error per leaf that couldn't be
/// upgraded this round.
#[derive(Debug)]
pub struct UpgradeOutcome {
    pub timestamp: Timestamp,
    pub errors: Vec<(String, UpgradeError)>,
    /// Number of pending leaves successfully replaced.
    pub upgraded: usize,
}

/// Walks every `pending` leaf in `ts`, fetches its calendar's current
/// timestamp for the leaf's path message, and grafts the result in place
/// of the leaf. Leaves whose calendar call fails are left untouched and
/// their error recorded.
pub async fn upgrade(
    client: &dyn CalendarClient,
    ts: &Timestamp,
    options: UpgradeOptions,
) -> UpgradeOutcome {
    // Keyed by (path, url): a path can carry more than one pending leaf
    // (e.g. two calendars pending at the root), each needing its own
    // independent replacement.
    let pending_paths: Vec<(Vec<Op>, String)> = ts
        .tree
        .paths()
        .into_iter()
        .filter_map(|(ops, leaf)| match leaf {
            Leaf::Pending { url } => Some((ops, url)),
            _ => None,
        })
        .collect();

    let requests = pending_paths.iter().map(|(ops, url)| {
        let msg = crate::tree::apply_ops(&ts.file_hash.value, ops);
        async move {
            let result = client.get_timestamp(url, &msg, options.timeout).await;
            (ops.clone(), url.clone(), result)
        }
    });

    let responses = futures::future::join_all(requests).await;

    let mut replacements: BTreeMap<(Vec<Op>, String), Tree> = BTreeMap::new();
    let mut errors = Vec::new();
    for (ops, url, result) in responses {
        match result {
            Ok(body) => match codec::read_bare_tree(&body) {
                Ok(subtree) => {
                    log::info!("calendar {url} upgraded a pending leaf");
                    replacements.insert((ops, url), subtree);
                }
                Err(source) => {
                    log::warn!("calendar {url} sent an unparseable upgrade tree: {source}");
                    errors.push((url.clone(), UpgradeError::Codec { url, source }));
                }
            },
            Err(err) => {
                log::warn!("upgrade request to {url} failed: {err}");
                errors.push((url, UpgradeError::Network(err)));
            }
        }
    }

    let upgraded = replacements.len();
    let new_tree = graft(&ts.tree, &[], &replacements);

    UpgradeOutcome {
        timestamp: Timestamp {
            version: ts.version,
            file_hash: ts.file_hash.clone(),
            tree: new_tree,
        },
        errors,
        upgraded,
    }
}

/// Rebuilds `tree`, replacing each pending leaf reached by `(path, url)` in
/// `replacements` with its replacement sub-tree. Distinct pending leaves
/// sharing a path (different calendar URLs) are looked up independently.
fn graft(tree: &Tree, path: &[Op], replacements: &BTreeMap<(Vec<Op>, String), Tree>) -> Tree {
    let mut out = Tree::new();
    for (op, subtree) in &tree.edges {
        let mut child_path = path.to_vec();
        child_path.push(op.clone());
        let grafted = graft(subtree, &child_path, replacements);
        out.incorporate(op.clone(), grafted);
    }
    for leaf in &tree.leaves {
        if let Leaf::Pending { url } = leaf {
            if let Some(replacement) = replacements.get(&(path.to_vec(), url.clone())) {
                out = out.union(replacement);
                continue;
            }
        }
        out.leaves.insert(leaf.clone());
    }
    out
}
