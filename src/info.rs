//! Info printer (C8): deterministic human-readable rendering of a
//! [`Timestamp`]. One line per op/leaf; siblings beyond the first at a
//! level are indented and prefixed with ` -> `. This is a format
//! contract — every payload byte is rendered lowercase hex with no
//! separators, matching [`crate::hash`]'s digest rendering convention.

use crate::codec::Timestamp;
use crate::leaf::Leaf;
use crate::op::Op;
use crate::tree::Tree;

/// Renders `ts` as the deterministic `info` text. In verbose mode, a
/// leading `# version: <n>` line is emitted and every `msg = ...` line is
/// followed by a continuation line with the resulting message's hex.
pub fn render(ts: &Timestamp, verbose: bool) -> String {
    let mut out = Vec::new();
    if verbose {
        out.push(format!("# version: {}", ts.version));
    }
    out.push(format!("msg = {}(FILE)", ts.file_hash.algorithm.name()));
    if verbose {
        out.push(format!("  = {}", hex::encode(&ts.file_hash.value)));
    }
    render_tree(&ts.tree, &ts.file_hash.value, "", verbose, &mut out);
    out.join("\n")
}

fn render_tree(tree: &Tree, msg: &[u8], indent: &str, verbose: bool, out: &mut Vec<String>) {
    let mut first = true;
    for (op, subtree) in &tree.edges {
        render_edge(op, subtree, msg, indent, verbose, first, out);
        first = false;
    }
    for leaf in &tree.leaves {
        render_leaf(leaf, indent, first, out);
        first = false;
    }
}

fn render_edge(
    op: &Op,
    subtree: &Tree,
    msg: &[u8],
    indent: &str,
    verbose: bool,
    is_first: bool,
    out: &mut Vec<String>,
) {
    let stmt = format!("msg = {}", op_call(op));
    push_line(out, indent, is_first, &stmt);
    let new_msg = op.apply(msg);
    if verbose {
        out.push(format!("{indent}  = {}", hex::encode(&new_msg)));
    }
    let child_indent = if is_first {
        indent.to_string()
    } else {
        format!("{indent}    ")
    };
    render_tree(subtree, &new_msg, &child_indent, verbose, out);
}

fn render_leaf(leaf: &Leaf, indent: &str, is_first: bool, out: &mut Vec<String>) {
    let stmt = match leaf {
        Leaf::Bitcoin { height } => format!("bitcoinVerify(msg, {height})"),
        Leaf::Litecoin { height } => format!("litecoinVerify(msg, {height})"),
        Leaf::Ethereum { height } => format!("ethereumVerify(msg, {height})"),
        Leaf::Pending { url } => format!("pendingVerify(msg, {url})"),
        Leaf::Unknown { tag, payload } => {
            format!("unknownVerify(msg, {}, {})", hex::encode(tag), hex::encode(payload))
        }
    };
    push_line(out, indent, is_first, &stmt);
}

fn push_line(out: &mut Vec<String>, indent: &str, is_first: bool, stmt: &str) {
    if is_first {
        out.push(format!("{indent}{stmt}"));
    } else {
        out.push(format!("{indent} -> {stmt}"));
    }
}

fn op_call(op: &Op) -> String {
    match op {
        Op::Append(payload) => format!("append(msg, {})", hex::encode(payload)),
        Op::Prepend(payload) => format!("prepend(msg, {})", hex::encode(payload)),
        Op::Reverse => "reverse(msg)".to_string(),
        Op::Hexlify => "hexlify(msg)".to_string(),
        Op::Sha1 => "sha1(msg)".to_string(),
        Op::Ripemd160 => "ripemd160(msg)".to_string(),
        Op::Sha256 => "sha256(msg)".to_string(),
        Op::Keccak256 => "keccak256(msg)".to_string(),
    }
}
