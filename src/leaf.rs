//! [`Leaf`] — the closed set of terminal attestations a [`crate::tree::Tree`] path ends in.

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;

/// The 8-byte magic prefixing each leaf kind's record on the wire.
pub mod magic {
    pub const PENDING: [u8; 8] = *b"\x83\xdf\xe3\x0d\x2e\xf9\x0c\x8e";
    pub const BITCOIN: [u8; 8] = *b"\x05\x88\x96\x0d\x73\xd7\x19\x01";
    pub const LITECOIN: [u8; 8] = *b"\x06\x86\x9a\x0d\x73\xd7\x1b\x45";
    pub const ETHEREUM: [u8; 8] = *b"\x30\xfe\x80\x87\xb5\xc7\xea\xd7";
}

/// A terminal attestation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Leaf {
    /// A calendar that owes an upgrade.
    Pending { url: String },
    /// Expect the path message to equal the Bitcoin block Merkle root at `height`.
    Bitcoin { height: u64 },
    /// Same, for Litecoin.
    Litecoin { height: u64 },
    /// Same, for Ethereum.
    Ethereum { height: u64 },
    /// Preserve-through-roundtrip unknown attestation.
    Unknown { tag: [u8; 8], payload: Vec<u8> },
}

impl Leaf {
    /// The 8-byte wire magic for this leaf's kind.
    pub fn magic(&self) -> [u8; 8] {
        match self {
            Leaf::Pending { .. } => magic::PENDING,
            Leaf::Bitcoin { .. } => magic::BITCOIN,
            Leaf::Litecoin { .. } => magic::LITECOIN,
            Leaf::Ethereum { .. } => magic::ETHEREUM,
            Leaf::Unknown { tag, .. } => *tag,
        }
    }

    /// True for any non-[`Leaf::Pending`] variant — these are the leaves
    /// [`crate::predicate::can_verify`] looks for.
    pub fn is_pending(&self) -> bool {
        matches!(self, Leaf::Pending { .. })
    }

    /// The chain name this leaf attests to, if it's a blockchain leaf
    /// (`"bitcoin"`, `"litecoin"`, `"ethereum"`).
    pub fn chain(&self) -> Option<&'static str> {
        match self {
            Leaf::Bitcoin { .. } => Some("bitcoin"),
            Leaf::Litecoin { .. } => Some("litecoin"),
            Leaf::Ethereum { .. } => Some("ethereum"),
            _ => None,
        }
    }

    /// The attested block height, if this is a blockchain leaf.
    pub fn height(&self) -> Option<u64> {
        match self {
            Leaf::Bitcoin { height } | Leaf::Litecoin { height } | Leaf::Ethereum { height } => {
                Some(*height)
            }
            _ => None,
        }
    }

    /// Builds the blockchain leaf for `chain` (`"bitcoin"`, `"litecoin"` or
    /// `"ethereum"`) at `height`. Panics on an unrecognized chain name —
    /// callers only reach this after having already matched `chain()`
    /// against one of these three names.
    pub fn new_for_chain(chain: &str, height: u64) -> Self {
        match chain {
            "bitcoin" => Leaf::Bitcoin { height },
            "litecoin" => Leaf::Litecoin { height },
            "ethereum" => Leaf::Ethereum { height },
            other => panic!("unrecognized chain name: {other}"),
        }
    }
}

/// Leaves order by magic, then kind-specific attributes — this total order
/// gives deterministic serialization and `info` iteration.
impl PartialOrd for Leaf {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Leaf {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.magic().cmp(&other.magic()).then_with(|| {
            use Leaf::*;
            match (self, other) {
                (Pending { url: a }, Pending { url: b }) => a.cmp(b),
                (Bitcoin { height: a }, Bitcoin { height: b }) => a.cmp(b),
                (Litecoin { height: a }, Litecoin { height: b }) => a.cmp(b),
                (Ethereum { height: a }, Ethereum { height: b }) => a.cmp(b),
                (
                    Unknown {
                        payload: a,
                        tag: ta,
                    },
                    Unknown {
                        payload: b,
                        tag: tb,
                    },
                ) => ta.cmp(tb).then_with(|| a.cmp(b)),
                _ => std::cmp::Ordering::Equal,
            }
        })
    }
}
