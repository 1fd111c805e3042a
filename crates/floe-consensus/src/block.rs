use floe_core::types::{BlockId, Height};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Status ───────────────────────────────────────────────────────────────────

/// Lifecycle of a decision block. Terminal states are never left.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    /// Constructed, not yet verified.
    Created,
    /// Verified: candidate diffs computed, eligible for voting.
    Verified,
    /// Decided: one candidate diff committed to canonical state.
    Accepted,
    /// Decided: both candidate diffs discarded.
    Rejected,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Accepted | Status::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Verified => "Verified",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
        }
    }
}

// ── BlockKind ────────────────────────────────────────────────────────────────

/// Every block in the decision tree is one of these kinds. The set is closed
/// so that kind dispatch is exhaustive at compile time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockKind {
    Proposal,
    Commit,
    Abort,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockKind::Proposal => "Proposal",
            BlockKind::Commit => "Commit",
            BlockKind::Abort => "Abort",
        };
        write!(f, "{}", s)
    }
}

// ── Decision ─────────────────────────────────────────────────────────────────

/// The two possible resolutions of a proposal. A separate type from
/// [`BlockKind`] so that "accept with a Proposal outcome" is unrepresentable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Abort,
}

impl Decision {
    pub fn kind(&self) -> BlockKind {
        match self {
            Decision::Commit => BlockKind::Commit,
            Decision::Abort => BlockKind::Abort,
        }
    }
}

// ── BlockCore ────────────────────────────────────────────────────────────────

/// State shared by every concrete block kind, held by composition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockCore {
    pub id: BlockId,
    pub parent: BlockId,
    pub height: Height,
    pub status: Status,
}

impl BlockCore {
    pub fn new(id: BlockId, parent: BlockId, height: Height) -> Self {
        Self {
            id,
            parent,
            height,
            status: Status::Created,
        }
    }
}

// ── OptionBlock ──────────────────────────────────────────────────────────────

/// A Commit- or Abort-kind successor stub handed to the voting layer.
/// Accepting it resolves the parent proposal to this block's decision.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionBlock {
    pub core: BlockCore,
    pub decision: Decision,
    /// Advisory: whether the parent proposal prefers this outcome. Affects
    /// which branch the voting layer probes first, not validity.
    pub preferred: bool,
}

impl OptionBlock {
    pub fn new(decision: Decision, parent: BlockId, height: Height, preferred: bool) -> Self {
        Self {
            core: BlockCore::new(derive_block_id(&parent, decision.kind()), parent, height),
            decision,
            preferred,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.core.id
    }
}

// ── Id derivation ────────────────────────────────────────────────────────────

/// Deterministic child-block id: BLAKE3(parent id || kind tag). Every node
/// derives the same id for the same (parent, kind) pair without exchanging
/// bytes.
pub fn derive_block_id(parent: &BlockId, kind: BlockKind) -> BlockId {
    let tag: u8 = match kind {
        BlockKind::Proposal => 0,
        BlockKind::Commit => 1,
        BlockKind::Abort => 2,
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(&parent.0);
    hasher.update(&[tag]);
    BlockId(*hasher.finalize().as_bytes())
}
