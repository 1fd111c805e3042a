use floe_core::error::FloeError;
use floe_core::types::{BlockId, NodeId, Timestamp, TxId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::block::BlockKind;

// ── Staker ───────────────────────────────────────────────────────────────────

/// One validator's stake entry in the chain state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Staker {
    pub tx_id: TxId,
    pub node_id: NodeId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub weight: u64,
}

// ── ChainState ───────────────────────────────────────────────────────────────

/// The accepted ledger state the decision layer operates on: the chain clock
/// plus the current and pending validator sets. BTreeMaps keep iteration
/// order deterministic across nodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainState {
    pub timestamp: Timestamp,
    pub current_validators: BTreeMap<TxId, Staker>,
    pub pending_validators: BTreeMap<TxId, Staker>,
}

// ── StateDiff ────────────────────────────────────────────────────────────────

/// A candidate state change layered atop a base state.
///
/// A diff is owned exclusively by the block that computed it. It never
/// aliases: at decision time it is either moved into
/// [`ChainStateManager::commit_diff`] (becoming canonical) or dropped
/// (discarded). There is no way to apply the same diff twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateDiff {
    /// New chain clock, if the proposal advances it.
    pub new_timestamp: Option<Timestamp>,
    /// Stakers entering the pending set.
    pub added_pending: Vec<Staker>,
    /// Pending stakers (by tx id) promoted into the current set.
    pub promoted: Vec<TxId>,
}

impl StateDiff {
    /// The empty diff: committing it leaves the base state unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.new_timestamp.is_none() && self.added_pending.is_empty() && self.promoted.is_empty()
    }

    fn apply(self, state: &mut ChainState) {
        if let Some(t) = self.new_timestamp {
            state.timestamp = t;
        }
        for staker in self.added_pending {
            state.pending_validators.insert(staker.tx_id, staker);
        }
        for tx_id in self.promoted {
            if let Some(staker) = state.pending_validators.remove(&tx_id) {
                state.current_validators.insert(tx_id, staker);
            }
        }
    }
}

// ── ChainStateManager ────────────────────────────────────────────────────────

/// Owns canonical chain state and the record of decided blocks.
///
/// Supplies the base state a proposal's candidate diffs layer on, and is the
/// only place a diff can be made canonical.
pub struct ChainStateManager {
    state: ChainState,
    /// Decided blocks and their kinds. A proposal may only chain off a
    /// decided Commit or Abort block.
    decided: HashMap<BlockId, BlockKind>,
    last_accepted: BlockId,
}

impl ChainStateManager {
    /// The genesis block is decided by definition and counts as Commit-kind,
    /// so the first proposal can chain off it.
    pub fn new(genesis_id: BlockId, state: ChainState) -> Self {
        let mut decided = HashMap::new();
        decided.insert(genesis_id, BlockKind::Commit);
        Self {
            state,
            decided,
            last_accepted: genesis_id,
        }
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    pub fn last_accepted(&self) -> &BlockId {
        &self.last_accepted
    }

    pub fn decided_kind(&self, id: &BlockId) -> Option<BlockKind> {
        self.decided.get(id).copied()
    }

    /// The accepted base state for a proposal chaining off `parent`.
    ///
    /// The parent must be decided and of kind Commit or Abort: a proposal may
    /// not chain directly off another pending proposal.
    pub fn base_state(&self, parent: &BlockId) -> Result<&ChainState, FloeError> {
        match self.decided.get(parent) {
            None => Err(FloeError::UnknownParent(parent.to_hex())),
            Some(BlockKind::Proposal) => {
                Err(FloeError::WrongParentKind(BlockKind::Proposal.to_string()))
            }
            Some(_) => Ok(&self.state),
        }
    }

    /// Make `diff` canonical. Consumes the diff; the caller's other candidate
    /// is dropped by the accepting block.
    pub fn commit_diff(&mut self, diff: StateDiff) {
        diff.apply(&mut self.state);
    }

    /// Record a block as decided with the given kind, making it a legal
    /// parent for future proposals.
    pub fn register_decided(&mut self, id: BlockId, kind: BlockKind) {
        if matches!(kind, BlockKind::Commit | BlockKind::Abort) {
            self.last_accepted = id;
        }
        self.decided.insert(id, kind);
        info!(block = %id, kind = %kind, "block decided");
    }
}
