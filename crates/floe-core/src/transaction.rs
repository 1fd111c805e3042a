use serde::{Deserialize, Serialize};

use crate::types::{InputId, NodeId, Timestamp, TxId};

// ── Transaction ──────────────────────────────────────────────────────────────

/// A transaction as seen by the DAG layer: an opaque payload plus the
/// identifiers consensus needs to order it and detect double-spends.
///
/// `input_ids` lists the resources this transaction consumes. Two
/// transactions conflict iff their input sets intersect; such a pair may
/// never appear inside the same vertex.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub tx_id: TxId,

    /// Transactions that must be accepted before this one.
    pub dependencies: Vec<TxId>,

    /// Resources consumed. Overlap with another tx's inputs is a conflict.
    pub input_ids: Vec<InputId>,
}

impl Transaction {
    pub fn new(tx_id: TxId, dependencies: Vec<TxId>, input_ids: Vec<InputId>) -> Self {
        Self {
            tx_id,
            dependencies,
            input_ids,
        }
    }
}

// ── ProposalTx ───────────────────────────────────────────────────────────────

/// Every ledger mutation that requires a two-outcome (commit/abort) decision
/// is one of these variants. The set is closed so the decision layer's
/// handling is exhaustive at compile time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalTx {
    /// Admit `node_id` to the pending validator set, activating at
    /// `start_time` and retiring at `end_time`.
    AddValidator {
        tx_id: TxId,
        node_id: NodeId,
        start_time: Timestamp,
        end_time: Timestamp,
        weight: u64,
    },

    /// Advance the chain clock to `new_time`, promoting every pending
    /// validator whose start time has arrived.
    AdvanceTime { tx_id: TxId, new_time: Timestamp },
}

impl ProposalTx {
    pub fn tx_id(&self) -> &TxId {
        match self {
            ProposalTx::AddValidator { tx_id, .. } => tx_id,
            ProposalTx::AdvanceTime { tx_id, .. } => tx_id,
        }
    }

    /// The time at which this proposal wants to take effect. This is the
    /// primary key in the scheduling heap.
    pub fn start_time(&self) -> Timestamp {
        match self {
            ProposalTx::AddValidator { start_time, .. } => *start_time,
            ProposalTx::AdvanceTime { new_time, .. } => *new_time,
        }
    }
}
