use floe_core::error::FloeError;
use floe_core::transaction::ProposalTx;
use floe_core::types::{Timestamp, TxId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Heap key: ascending start time, ties broken by ascending tx id.
///
/// The tie-break makes the ordering a strict total order — two distinct
/// proposals never compare equal — which is what lets independent nodes
/// consume the same pending set in the same order.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct HeapKey(Timestamp, TxId);

struct HeapEntry {
    key: Reverse<HeapKey>,
    tx: ProposalTx,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of pending proposals keyed by scheduled activation time.
///
/// Drives time-based decision cycles: `peek`/`timestamp` tell the decision
/// layer when the next event is due; `pop` consumes it once a cycle fires.
#[derive(Default)]
pub struct StartTimeHeap {
    entries: BinaryHeap<HeapEntry>,
}

impl StartTimeHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a proposal. O(log n); never fails.
    pub fn add(&mut self, tx: ProposalTx) {
        let key = HeapKey(tx.start_time(), *tx.tx_id());
        self.entries.push(HeapEntry {
            key: Reverse(key),
            tx,
        });
    }

    /// The entry with the smallest (start time, tx id) key, without removal.
    pub fn peek(&self) -> Result<&ProposalTx, FloeError> {
        self.entries
            .peek()
            .map(|e| &e.tx)
            .ok_or(FloeError::EmptyHeap)
    }

    /// Remove and return the entry `peek` would return.
    pub fn pop(&mut self) -> Result<ProposalTx, FloeError> {
        self.entries
            .pop()
            .map(|e| e.tx)
            .ok_or(FloeError::EmptyHeap)
    }

    /// Start time of the current minimum entry.
    pub fn timestamp(&self) -> Result<Timestamp, FloeError> {
        Ok(self.peek()?.start_time())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard the current contents and rebuild from `entries`. Used after a
    /// reorganization invalidates the pending set wholesale.
    pub fn rebuild<I: IntoIterator<Item = ProposalTx>>(&mut self, entries: I) {
        self.entries.clear();
        for tx in entries {
            self.add(tx);
        }
    }
}
