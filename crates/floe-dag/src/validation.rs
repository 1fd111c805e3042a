use floe_core::constants::{MAX_VERTEX_PARENTS, MAX_VERTEX_TXS};
use floe_core::error::FloeError;
use floe_core::transaction::Transaction;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::conflict::has_conflict;
use crate::vertex::Vertex;

/// Canonical ordering of transactions inside a vertex: ascending by tx id.
pub fn cmp_tx(a: &Transaction, b: &Transaction) -> Ordering {
    a.tx_id.cmp(&b.tx_id)
}

/// Sort a transaction slice into canonical order. Builders use this before
/// assembling a vertex; verification only ever checks, never sorts.
pub fn sort_txs(txs: &mut [Transaction]) {
    txs.sort_by(cmp_tx);
}

/// Verify a vertex's structural invariants before it may enter consensus.
///
/// Checks (in order):
/// 1. Parent count within bounds
/// 2. Parent ids pairwise distinct
/// 3. Parent ids strictly ascending
/// 4. Transaction list non-empty and within bounds
/// 5. Transactions pairwise distinct by id
/// 6. Transactions strictly ascending by id
/// 7. No two transactions share an input id
///
/// Every independent node runs the same checks on the same bytes and reaches
/// the same verdict; nothing here consults local state or the clock.
///
/// Distinctness is checked before ordering so that a duplicate is always
/// reported as a duplicate, even though strict ascending order would also
/// catch it.
pub fn verify_vertex(vtx: &Vertex) -> Result<(), FloeError> {
    // ── 1. Parent count ──────────────────────────────────────────────────────
    if vtx.parent_ids.len() > MAX_VERTEX_PARENTS {
        return Err(FloeError::TooManyParents {
            max: MAX_VERTEX_PARENTS,
            got: vtx.parent_ids.len(),
        });
    }

    // ── 2. Parents pairwise distinct ─────────────────────────────────────────
    let mut seen_parents = HashSet::with_capacity(vtx.parent_ids.len());
    for pid in &vtx.parent_ids {
        if !seen_parents.insert(pid) {
            return Err(FloeError::DuplicateParent(pid.to_hex()));
        }
    }

    // ── 3. Parents strictly ascending ────────────────────────────────────────
    if vtx.parent_ids.windows(2).any(|w| w[0] >= w[1]) {
        return Err(FloeError::UnsortedParents);
    }

    // ── 4. Transaction count ─────────────────────────────────────────────────
    if vtx.txs.is_empty() {
        return Err(FloeError::NoTransactions);
    }
    if vtx.txs.len() > MAX_VERTEX_TXS {
        return Err(FloeError::TooManyTransactions {
            max: MAX_VERTEX_TXS,
            got: vtx.txs.len(),
        });
    }

    // ── 5. Transactions pairwise distinct ────────────────────────────────────
    let mut seen_txs = HashSet::with_capacity(vtx.txs.len());
    for tx in &vtx.txs {
        if !seen_txs.insert(tx.tx_id) {
            return Err(FloeError::DuplicateTransaction(tx.tx_id.to_hex()));
        }
    }

    // ── 6. Transactions strictly ascending by id ─────────────────────────────
    if vtx.txs.windows(2).any(|w| cmp_tx(&w[0], &w[1]) != Ordering::Less) {
        return Err(FloeError::UnsortedTransactions);
    }

    // ── 7. No shared inputs across transactions ──────────────────────────────
    if has_conflict(&vtx.txs) {
        return Err(FloeError::ConflictingTransactions);
    }

    Ok(())
}
