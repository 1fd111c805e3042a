use floe_core::transaction::Transaction;
use floe_core::types::InputId;
use std::collections::HashSet;

/// Returns true if any two *distinct* transactions in `txs` consume the same
/// input (a double-spend within one structural unit).
///
/// A transaction listing the same input twice does not conflict with itself;
/// only cross-transaction overlap counts. O(total input ids) with a single
/// hash-set sweep. Pure: no mutation, deterministic.
pub fn has_conflict(txs: &[Transaction]) -> bool {
    let mut seen: HashSet<InputId> = HashSet::new();
    for tx in txs {
        let mut own: HashSet<InputId> = HashSet::new();
        for input in &tx.input_ids {
            if !own.insert(*input) {
                continue;
            }
            if !seen.insert(*input) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::types::{InputId, TxId};

    fn tx(id: u8, inputs: &[u8]) -> Transaction {
        Transaction::new(
            TxId::from_bytes([id; 32]),
            vec![],
            inputs
                .iter()
                .map(|b| InputId::from_bytes([*b; 32]))
                .collect(),
        )
    }

    #[test]
    fn disjoint_inputs_do_not_conflict() {
        let txs = vec![tx(1, &[10, 11]), tx(2, &[12, 13])];
        assert!(!has_conflict(&txs));
    }

    #[test]
    fn shared_input_conflicts() {
        let txs = vec![tx(1, &[10, 11]), tx(2, &[11, 12])];
        assert!(has_conflict(&txs));
    }

    #[test]
    fn repeated_input_within_one_tx_is_not_a_conflict() {
        let txs = vec![tx(1, &[10, 10]), tx(2, &[11])];
        assert!(!has_conflict(&txs));
    }

    #[test]
    fn empty_and_singleton_sets_never_conflict() {
        assert!(!has_conflict(&[]));
        assert!(!has_conflict(&[tx(1, &[10])]));
        assert!(!has_conflict(&[tx(1, &[])]));
    }

    #[test]
    fn conflict_detected_across_non_adjacent_txs() {
        let txs = vec![tx(1, &[10]), tx(2, &[20]), tx(3, &[10])];
        assert!(has_conflict(&txs));
    }
}
