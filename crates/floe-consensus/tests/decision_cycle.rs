//! End-to-end decision cycle: admit a validator through one proposal, then
//! advance the chain clock through a second, promoting the validator from
//! the pending set into the current set.

use floe_consensus::{
    ChainState, ChainStateManager, ClockPolicy, Decision, ProposalBlock, StandardExecutor, Status,
};
use floe_core::transaction::ProposalTx;
use floe_core::types::{BlockId, NodeId, TxId};
use floe_sched::StartTimeHeap;

#[test]
fn validator_admission_and_promotion_cycle() {
    let genesis = BlockId::from_bytes([0u8; 32]);
    let mut mgr = ChainStateManager::new(genesis, ChainState::default());
    let mut sched = StartTimeHeap::new();
    let exec = StandardExecutor;
    let policy = ClockPolicy;

    // ── Cycle 1: propose a validator starting at t=100 ───────────────────────
    let vdr_tx = ProposalTx::AddValidator {
        tx_id: TxId::from_bytes([1u8; 32]),
        node_id: NodeId::from_bytes([1u8; 32]),
        start_time: 100,
        end_time: 10_000,
        weight: 25,
    };
    sched.add(vdr_tx.clone());

    let mut add_blk = ProposalBlock::new(genesis, 1, vdr_tx.clone());
    add_blk.verify(&mgr, &exec, &policy, &sched, 10).unwrap();

    // Start time still in the future: commit is the preferred branch.
    let [first, _] = add_blk.options().unwrap();
    assert_eq!(first.decision, Decision::Commit);

    let parent = add_blk.accept(Decision::Commit, &mut mgr).unwrap();
    assert_eq!(add_blk.status(), Status::Accepted);
    assert_eq!(mgr.state().pending_validators.len(), 1);
    assert!(mgr.state().current_validators.is_empty());

    // ── Cycle 2: advance the clock to the validator's start time ─────────────
    let advance_tx = ProposalTx::AdvanceTime {
        tx_id: TxId::from_bytes([2u8; 32]),
        new_time: 100,
    };

    let mut adv_blk = ProposalBlock::new(parent, 3, advance_tx);
    adv_blk.verify(&mgr, &exec, &policy, &sched, 100).unwrap();
    assert!(adv_blk.prefers_commit());

    adv_blk.accept(Decision::Commit, &mut mgr).unwrap();

    // The scheduled event fired: consume its heap entry.
    assert_eq!(sched.timestamp().unwrap(), 100);
    let fired = sched.pop().unwrap();
    assert_eq!(fired.tx_id(), vdr_tx.tx_id());
    assert!(sched.is_empty());

    // The validator moved from pending into current at t=100.
    assert_eq!(mgr.state().timestamp, 100);
    assert!(mgr.state().pending_validators.is_empty());
    let staker = mgr
        .state()
        .current_validators
        .get(&TxId::from_bytes([1u8; 32]))
        .expect("validator promoted");
    assert_eq!(staker.weight, 25);
    assert_eq!(staker.node_id, NodeId::from_bytes([1u8; 32]));
}

#[test]
fn aborted_cycle_leaves_state_untouched() {
    let genesis = BlockId::from_bytes([0u8; 32]);
    let mut mgr = ChainStateManager::new(genesis, ChainState::default());
    let sched = StartTimeHeap::new();

    let mut blk = ProposalBlock::new(
        genesis,
        1,
        ProposalTx::AdvanceTime {
            tx_id: TxId::from_bytes([1u8; 32]),
            new_time: 100,
        },
    );
    blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 50)
        .unwrap();

    // Local clock behind the proposal: abort is probed first.
    let [first, _] = blk.options().unwrap();
    assert_eq!(first.decision, Decision::Abort);

    let child = blk.accept(Decision::Abort, &mut mgr).unwrap();
    assert_eq!(mgr.state().timestamp, 0);

    // The next proposal chains off the abort block and still sees the
    // original base state.
    let mut retry = ProposalBlock::new(
        child,
        3,
        ProposalTx::AdvanceTime {
            tx_id: TxId::from_bytes([2u8; 32]),
            new_time: 100,
        },
    );
    retry
        .verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
        .unwrap();
    retry.accept(Decision::Commit, &mut mgr).unwrap();
    assert_eq!(mgr.state().timestamp, 100);
}
