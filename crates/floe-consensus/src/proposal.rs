use floe_core::error::FloeError;
use floe_core::transaction::ProposalTx;
use floe_core::types::{BlockId, Height, Timestamp};
use floe_sched::StartTimeHeap;
use tracing::{debug, info};

use crate::block::{BlockCore, BlockKind, Decision, OptionBlock, Status};
use crate::executor::{ExecutionBackend, PreferencePolicy};
use crate::state::{ChainStateManager, StateDiff};

/// A proposal to change the chain's state, resolved by the voting layer into
/// exactly one of two outcomes.
///
/// Lifecycle: `Created → Verified → {Accepted | Rejected}`. Verification
/// computes both candidate diffs and the commit preference; acceptance
/// commits exactly one diff into canonical state and drops the other. The
/// diffs are owned by this block alone until then.
pub struct ProposalBlock {
    core: BlockCore,
    pub tx: ProposalTx,

    /// The state the chain will have if this proposal is committed.
    on_commit: Option<StateDiff>,
    /// The state the chain will have if this proposal is aborted.
    on_abort: Option<StateDiff>,
    prefers_commit: bool,
}

impl ProposalBlock {
    /// Create a proposal block chaining off `parent`, which must be a
    /// decided Commit or Abort block (checked at verification).
    pub fn new(parent: BlockId, height: Height, tx: ProposalTx) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&parent.0);
        hasher.update(&tx.tx_id().0);
        let id = BlockId(*hasher.finalize().as_bytes());

        Self {
            core: BlockCore::new(id, parent, height),
            tx,
            on_commit: None,
            on_abort: None,
            prefers_commit: false,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.core.id
    }

    pub fn parent(&self) -> &BlockId {
        &self.core.parent
    }

    pub fn height(&self) -> Height {
        self.core.height
    }

    pub fn status(&self) -> Status {
        self.core.status
    }

    /// Only meaningful once `Verified`.
    pub fn prefers_commit(&self) -> bool {
        self.prefers_commit
    }

    /// Verify this proposal against the accepted chain state.
    ///
    /// The parent must be a decided Commit or Abort block. On success the two
    /// candidate diffs and the commit preference are computed and the block
    /// becomes `Verified`. On failure nothing previously accepted is touched
    /// and the block stays `Created`.
    ///
    /// Re-verifying an already-`Verified` block is a no-op success; verifying
    /// a decided block is a caller bug.
    pub fn verify<B, P>(
        &mut self,
        mgr: &ChainStateManager,
        backend: &B,
        policy: &P,
        sched: &StartTimeHeap,
        now: Timestamp,
    ) -> Result<(), FloeError>
    where
        B: ExecutionBackend,
        P: PreferencePolicy,
    {
        match self.core.status {
            Status::Created => {}
            Status::Verified => return Ok(()),
            s => {
                return Err(FloeError::InvalidStateTransition {
                    from: s.as_str(),
                    op: "verify",
                })
            }
        }

        let base = mgr.base_state(&self.core.parent)?;
        let on_commit = backend.execute_commit(&self.tx, base, sched)?;
        let on_abort = backend.execute_abort(&self.tx, base)?;
        self.prefers_commit = policy.prefers_commit(&self.tx, base, now);

        self.on_commit = Some(on_commit);
        self.on_abort = Some(on_abort);
        self.core.status = Status::Verified;

        debug!(
            block = %self.core.id,
            tx = %self.tx.tx_id(),
            prefers_commit = self.prefers_commit,
            "proposal verified"
        );
        Ok(())
    }

    /// The two possible children of this block, in preferential order:
    /// `[Commit, Abort]` if the proposal prefers commit, `[Abort, Commit]`
    /// otherwise. The order is advisory; both children are valid.
    pub fn options(&self) -> Result<[OptionBlock; 2], FloeError> {
        if self.core.status != Status::Verified {
            return Err(FloeError::InvalidStateTransition {
                from: self.core.status.as_str(),
                op: "options",
            });
        }

        let next_height = self.core.height + 1;
        let commit = OptionBlock::new(
            Decision::Commit,
            self.core.id,
            next_height,
            self.prefers_commit,
        );
        let abort = OptionBlock::new(
            Decision::Abort,
            self.core.id,
            next_height,
            !self.prefers_commit,
        );

        if self.prefers_commit {
            Ok([commit, abort])
        } else {
            Ok([abort, commit])
        }
    }

    /// Resolve this proposal with the externally-chosen `decision`.
    ///
    /// Commits the corresponding diff into canonical state, drops the other,
    /// and registers the chosen child block as decided so the next proposal
    /// can chain off it. Returns the child's id. Calling this from any state
    /// but `Verified` is a caller bug and must be escalated.
    pub fn accept(
        &mut self,
        decision: Decision,
        mgr: &mut ChainStateManager,
    ) -> Result<BlockId, FloeError> {
        if self.core.status != Status::Verified {
            return Err(FloeError::InvalidStateTransition {
                from: self.core.status.as_str(),
                op: "accept",
            });
        }

        let chosen = match decision {
            Decision::Commit => self.on_commit.take(),
            Decision::Abort => self.on_abort.take(),
        }
        .ok_or(FloeError::InvalidStateTransition {
            from: "Verified",
            op: "accept",
        })?;

        // The losing diff is dropped here and can never be observed again.
        self.on_commit = None;
        self.on_abort = None;

        mgr.commit_diff(chosen);
        mgr.register_decided(self.core.id, BlockKind::Proposal);

        let child = self.options_child_id(decision);
        mgr.register_decided(child, decision.kind());

        self.core.status = Status::Accepted;
        info!(
            block = %self.core.id,
            tx = %self.tx.tx_id(),
            decision = %decision.kind(),
            "proposal accepted"
        );
        Ok(child)
    }

    /// Discard this proposal and both candidate diffs.
    ///
    /// Legal from `Created` (a block that never verified) or `Verified`;
    /// rejecting a decided block is a caller bug.
    pub fn reject(&mut self) -> Result<(), FloeError> {
        if self.core.status.is_terminal() {
            return Err(FloeError::InvalidStateTransition {
                from: self.core.status.as_str(),
                op: "reject",
            });
        }

        self.on_commit = None;
        self.on_abort = None;
        self.core.status = Status::Rejected;
        info!(block = %self.core.id, tx = %self.tx.tx_id(), "proposal rejected");
        Ok(())
    }

    fn options_child_id(&self, decision: Decision) -> BlockId {
        crate::block::derive_block_id(&self.core.id, decision.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ClockPolicy, StandardExecutor};
    use crate::state::ChainState;
    use floe_core::types::{NodeId, TxId};

    fn genesis() -> BlockId {
        BlockId::from_bytes([0u8; 32])
    }

    fn setup() -> (ChainStateManager, StartTimeHeap) {
        (
            ChainStateManager::new(genesis(), ChainState::default()),
            StartTimeHeap::new(),
        )
    }

    fn advance_time(id: u8, new_time: Timestamp) -> ProposalTx {
        ProposalTx::AdvanceTime {
            tx_id: TxId::from_bytes([id; 32]),
            new_time,
        }
    }

    fn add_validator(id: u8, start_time: Timestamp) -> ProposalTx {
        ProposalTx::AddValidator {
            tx_id: TxId::from_bytes([id; 32]),
            node_id: NodeId::from_bytes([id; 32]),
            start_time,
            end_time: start_time + 1000,
            weight: 10,
        }
    }

    #[test]
    fn options_order_follows_preference() {
        let (mgr, sched) = setup();
        let exec = StandardExecutor;
        let policy = ClockPolicy;

        // now >= new_time: prefers commit.
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &exec, &policy, &sched, 100).unwrap();
        assert!(blk.prefers_commit());
        let [first, second] = blk.options().unwrap();
        assert_eq!(first.decision, Decision::Commit);
        assert_eq!(second.decision, Decision::Abort);
        assert!(first.preferred);
        assert!(!second.preferred);

        // now < new_time: prefers abort.
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(2, 100));
        blk.verify(&mgr, &exec, &policy, &sched, 99).unwrap();
        assert!(!blk.prefers_commit());
        let [first, second] = blk.options().unwrap();
        assert_eq!(first.decision, Decision::Abort);
        assert_eq!(second.decision, Decision::Commit);
    }

    #[test]
    fn accept_commit_persists_exactly_the_commit_diff() {
        let (mut mgr, sched) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();

        let child = blk.accept(Decision::Commit, &mut mgr).unwrap();

        assert_eq!(blk.status(), Status::Accepted);
        assert_eq!(mgr.state().timestamp, 100);
        assert_eq!(mgr.decided_kind(&child), Some(BlockKind::Commit));
        assert_eq!(*mgr.last_accepted(), child);
    }

    #[test]
    fn accept_abort_discards_the_commit_diff() {
        let (mut mgr, sched) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();

        let child = blk.accept(Decision::Abort, &mut mgr).unwrap();

        // The commit diff was dropped: the chain clock never moved.
        assert_eq!(mgr.state().timestamp, 0);
        assert_eq!(mgr.decided_kind(&child), Some(BlockKind::Abort));
        assert_eq!(blk.status(), Status::Accepted);
    }

    #[test]
    fn accept_twice_is_an_invalid_transition() {
        let (mut mgr, sched) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();

        blk.accept(Decision::Commit, &mut mgr).unwrap();
        assert!(matches!(
            blk.accept(Decision::Commit, &mut mgr),
            Err(FloeError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn accept_before_verify_is_an_invalid_transition() {
        let (mut mgr, _) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        assert!(matches!(
            blk.accept(Decision::Commit, &mut mgr),
            Err(FloeError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn options_before_verify_is_an_invalid_transition() {
        let blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        assert!(matches!(
            blk.options(),
            Err(FloeError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn reject_discards_both_diffs() {
        let (mut mgr, sched) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();

        blk.reject().unwrap();
        assert_eq!(blk.status(), Status::Rejected);
        assert_eq!(mgr.state().timestamp, 0);

        // Terminal: neither accept nor a second reject is legal.
        assert!(matches!(
            blk.accept(Decision::Commit, &mut mgr),
            Err(FloeError::InvalidStateTransition { .. })
        ));
        assert!(matches!(
            blk.reject(),
            Err(FloeError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn reject_from_created_is_legal() {
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.reject().unwrap();
        assert_eq!(blk.status(), Status::Rejected);
    }

    #[test]
    fn verify_twice_is_a_no_op_success() {
        let (mgr, sched) = setup();
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 100));
        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();
        let before = blk.prefers_commit();

        blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100)
            .unwrap();
        assert_eq!(blk.status(), Status::Verified);
        assert_eq!(blk.prefers_commit(), before);
    }

    #[test]
    fn verify_off_a_pending_proposal_parent_fails() {
        let (mut mgr, sched) = setup();
        let pending = BlockId::from_bytes([7u8; 32]);
        mgr.register_decided(pending, BlockKind::Proposal);

        let mut blk = ProposalBlock::new(pending, 2, advance_time(1, 100));
        let err = blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100);
        assert!(matches!(err, Err(FloeError::WrongParentKind(_))));
        assert_eq!(blk.status(), Status::Created);
    }

    #[test]
    fn verify_off_an_unknown_parent_fails() {
        let (mgr, sched) = setup();
        let mut blk = ProposalBlock::new(BlockId::from_bytes([9u8; 32]), 1, advance_time(1, 100));
        assert!(matches!(
            blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 100),
            Err(FloeError::UnknownParent(_))
        ));
    }

    #[test]
    fn failed_execution_leaves_block_created_and_state_untouched() {
        let (mgr, mut sched) = setup();
        sched.add(add_validator(2, 50));

        // Advancing past the scheduled event at t=50 must fail.
        let mut blk = ProposalBlock::new(genesis(), 1, advance_time(1, 60));
        let err = blk.verify(&mgr, &StandardExecutor, &ClockPolicy, &sched, 60);
        assert!(matches!(err, Err(FloeError::InvalidProposal(_))));
        assert_eq!(blk.status(), Status::Created);
        assert_eq!(mgr.state().timestamp, 0);
    }
}
