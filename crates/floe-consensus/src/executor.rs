use floe_core::constants::MIN_VALIDATOR_WEIGHT;
use floe_core::error::FloeError;
use floe_core::transaction::ProposalTx;
use floe_core::types::Timestamp;
use floe_sched::StartTimeHeap;

use crate::state::{ChainState, Staker, StateDiff};

// ── Seams ────────────────────────────────────────────────────────────────────

/// Executes a proposal's two outcomes against a base state, producing the
/// candidate diffs a decision block carries. Implementations must be pure:
/// same inputs, same diffs, on every node.
pub trait ExecutionBackend {
    /// The state change if the proposal is committed.
    /// May consult `sched` for time-based admissibility.
    fn execute_commit(
        &self,
        tx: &ProposalTx,
        base: &ChainState,
        sched: &StartTimeHeap,
    ) -> Result<StateDiff, FloeError>;

    /// The state change if the proposal is aborted.
    fn execute_abort(&self, tx: &ProposalTx, base: &ChainState) -> Result<StateDiff, FloeError>;
}

/// Supplies the non-binding commit/abort preference for a verified proposal.
/// A hint to the voting layer about which branch to probe first; both
/// branches stay individually valid whatever this returns.
pub trait PreferencePolicy {
    fn prefers_commit(&self, tx: &ProposalTx, base: &ChainState, now: Timestamp) -> bool;
}

// ── StandardExecutor ─────────────────────────────────────────────────────────

/// The in-tree execution backend for the closed [`ProposalTx`] set.
#[derive(Default)]
pub struct StandardExecutor;

impl ExecutionBackend for StandardExecutor {
    fn execute_commit(
        &self,
        tx: &ProposalTx,
        base: &ChainState,
        sched: &StartTimeHeap,
    ) -> Result<StateDiff, FloeError> {
        match tx {
            ProposalTx::AddValidator {
                tx_id,
                node_id,
                start_time,
                end_time,
                weight,
            } => {
                if *end_time <= *start_time {
                    return Err(FloeError::InvalidProposal(
                        "end time must be after start time".into(),
                    ));
                }
                if *weight < MIN_VALIDATOR_WEIGHT {
                    return Err(FloeError::InvalidProposal(
                        "stake weight below minimum".into(),
                    ));
                }
                if *start_time <= base.timestamp {
                    return Err(FloeError::InvalidProposal(
                        "start time must be after the chain clock".into(),
                    ));
                }
                Ok(StateDiff {
                    new_timestamp: None,
                    added_pending: vec![Staker {
                        tx_id: *tx_id,
                        node_id: *node_id,
                        start_time: *start_time,
                        end_time: *end_time,
                        weight: *weight,
                    }],
                    promoted: vec![],
                })
            }

            ProposalTx::AdvanceTime { new_time, .. } => {
                if *new_time <= base.timestamp {
                    return Err(FloeError::InvalidProposal(
                        "chain clock must strictly advance".into(),
                    ));
                }
                // The clock may not skip past the next scheduled event.
                if let Ok(next_due) = sched.timestamp() {
                    if *new_time > next_due {
                        return Err(FloeError::InvalidProposal(format!(
                            "advancing to {} skips the next scheduled event at {}",
                            new_time, next_due
                        )));
                    }
                }
                let promoted = base
                    .pending_validators
                    .values()
                    .filter(|s| s.start_time <= *new_time)
                    .map(|s| s.tx_id)
                    .collect();
                Ok(StateDiff {
                    new_timestamp: Some(*new_time),
                    added_pending: vec![],
                    promoted,
                })
            }
        }
    }

    fn execute_abort(&self, _tx: &ProposalTx, _base: &ChainState) -> Result<StateDiff, FloeError> {
        // Aborting leaves the base state untouched.
        Ok(StateDiff::empty())
    }
}

// ── ClockPolicy ──────────────────────────────────────────────────────────────

/// Preference from the local wall clock.
#[derive(Default)]
pub struct ClockPolicy;

impl PreferencePolicy for ClockPolicy {
    fn prefers_commit(&self, tx: &ProposalTx, _base: &ChainState, now: Timestamp) -> bool {
        match tx {
            // Prefer committing a time advance once the proposed time has
            // actually arrived locally.
            ProposalTx::AdvanceTime { new_time, .. } => now >= *new_time,
            // Prefer admitting a validator while its start time is still in
            // the future; a stale proposal is preferred aborted.
            ProposalTx::AddValidator { start_time, .. } => now < *start_time,
        }
    }
}
