//! floe-consensus
//!
//! The two-outcome decision protocol: a proposal block is verified against
//! the accepted chain state, exposes a Commit and an Abort successor to the
//! voting layer, and on acceptance commits exactly one of its two candidate
//! state diffs into canonical state.
//!
//! Everything here is synchronous and single-context: the caller serializes
//! all mutation behind one lock per consensus instance. `&mut self` is the
//! only exclusivity these types assume.

pub mod block;
pub mod executor;
pub mod proposal;
pub mod state;

pub use block::{BlockCore, BlockKind, Decision, OptionBlock, Status};
pub use executor::{ClockPolicy, ExecutionBackend, PreferencePolicy, StandardExecutor};
pub use proposal::ProposalBlock;
pub use state::{ChainState, ChainStateManager, Staker, StateDiff};
