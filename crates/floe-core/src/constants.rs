/// ─── Floe Protocol Constants ─────────────────────────────────────────────────
///
/// Structural bounds enforced before a unit may enter consensus.
/// These mirror the codec limits of the wire format: a vertex that exceeds
/// them could never have been decoded from a well-formed message.

// ── DAG structure ────────────────────────────────────────────────────────────

/// Maximum number of parent references a vertex may carry.
pub const MAX_VERTEX_PARENTS: usize = 128;

/// Maximum number of transactions a vertex may bundle.
pub const MAX_VERTEX_TXS: usize = 128;

// ── Staking ──────────────────────────────────────────────────────────────────

/// Minimum stake weight for a validator proposal. Zero-weight validators
/// would contribute nothing to sampling and are rejected at verification.
pub const MIN_VALIDATOR_WEIGHT: u64 = 1;
