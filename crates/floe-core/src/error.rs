use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloeError {
    // ── Vertex structural errors ─────────────────────────────────────────────
    #[error("duplicate parent reference: {0}")]
    DuplicateParent(String),

    #[error("parent references are not in ascending order")]
    UnsortedParents,

    #[error("too many parents: max {max}, got {got}")]
    TooManyParents { max: usize, got: usize },

    #[error("vertex contains no transactions")]
    NoTransactions,

    #[error("too many transactions: max {max}, got {got}")]
    TooManyTransactions { max: usize, got: usize },

    #[error("duplicate transaction: {0}")]
    DuplicateTransaction(String),

    #[error("transactions are not in ascending order by id")]
    UnsortedTransactions,

    #[error("vertex contains conflicting transactions (shared input)")]
    ConflictingTransactions,

    // ── Scheduling errors ────────────────────────────────────────────────────
    #[error("scheduling heap is empty")]
    EmptyHeap,

    // ── Decision block errors ────────────────────────────────────────────────
    #[error("unknown parent block: {0}")]
    UnknownParent(String),

    #[error("parent block must be a decided Commit or Abort block, got {0}")]
    WrongParentKind(String),

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("proposal execution failed: {0}")]
    ExecutionFailed(String),

    /// Callers must treat this as fatal: it means Accept/Reject/Verify was
    /// driven from a state that should be unreachable, i.e. the consensus
    /// engine's own bookkeeping is corrupt.
    #[error("invalid state transition: {op} while {from}")]
    InvalidStateTransition {
        from: &'static str,
        op: &'static str,
    },

    // ── Serialization ────────────────────────────────────────────────────────
    #[error("codec error: {0}")]
    Codec(String),
}
