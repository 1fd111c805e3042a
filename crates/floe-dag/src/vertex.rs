use floe_core::error::FloeError;
use floe_core::transaction::Transaction;
use floe_core::types::{ChainId, Height, VertexId};
use serde::{Deserialize, Serialize};

use crate::validation::verify_vertex;

/// A vertex in the floe DAG.
///
/// Bundles an ordered, conflict-free set of transactions plus references to
/// its parent vertices. Constructed once from decoded network bytes and
/// immutable afterwards: verification is a pure check that may be re-run at
/// any time with the same result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vertex {
    pub id: VertexId,

    /// The chain this vertex belongs to.
    pub chain_id: ChainId,

    /// Depth in the DAG (genesis frontier = 0).
    pub height: Height,

    /// Parent vertex ids, strictly ascending by byte order.
    pub parent_ids: Vec<VertexId>,

    /// Transaction payload, strictly ascending by tx id.
    pub txs: Vec<Transaction>,
}

impl Vertex {
    pub fn new(
        id: VertexId,
        chain_id: ChainId,
        height: Height,
        parent_ids: Vec<VertexId>,
        txs: Vec<Transaction>,
    ) -> Self {
        Self {
            id,
            chain_id,
            height,
            parent_ids,
            txs,
        }
    }

    /// Decode a vertex from network-delivered bytes.
    /// Decoding performs no structural validation; call [`Vertex::verify`]
    /// before admitting the result to consensus.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FloeError> {
        bincode::deserialize(bytes).map_err(|e| FloeError::Codec(e.to_string()))
    }

    /// Canonical byte encoding of this vertex.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FloeError> {
        bincode::serialize(self).map_err(|e| FloeError::Codec(e.to_string()))
    }

    /// Check every structural invariant. See [`verify_vertex`].
    pub fn verify(&self) -> Result<(), FloeError> {
        verify_vertex(self)
    }
}
