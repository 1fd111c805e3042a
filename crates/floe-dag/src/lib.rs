pub mod conflict;
pub mod validation;
pub mod vertex;

pub use conflict::has_conflict;
pub use validation::{cmp_tx, sort_txs, verify_vertex};
pub use vertex::Vertex;
