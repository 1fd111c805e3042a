pub mod constants;
pub mod error;
pub mod transaction;
pub mod types;

pub use constants::*;
pub use error::FloeError;
pub use transaction::*;
pub use types::*;
