mod address;
mod cache;
mod filter;
mod transaction;

pub use address::*;
pub use cache::*;
pub use filter::*;
pub use transaction::*;
