
// Transaction scaling experiment for the itemset miner.

pub mod em;
pub mod error;
pub mod eval;
pub mod experiment;
pub mod generator;
pub mod inference;
pub mod itemset;
pub mod stats;

pub use error::Error;
pub use itemset::{Itemset, TransactionDatabase, WeightedItemset};
