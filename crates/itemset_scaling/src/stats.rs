// Summary statistics of a transaction database.

use std::collections::HashSet;
use std::fmt;

use crate::itemset::{Itemset, TransactionDatabase};

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseStats {
    /// Number of distinct items.
    pub items: usize,
    pub transactions: usize,
    pub avg_items_per_transaction: f64,
}

impl DatabaseStats {
    pub fn from_database(db: &TransactionDatabase) -> Self {
        let mut singletons = HashSet::new();
        let mut total = 0usize;
        for transaction in db.transactions() {
            singletons.extend(transaction.items().iter().copied());
            total += transaction.len();
        }

        let transactions = db.len();
        let avg_items_per_transaction = if transactions == 0 {
            0.0
        } else {
            total as f64 / transactions as f64
        };

        Self {
            items: singletons.len(),
            transactions,
            avg_items_per_transaction,
        }
    }
}

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items: {}", self.items)?;
        writeln!(f, "Transactions: {}", self.transactions)?;
        write!(
            f,
            "Avg. items per transaction: {:.3}",
            self.avg_items_per_transaction
        )
    }
}

/// Number of distinct items across `itemsets`; the itemsets may overlap.
pub fn count_items<'a>(itemsets: impl IntoIterator<Item = &'a Itemset>) -> usize {
    itemsets
        .into_iter()
        .flat_map(|set| set.items().iter().copied())
        .collect::<HashSet<_>>()
        .len()
}
