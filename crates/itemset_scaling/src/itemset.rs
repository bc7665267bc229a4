// Itemsets and transaction databases.

use std::fmt;
use std::io::Write;

/// A set of items, kept sorted and without duplicates.
///
/// Transactions are itemsets too: a transaction is just the set of items
/// bought together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset {
    items: Vec<u32>,
}

impl Itemset {
    pub fn new(mut items: Vec<u32>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn items(&self) -> &[u32] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: u32) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    /// True if every item of `self` is in `other`.
    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        if self.len() > other.len() {
            return false;
        }
        // both sides are sorted, so one merge pass is enough
        let mut theirs = other.items.iter();
        self.items
            .iter()
            .all(|item| theirs.by_ref().any(|other_item| other_item == item))
    }

    /// Number of items of `self` that are not in `covered`.
    pub fn count_new(&self, covered: &Itemset) -> usize {
        self.items.iter().filter(|i| !covered.contains(**i)).count()
    }

    /// In-place union.
    pub fn extend(&mut self, other: &Itemset) {
        self.items.extend_from_slice(&other.items);
        self.items.sort_unstable();
        self.items.dedup();
    }
}

impl FromIterator<u32> for Itemset {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

/// An itemset together with its probability of occurring in a transaction.
pub type WeightedItemset = (Itemset, f64);

/// In-memory transaction database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDatabase {
    transactions: Vec<Itemset>,
}

impl TransactionDatabase {
    pub fn new(transactions: Vec<Itemset>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Itemset] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Write one transaction per line, each item followed by a space.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for transaction in &self.transactions {
            for item in transaction.items() {
                write!(out, "{item} ")?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}
