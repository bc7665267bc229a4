// Precision and recall of mined itemsets against the generating ones.

use std::collections::HashSet;

use crate::itemset::{Itemset, WeightedItemset};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecisionRecall {
    /// `precision[k - 1]` is the precision of the top k mined itemsets.
    pub precision: Vec<f64>,
    /// `recall[k - 1]` is the recall of the top k mined itemsets.
    pub recall: Vec<f64>,
}

/// Precision and recall of every prefix of `mined`, which is ranked best first.
pub fn precision_recall<'a>(
    actual: impl IntoIterator<Item = &'a Itemset>,
    mined: &[Itemset],
) -> PrecisionRecall {
    let actual: HashSet<&Itemset> = actual.into_iter().collect();
    let mut seen = HashSet::new();
    let mut hits = 0usize;
    let mut result = PrecisionRecall::default();

    for set in mined {
        // a repeated itemset doesn't grow the top-k set
        if !seen.insert(set) {
            continue;
        }
        if actual.contains(set) {
            hits += 1;
        }
        result.precision.push(hits as f64 / seen.len() as f64);
        result.recall.push(if actual.is_empty() {
            0.0
        } else {
            hits as f64 / actual.len() as f64
        });
    }

    result
}

/// Precision and recall of mined itemsets, ranked by descending probability,
/// against every itemset that generated the database.
pub fn score_mining(actual: &[WeightedItemset], mined: &[WeightedItemset]) -> PrecisionRecall {
    let mined: Vec<Itemset> = mined.iter().map(|(set, _)| set.clone()).collect();
    precision_recall(actual.iter().map(|(set, _)| set), &mined)
}
