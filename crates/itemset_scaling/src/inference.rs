// Algorithms that explain a transaction by a covering of itemsets.
//
// Covering a transaction with itemsets of probability p costs -ln(p) per
// itemset; both algorithms approximate the minimum-cost covering.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::itemset::Itemset;

/// An itemset of the current model that is contained in the transaction
/// being explained.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Index of the itemset in the model.
    pub id: usize,
    pub itemset: &'a Itemset,
    pub prob: f64,
}

impl Candidate<'_> {
    pub fn cost(&self) -> f64 {
        -self.prob.ln()
    }
}

pub trait InferenceAlgorithm: Sync {
    /// Ids of the candidates chosen to cover `transaction`.
    ///
    /// The covering may be incomplete if the candidates don't cover every item.
    fn infer(&self, transaction: &Itemset, candidates: &[Candidate<'_>]) -> Vec<usize>;
}

/// Greedy weighted set cover.
///
/// This is an O(log(n))-approximation where n is the number of items in the
/// transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferGreedy;

impl InferenceAlgorithm for InferGreedy {
    fn infer(&self, transaction: &Itemset, candidates: &[Candidate<'_>]) -> Vec<usize> {
        let mut covering = Vec::new();
        let mut covered = Itemset::default();

        while covered.len() != transaction.len() {
            let mut min_cost_per_item = f64::INFINITY;
            let mut best = None;

            for candidate in candidates {
                let not_covered = candidate.itemset.count_new(&covered);
                if not_covered == 0 {
                    continue;
                }
                let cost_per_item = candidate.cost() / not_covered as f64;
                if cost_per_item < min_cost_per_item {
                    min_cost_per_item = cost_per_item;
                    best = Some(candidate);
                }
            }

            match best {
                Some(candidate) => {
                    covering.push(candidate.id);
                    covered.extend(candidate.itemset);
                }
                None => break,
            }
        }

        covering
    }
}

/// Primal-dual weighted set cover.
///
/// An f-approximation, where f is the largest number of candidates sharing an
/// item. Items are visited in random order; the generator is seeded from
/// `seed` and the transaction so results are reproducible across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferPrimalDual {
    pub seed: u64,
}

impl InferPrimalDual {
    fn rng_for(&self, transaction: &Itemset) -> StdRng {
        let mix = transaction
            .items()
            .iter()
            .fold(self.seed, |acc, item| {
                acc.wrapping_mul(0x100_0000_01b3).wrapping_add(*item as u64)
            });
        StdRng::seed_from_u64(mix)
    }
}

impl InferenceAlgorithm for InferPrimalDual {
    fn infer(&self, transaction: &Itemset, candidates: &[Candidate<'_>]) -> Vec<usize> {
        let mut rng = self.rng_for(transaction);
        let mut covering = Vec::new();
        let mut not_covered = transaction.items().to_vec();
        let mut costs: Vec<f64> = candidates.iter().map(Candidate::cost).collect();

        while !not_covered.is_empty() {
            let element = not_covered[rng.gen_range(0..not_covered.len())];

            // raise the dual of the element until a candidate becomes tight
            let mut min_cost = f64::INFINITY;
            let mut best = None;
            for (i, candidate) in candidates.iter().enumerate() {
                if candidate.itemset.contains(element) && costs[i] < min_cost {
                    min_cost = costs[i];
                    best = Some(candidate);
                }
            }

            let Some(chosen) = best else {
                break;
            };
            covering.push(chosen.id);
            not_covered.retain(|item| !chosen.itemset.contains(*item));

            for (i, candidate) in candidates.iter().enumerate() {
                if candidate.itemset.contains(element) {
                    costs[i] -= min_cost;
                }
            }
        }

        covering
    }
}
