// Synthetic itemsets and transaction databases.
//
// Transactions are drawn from a set of weighted itemsets: every itemset is
// included in a transaction independently with its probability, and the
// transaction is the union of the included itemsets.

use std::collections::BTreeMap;

use rand::distributions::Uniform;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Geometric, LogNormal};

use crate::error::Error;
use crate::itemset::{Itemset, TransactionDatabase, WeightedItemset};

/// Smallest item id used for background itemsets.
const FIRST_BACKGROUND_ITEM: u32 = 20;

/// Item ids of example problems start after this one.
const EXAMPLE_ITEM_OFFSET: u32 = 80;

/// Draw attempts allowed per requested background itemset.
const ATTEMPTS_PER_ITEMSET: usize = 1000;

/// Parameters of the random background itemsets.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundParams {
    /// Number of distinct itemsets to produce.
    pub no_itemsets: usize,
    /// Success probability of the geometric size distribution; sizes are `1 + Geometric(p)`.
    pub p: f64,
    /// Items are drawn uniformly from `no_items` consecutive ids.
    pub no_items: u32,
    /// Location of the log-normal probability distribution.
    pub mu: f64,
    /// Scale of the log-normal probability distribution.
    pub sigma: f64,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            no_itemsets: 100,
            p: 0.5,
            no_items: 100,
            mu: -4.0,
            sigma: 1.0,
        }
    }
}

/// Generate random itemsets to use as background noise.
///
/// Returns the itemsets in sorted order so the output only depends on the seed.
pub fn generate_background_itemsets(
    params: &BackgroundParams,
    seed: u64,
) -> Result<Vec<WeightedItemset>, Error> {
    if params.no_items == 0 {
        return Err(Error::InvalidParameter("no_items must be at least 1".into()));
    }
    if !(params.p > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "geometric p must be positive, got {}",
            params.p
        )));
    }
    let size_dist = Geometric::new(params.p).map_err(|e| {
        Error::InvalidParameter(format!("geometric p = {}: {e}", params.p))
    })?;
    let prob_dist = LogNormal::new(params.mu, params.sigma).map_err(|e| {
        Error::InvalidParameter(format!(
            "log-normal mu = {}, sigma = {}: {e}",
            params.mu, params.sigma
        ))
    })?;
    let item_dist = Uniform::new_inclusive(
        FIRST_BACKGROUND_ITEM,
        FIRST_BACKGROUND_ITEM.saturating_add(params.no_items - 1),
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut itemsets = BTreeMap::new();
    let max_attempts = params.no_itemsets.saturating_mul(ATTEMPTS_PER_ITEMSET);

    let mut attempts = 0;
    while itemsets.len() < params.no_itemsets {
        if attempts == max_attempts {
            return Err(Error::Generation(format!(
                "only {} distinct itemsets after {attempts} draws",
                itemsets.len()
            )));
        }
        attempts += 1;

        // shifted geometric, so no itemset is empty
        let len = size_dist.sample(&mut rng) + 1;
        let set: Itemset = (0..len).map(|_| item_dist.sample(&mut rng)).collect();
        let prob = prob_dist.sample(&mut rng);
        itemsets.insert(set, prob);
    }

    Ok(itemsets.into_iter().collect())
}

/// Classic problem patterns for frequent itemset mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// A rare pair ("champagne & caviar") that high support thresholds miss.
    Caviar,
    /// A frequent singleton that gets attached to other frequent items.
    Freerider,
    /// A very frequent singleton that forms spurious cross-support patterns.
    CrossSupport,
}

/// Itemsets that exhibit `problem`, `instances` times.
///
/// `difficulty` runs from 0 to 10 and scales probabilities by `10^(-difficulty/10)`.
pub fn generate_example_itemsets(
    problem: Problem,
    instances: usize,
    difficulty: u32,
) -> Result<Vec<WeightedItemset>, Error> {
    if difficulty > 10 {
        return Err(Error::InvalidParameter(format!(
            "difficulty must be between 0 and 10, got {difficulty}"
        )));
    }
    let scaling = 10f64.powf(-(difficulty as f64) / 10.0);

    let mut next_item = EXAMPLE_ITEM_OFFSET;
    let mut itemsets = Vec::with_capacity(instances);
    for _ in 0..instances {
        let entry = match problem {
            Problem::Caviar => {
                let set = Itemset::new(vec![next_item + 1, next_item + 2]);
                next_item += 2;
                (set, 0.05 * scaling)
            }
            Problem::Freerider => {
                next_item += 1;
                (Itemset::new(vec![next_item]), 0.5 * scaling)
            }
            Problem::CrossSupport => {
                next_item += 1;
                (Itemset::new(vec![next_item]), 0.95 * scaling)
            }
        };
        itemsets.push(entry);
    }

    Ok(itemsets)
}

/// Draw `no_transactions` non-empty transactions from `itemsets`.
///
/// Also returns the itemsets that appeared in at least one transaction,
/// with their generating probability.
pub fn generate_transaction_database(
    itemsets: &[WeightedItemset],
    no_transactions: usize,
    seed: u64,
) -> Result<(TransactionDatabase, Vec<WeightedItemset>), Error> {
    if let Some((set, p)) = itemsets.iter().find(|(_, p)| p.is_nan() || *p < 0.0) {
        return Err(Error::InvalidParameter(format!(
            "itemset {set} has probability {p}"
        )));
    }
    if no_transactions > 0
        && !itemsets
            .iter()
            .any(|(set, p)| *p > 0.0 && !set.is_empty())
    {
        return Err(Error::Generation(
            "no itemset can ever occur, every transaction would be empty".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut added = BTreeMap::new();
    let mut transactions = Vec::with_capacity(no_transactions);

    while transactions.len() < no_transactions {
        let mut transaction = Itemset::default();
        for (set, p) in itemsets {
            if rng.gen_range(0.0..1.0) < *p {
                transaction.extend(set);
                added.insert(set.clone(), *p);
            }
        }
        if !transaction.is_empty() {
            transactions.push(transaction);
        }
    }

    Ok((
        TransactionDatabase::new(transactions),
        added.into_iter().collect(),
    ))
}
