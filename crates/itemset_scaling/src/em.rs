// Structural hard EM over a transaction database: the workload timed by the
// scaling experiment.
//
// The model is a list of itemsets with probabilities. The E-step covers every
// transaction with the model's itemsets, the M-step sets each itemset's
// probability to the fraction of transactions whose covering used it. Between
// EM steps the structure step tries unions of model itemsets and keeps the
// first one that lowers the average cost.

use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::{ThreadPool, prelude::*};

use crate::error::Error;
use crate::inference::{Candidate, InferenceAlgorithm};
use crate::itemset::{Itemset, TransactionDatabase, WeightedItemset};

#[derive(Debug, Clone, PartialEq)]
pub struct EmConfig {
    pub max_iterations: usize,
    /// Candidate itemsets evaluated per structure step.
    pub max_structure_steps: usize,
    /// Stop once the average cost changes by less than this.
    pub tolerance: f64,
}

impl Default for EmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_structure_steps: 20,
            tolerance: 1e-5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiningResult {
    /// Itemsets by descending probability.
    pub itemsets: Vec<WeightedItemset>,
    pub iterations: usize,
    /// Average transaction cost under the final model.
    pub average_cost: f64,
}

/// Result of one hard EM step.
#[derive(Debug, Clone, PartialEq)]
pub struct EmStep {
    pub model: Vec<WeightedItemset>,
    /// Average transaction cost under `model`.
    pub average_cost: f64,
}

/// Starting model: every item as a singleton with its relative support in `db`.
pub fn initial_model(db: &TransactionDatabase) -> Vec<WeightedItemset> {
    if db.is_empty() {
        return Vec::new();
    }
    let n = db.len() as f64;

    let singleton_counts = db
        .transactions()
        .par_iter()
        .fold(HashMap::new, |mut counts: HashMap<u32, u64>, t| {
            for item in t.items() {
                *counts.entry(*item).or_default() += 1;
            }
            counts
        })
        .reduce(HashMap::new, |mut a, b| {
            for (item, count) in b {
                *a.entry(item).or_default() += count;
            }
            a
        });

    // sorted by itemset, so the model order doesn't depend on hashing
    let model: BTreeMap<Itemset, f64> = singleton_counts
        .into_iter()
        .map(|(item, count)| (Itemset::new(vec![item]), count as f64 / n))
        .collect();

    model.into_iter().collect()
}

/// Number of transactions of `db` that contain `itemset`.
pub fn support(db: &TransactionDatabase, itemset: &Itemset) -> usize {
    db.transactions()
        .par_iter()
        .filter(|t| itemset.is_subset_of(t))
        .count()
}

/// Candidates of `model` contained in `transaction`.
pub fn candidates_for<'a>(transaction: &Itemset, model: &'a [WeightedItemset]) -> Vec<Candidate<'a>> {
    model
        .iter()
        .enumerate()
        .filter(|(_, (set, _))| set.is_subset_of(transaction))
        .map(|(id, (itemset, prob))| Candidate {
            id,
            itemset,
            prob: *prob,
        })
        .collect()
}

/// Cost of explaining a transaction by `covering`: -ln(p) for every used
/// candidate and -ln(1 - p) for every unused one, with `prob` giving the
/// probability of each model itemset.
pub fn covering_cost(candidates: &[usize], covering: &[usize], prob: impl Fn(usize) -> f64) -> f64 {
    candidates
        .iter()
        .map(|id| {
            let p = prob(*id);
            if covering.contains(id) {
                -p.ln()
            } else {
                -(1.0 - p).max(f64::MIN_POSITIVE).ln()
            }
        })
        .sum()
}

/// One hard EM step, parallel over transactions in the current rayon pool.
///
/// The returned cost is that of the E-step coverings under the re-estimated
/// probabilities, so itemsets that fell out of the model cost nothing.
pub fn hard_em_step<A>(db: &TransactionDatabase, model: &[WeightedItemset], algorithm: &A) -> EmStep
where
    A: InferenceAlgorithm + ?Sized,
{
    let n = db.len() as f64;

    // E-step: (candidate ids, covering) per transaction
    let coverings: Vec<(Vec<usize>, Vec<usize>)> = db
        .transactions()
        .par_iter()
        .map(|t| {
            let candidates = candidates_for(t, model);
            let covering = algorithm.infer(t, &candidates);
            (candidates.iter().map(|c| c.id).collect(), covering)
        })
        .collect();

    let zero = || vec![0u64; model.len()];
    let counts = coverings
        .par_iter()
        .fold(zero, |mut counts, (_, covering)| {
            for id in covering {
                counts[*id] += 1;
            }
            counts
        })
        .reduce(zero, |mut a, b| {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
            a
        });

    // M-step
    let new_prob = |id: usize| counts[id] as f64 / n;
    let total_cost: f64 = coverings
        .par_iter()
        .map(|(candidates, covering)| covering_cost(candidates, covering, new_prob))
        .sum();

    let model = model
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|((set, _), count)| (set.clone(), *count as f64 / n))
        .collect();

    EmStep {
        model,
        average_cost: total_cost / n,
    }
}

/// Try unions of pairs of model itemsets, most probable first, and add the
/// first one that is used by some covering and lowers the average cost.
/// Returns true if one was added.
///
/// Rejected candidates are remembered and never tried again.
fn structure_step<A>(
    db: &TransactionDatabase,
    model: &mut Vec<WeightedItemset>,
    average_cost: &mut f64,
    algorithm: &A,
    config: &EmConfig,
    rejected: &mut HashSet<Itemset>,
) -> bool
where
    A: InferenceAlgorithm + ?Sized,
{
    let n = db.len() as f64;

    let mut ranked: Vec<usize> = (0..model.len()).collect();
    ranked.sort_by(|a, b| model[*b].1.total_cmp(&model[*a].1));
    let present: HashSet<Itemset> = model.iter().map(|(set, _)| set.clone()).collect();

    let mut tried = 0;
    for (pos, &a) in ranked.iter().enumerate() {
        for &b in &ranked[pos + 1..] {
            if tried == config.max_structure_steps {
                return false;
            }

            let mut candidate = model[a].0.clone();
            candidate.extend(&model[b].0);
            if present.contains(&candidate) || rejected.contains(&candidate) {
                continue;
            }
            tried += 1;

            let count = support(db, &candidate);
            if count == 0 {
                rejected.insert(candidate);
                continue;
            }

            let mut trial = model.clone();
            trial.push((candidate.clone(), count as f64 / n));
            let step = hard_em_step(db, &trial, algorithm);

            let kept = step.model.iter().any(|(set, _)| *set == candidate);
            if kept && step.average_cost < *average_cost {
                log::debug!(
                    "accepted {candidate}, average cost {:.5} -> {:.5}",
                    *average_cost,
                    step.average_cost
                );
                *model = step.model;
                *average_cost = step.average_cost;
                return true;
            }
            rejected.insert(candidate);
        }
    }

    false
}

fn mine_itemsets_internal<A>(db: &TransactionDatabase, algorithm: &A, config: &EmConfig) -> MiningResult
where
    A: InferenceAlgorithm + ?Sized,
{
    let mut model = initial_model(db);
    let mut average_cost = f64::INFINITY;
    let mut rejected = HashSet::new();
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let step = hard_em_step(db, &model, algorithm);
        iterations += 1;

        let converged = (average_cost - step.average_cost).abs() < config.tolerance;
        model = step.model;
        average_cost = step.average_cost;

        let grown = structure_step(
            db,
            &mut model,
            &mut average_cost,
            algorithm,
            config,
            &mut rejected,
        );

        log::debug!(
            "EM iteration {iterations}: {} itemsets, average cost {average_cost:.5}",
            model.len()
        );

        if converged && !grown {
            break;
        }
    }

    model.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    MiningResult {
        itemsets: model,
        iterations,
        average_cost,
    }
}

/// Mine itemsets from `db` by structural hard EM, starting from singletons.
///
/// Runs inside `thread_pool`; every E-step is split over its threads.
pub fn mine_itemsets<A>(
    db: &TransactionDatabase,
    algorithm: &A,
    config: &EmConfig,
    thread_pool: &ThreadPool,
) -> Result<MiningResult, Error>
where
    A: InferenceAlgorithm + ?Sized,
{
    if db.is_empty() {
        return Err(Error::InvalidParameter(
            "cannot mine an empty transaction database".into(),
        ));
    }
    if config.max_iterations == 0 {
        return Err(Error::InvalidParameter(
            "max_iterations must be at least 1".into(),
        ));
    }

    Ok(thread_pool.install(|| mine_itemsets_internal(db, algorithm, config)))
}
