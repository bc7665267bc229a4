// Times itemset mining on synthetic databases of increasing size.

use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};
use scaling_plot::{
    MeasurementSeries, PlotBackend, PlotError, ReferenceSeries, ScalingPlotRenderer,
};

use crate::em::{EmConfig, mine_itemsets};
use crate::error::Error;
use crate::generator::generate_transaction_database;
use crate::inference::InferenceAlgorithm;
use crate::itemset::WeightedItemset;
use crate::stats::{DatabaseStats, count_items};

/// Build the pool the miner runs in; `None` uses one thread per CPU.
pub fn build_thread_pool(threads: Option<usize>) -> Result<ThreadPool, Error> {
    let num_threads = threads.unwrap_or_else(num_cpus::get);
    if num_threads == 0 {
        return Err(Error::InvalidParameter("threads must be at least 1".into()));
    }
    Ok(ThreadPoolBuilder::new().num_threads(num_threads).build()?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingExperiment {
    /// Database sizes to time, at least two, strictly increasing.
    pub transaction_counts: Vec<usize>,
    /// No larger databases are tried once a run takes longer than this.
    pub max_runtime: Duration,
    pub em: EmConfig,
    /// Seed of the transaction generator.
    pub seed: u64,
}

impl Default for ScalingExperiment {
    fn default() -> Self {
        Self {
            transaction_counts: vec![1_000, 10_000, 100_000],
            max_runtime: Duration::from_secs(6 * 60 * 60),
            em: EmConfig::default(),
            seed: 1,
        }
    }
}

/// Mining time per database size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalingReport {
    pub transactions: Vec<usize>,
    /// Seconds, one entry per transaction count.
    pub times: Vec<f64>,
}

impl ScalingReport {
    pub fn measurement(&self) -> Result<MeasurementSeries, PlotError> {
        MeasurementSeries::new(
            self.transactions.iter().map(|t| *t as f64).collect(),
            self.times.clone(),
        )
    }

    /// Chart of the timings against linear scaling from the smallest run.
    pub fn renderer(&self) -> Result<ScalingPlotRenderer, PlotError> {
        let measurement = self.measurement()?;
        let reference = ReferenceSeries::proportional_to(&measurement);
        Ok(ScalingPlotRenderer::new(measurement, reference))
    }

    /// Draw the chart on `backend`.
    ///
    /// A run that stopped after its first size leaves a single timing, which
    /// has no slope to plot; that is logged and `Ok(false)` returned without
    /// touching the backend.
    pub fn render<B: PlotBackend>(&self, backend: &mut B) -> Result<bool, Error> {
        if self.transactions.len() < 2 {
            log::warn!(
                "only {} timing(s) recorded, not plotting: {:?}",
                self.transactions.len(),
                self.times
            );
            return Ok(false);
        }
        self.renderer()?.render(backend)?;
        Ok(true)
    }
}

impl ScalingExperiment {
    fn validate(&self) -> Result<(), Error> {
        if self.transaction_counts.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "need at least two transaction counts to measure scaling, got {}",
                self.transaction_counts.len()
            )));
        }
        if self.transaction_counts.contains(&0) {
            return Err(Error::InvalidParameter(
                "transaction counts must be positive".into(),
            ));
        }
        if self.transaction_counts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidParameter(
                "transaction counts must increase strictly".into(),
            ));
        }
        Ok(())
    }

    /// Generate a database from `itemsets` for every transaction count and
    /// time how long mining it takes.
    pub fn run<A>(
        &self,
        itemsets: &[WeightedItemset],
        algorithm: &A,
        thread_pool: &ThreadPool,
    ) -> Result<ScalingReport, Error>
    where
        A: InferenceAlgorithm + ?Sized,
    {
        self.validate()?;

        log::info!(
            "{} generating itemsets over {} items",
            itemsets.len(),
            count_items(itemsets.iter().map(|(set, _)| set))
        );

        let mut report = ScalingReport::default();
        for &count in &self.transaction_counts {
            log::info!("========= {} Transactions", format_count(count));

            let (db, _) = generate_transaction_database(itemsets, count, self.seed)?;
            log::info!("\n{}", DatabaseStats::from_database(&db));

            let start = Instant::now();
            let result = mine_itemsets(&db, algorithm, &self.em, thread_pool)?;
            let elapsed = start.elapsed();

            log::info!(
                "{} itemsets after {} EM iterations, Time (s): {:.2}",
                result.itemsets.len(),
                result.iterations,
                elapsed.as_secs_f64()
            );

            report.transactions.push(count);
            report.times.push(elapsed.as_secs_f64());

            if elapsed > self.max_runtime {
                log::warn!(
                    "run took longer than {:?}, skipping larger databases",
                    self.max_runtime
                );
                break;
            }
        }

        log::info!("Transactions: {:?}", report.transactions);
        log::info!("Time: {:?}", report.times);

        Ok(report)
    }
}

/// Format a count like `1.0E3`.
pub fn format_count(count: usize) -> String {
    format!("{:.1e}", count as f64).to_uppercase()
}
