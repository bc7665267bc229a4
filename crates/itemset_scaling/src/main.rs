// CLI for the itemset scaling experiment; plots with scaling_plot.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use itemset_scaling::em::{EmConfig, mine_itemsets};
use itemset_scaling::eval::score_mining;
use itemset_scaling::experiment::{ScalingExperiment, build_thread_pool};
use itemset_scaling::generator::{
    BackgroundParams, Problem, generate_background_itemsets, generate_example_itemsets,
    generate_transaction_database,
};
use itemset_scaling::inference::{InferGreedy, InferPrimalDual, InferenceAlgorithm};
use itemset_scaling::stats::DatabaseStats;
use itemset_scaling::{Error, WeightedItemset};
use scaling_plot::{PlotSurface, SurfaceConfig, SurfaceKind};

// setup command line args

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Time mining on databases of increasing size and plot the result
    Scale(ScaleArgs),
    /// Write a synthetic transaction database
    Generate(GenerateArgs),
    /// Mine a synthetic database and score the result against its itemsets
    PrecisionRecall(PrecisionRecallArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Algorithm {
    Greedy,
    PrimalDual,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProblemArg {
    Caviar,
    Freerider,
    CrossSupport,
}

impl From<ProblemArg> for Problem {
    fn from(arg: ProblemArg) -> Self {
        match arg {
            ProblemArg::Caviar => Problem::Caviar,
            ProblemArg::Freerider => Problem::Freerider,
            ProblemArg::CrossSupport => Problem::CrossSupport,
        }
    }
}

/// Settings shared by the commands that mine.
#[derive(Debug, Args)]
pub struct MinerArgs {
    #[clap(long, value_enum, default_value = "greedy")]
    algorithm: Algorithm,
    #[clap(long, default_value_t = 100)]
    em_iterations: usize,
    /// Worker threads; one per CPU if omitted
    #[clap(long)]
    threads: Option<usize>,
}

/// Settings of the random generating itemsets.
#[derive(Debug, Args)]
pub struct ItemsetArgs {
    /// Number of generating itemsets
    #[clap(long, default_value_t = 100)]
    itemsets: usize,
    /// Number of distinct items they are drawn from
    #[clap(long, default_value_t = 100)]
    items: u32,
    #[clap(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Debug, Args)]
pub struct ScaleArgs {
    #[clap(long, value_delimiter = ',', default_value = "1000,10000,100000")]
    transactions: Vec<usize>,
    /// Skip larger databases once a run exceeds this many minutes
    #[clap(long, default_value_t = 360)]
    max_runtime_mins: u64,
    #[clap(long, default_value = "scaling.png")]
    output: PathBuf,
    #[clap(flatten)]
    miner: MinerArgs,
    #[clap(flatten)]
    itemsets: ItemsetArgs,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[clap(long, default_value_t = 10_000)]
    transactions: usize,
    /// Generate from an example problem instead of random itemsets
    #[clap(long, value_enum)]
    problem: Option<ProblemArg>,
    #[clap(long, default_value_t = 10)]
    instances: usize,
    #[clap(long, default_value_t = 0)]
    difficulty: u32,
    #[clap(long, required = true)]
    output: PathBuf,
    #[clap(flatten)]
    itemsets: ItemsetArgs,
}

#[derive(Debug, Args)]
pub struct PrecisionRecallArgs {
    #[clap(long, default_value_t = 10_000)]
    transactions: usize,
    #[clap(flatten)]
    miner: MinerArgs,
    #[clap(flatten)]
    itemsets: ItemsetArgs,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    match args.command {
        Command::Scale(args) => scale(&args),
        Command::Generate(args) => generate(&args),
        Command::PrecisionRecall(args) => precision_recall_run(&args),
    }
    .map_err(|e| e.to_string())
}

fn algorithm(arg: Algorithm, seed: u64) -> Box<dyn InferenceAlgorithm> {
    match arg {
        Algorithm::Greedy => Box::new(InferGreedy),
        Algorithm::PrimalDual => Box::new(InferPrimalDual { seed }),
    }
}

fn background_itemsets(args: &ItemsetArgs) -> Result<Vec<WeightedItemset>, Error> {
    let params = BackgroundParams {
        no_itemsets: args.itemsets,
        no_items: args.items,
        ..BackgroundParams::default()
    };
    generate_background_itemsets(&params, args.seed)
}

fn scale(args: &ScaleArgs) -> Result<(), Error> {
    let itemsets = background_itemsets(&args.itemsets)?;
    let thread_pool = build_thread_pool(args.miner.threads)?;
    let algorithm = algorithm(args.miner.algorithm, args.itemsets.seed);

    let experiment = ScalingExperiment {
        transaction_counts: args.transactions.clone(),
        max_runtime: Duration::from_secs(args.max_runtime_mins * 60),
        em: EmConfig {
            max_iterations: args.miner.em_iterations,
            ..EmConfig::default()
        },
        seed: args.itemsets.seed,
    };
    let report = experiment.run(&itemsets, algorithm.as_ref(), &thread_pool)?;

    let mut surface = PlotSurface::new(SurfaceConfig {
        kind: SurfaceKind::from_path(&args.output).unwrap_or_default(),
        path: args.output.clone(),
        ..SurfaceConfig::default()
    });
    report.render(&mut surface)?;

    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<(), Error> {
    let itemsets = match args.problem {
        Some(problem) => generate_example_itemsets(problem.into(), args.instances, args.difficulty)?,
        None => background_itemsets(&args.itemsets)?,
    };

    let (db, added) = generate_transaction_database(&itemsets, args.transactions, args.itemsets.seed)?;

    println!("\n============= ACTUAL ITEMSETS =============");
    for (set, prob) in &added {
        println!("{set}\tprob: {prob:1.5}");
    }
    println!("\nNo itemsets: {}", added.len());

    let mut out = BufWriter::new(File::create(&args.output)?);
    db.write_to(&mut out)?;

    println!("\nDatabase: {}", args.output.display());
    println!("{}", DatabaseStats::from_database(&db));

    Ok(())
}

fn precision_recall_run(args: &PrecisionRecallArgs) -> Result<(), Error> {
    let itemsets = background_itemsets(&args.itemsets)?;
    let (db, actual) = generate_transaction_database(&itemsets, args.transactions, args.itemsets.seed)?;
    println!("{}", DatabaseStats::from_database(&db));

    let thread_pool = build_thread_pool(args.miner.threads)?;
    let algorithm = algorithm(args.miner.algorithm, args.itemsets.seed);
    let config = EmConfig {
        max_iterations: args.miner.em_iterations,
        ..EmConfig::default()
    };

    let result = mine_itemsets(&db, algorithm.as_ref(), &config, &thread_pool)?;

    let scores = score_mining(&actual, &result.itemsets);

    println!("No. mined itemsets: {}", result.itemsets.len());
    println!("Precision (all): {:?}", scores.precision);
    println!("Recall (all): {:?}", scores.recall);

    Ok(())
}
