use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use rosterbench::{
    bench::{DEFAULT_TOP_N, MAX_RATING},
    matrix::{DEFAULT_MASTER, DEFAULT_OUTPUT, DEFAULT_SIZES},
    report, run_matrix, CountingAlloc, MatrixConfig, StudentDb, Variant, Weights, WorkloadConfig,
    BEST_GROUP_NONE,
};

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc::new();

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the variant x size benchmark matrix and write the results table.
    Run(RunArgs),
    /// Print a results table grouped by variant.
    Summary {
        #[arg(default_value = DEFAULT_OUTPUT)]
        results: PathBuf,
    },
    /// Load one dataset and print the query answers for a variant.
    Inspect {
        dataset: PathBuf,
        #[arg(long, value_enum, default_value = "array-hash")]
        variant: Variant,
        /// Number of top rated students to print
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Write the records sorted by birth date to this file
        #[arg(long)]
        sorted_out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Variants to run (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    variants: Vec<Variant>,
    /// Dataset sizes to run (default: 100,1000,10000,100000)
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<usize>,
    /// Workload window per run, in seconds
    #[arg(long, default_value_t = 10.0)]
    duration_secs: f64,
    /// Weights of top-N, set-rating and best-group operations
    #[arg(long, value_delimiter = ',', default_values_t = [100, 10, 50])]
    weights: Vec<u32>,
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Fixed base seed for reproducible workloads
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = DEFAULT_MASTER)]
    master: PathBuf,
    /// Directory holding the cached per-size datasets
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl RunArgs {
    fn into_config(self) -> Result<MatrixConfig> {
        anyhow::ensure!(
            self.duration_secs.is_finite() && self.duration_secs >= 0.0,
            "duration must be a non-negative number of seconds"
        );
        anyhow::ensure!(
            self.weights.len() == 3,
            "expected three weights (top,set-rating,best-group), got {}",
            self.weights.len()
        );
        let weights = Weights {
            top: self.weights[0],
            set_rating: self.weights[1],
            best_group: self.weights[2],
        };
        anyhow::ensure!(weights.total() > 0, "at least one weight must be positive");
        Ok(MatrixConfig {
            variants: if self.variants.is_empty() {
                Variant::ALL.to_vec()
            } else {
                self.variants
            },
            sizes: if self.sizes.is_empty() {
                DEFAULT_SIZES.to_vec()
            } else {
                self.sizes
            },
            master: self.master,
            data_dir: self.data_dir,
            output: self.output,
            workload: WorkloadConfig {
                duration: Duration::from_secs_f64(self.duration_secs),
                weights,
                top_n: self.top_n,
            },
            seed: self.seed,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run(args) => {
            let cfg = args.into_config()?;
            let results = run_matrix(&cfg)?;
            println!(
                "=> {} runs written to {}",
                results.len(),
                cfg.output.display()
            );
            Ok(())
        }
        Cmd::Summary { results } => {
            let rows = report::read_results(&results)?;
            report::write_summary(&mut io::stdout().lock(), &rows)
                .context("failed to print summary")
        }
        Cmd::Inspect {
            dataset,
            variant,
            top,
            sorted_out,
        } => inspect(&dataset, variant, top, sorted_out),
    }
}

fn inspect(
    dataset: &Path,
    variant: Variant,
    top: usize,
    sorted_out: Option<PathBuf>,
) -> Result<()> {
    let mut db = StudentDb::new(variant);
    db.load_csv(dataset)?;
    println!("=> {variant}: {} records", db.len());
    println!("=> best group: {}", db.best_group().unwrap_or(BEST_GROUP_NONE));
    println!("=> top {top} (ratings out of {MAX_RATING}):");
    for (rank, st) in db.top(top).iter().enumerate() {
        println!(
            "   {:>3}. {:<32} {:<10} {:>6.2}",
            rank + 1,
            st.email,
            st.group,
            st.rating
        );
    }
    if let Some(path) = sorted_out {
        db.sort_by_birthdate();
        db.save_csv(&path)?;
        println!("=> sorted by birth date into {}", path.display());
    }
    Ok(())
}
