use anyhow::{ensure, Result};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;

use crate::bench::{benchmark, WorkloadConfig};
use crate::container::StudentDb;
use crate::dataset::ensure_dataset;
use crate::report::{BenchmarkResult, ResultWriter};
use crate::variant::Variant;

pub const DEFAULT_SIZES: [usize; 4] = [100, 1_000, 10_000, 100_000];
pub const DEFAULT_MASTER: &str = "students.csv";
pub const DEFAULT_OUTPUT: &str = "results.csv";

#[derive(Clone, Debug)]
pub struct MatrixConfig {
    pub variants: Vec<Variant>,
    pub sizes: Vec<usize>,
    /// Source the per-size datasets are cut from.
    pub master: PathBuf,
    /// Where per-size datasets are cached.
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub workload: WorkloadConfig,
    /// Base seed; run `i` uses `seed + i`. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            variants: Variant::ALL.to_vec(),
            sizes: DEFAULT_SIZES.to_vec(),
            master: PathBuf::from(DEFAULT_MASTER),
            data_dir: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            workload: WorkloadConfig::default(),
            seed: None,
        }
    }
}

impl MatrixConfig {
    fn rng_for(&self, run: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Runs every (variant, size) pair, variant-major, writing rows to
/// `cfg.output` as they complete.
pub fn run_matrix(cfg: &MatrixConfig) -> Result<Vec<BenchmarkResult>> {
    let mut writer = ResultWriter::create(&cfg.output)?;
    let results = run_matrix_into(cfg, &mut writer)?;
    info!(
        "wrote {} result rows to {}",
        writer.rows(),
        cfg.output.display()
    );
    Ok(results)
}

/// Same as [`run_matrix`] with a caller supplied sink.
pub fn run_matrix_into<W: Write>(
    cfg: &MatrixConfig,
    writer: &mut ResultWriter<W>,
) -> Result<Vec<BenchmarkResult>> {
    ensure!(
        cfg.workload.weights.total() > 0,
        "workload weights must not all be zero"
    );
    let mut results = Vec::with_capacity(cfg.variants.len() * cfg.sizes.len());
    let mut run = 0u64;
    for &variant in &cfg.variants {
        for &size in &cfg.sizes {
            let path = ensure_dataset(&cfg.master, &cfg.data_dir, size)?;
            let mut db = StudentDb::new(variant);
            db.load_csv(&path)?;
            let mut rng = cfg.rng_for(run);
            run += 1;

            info!("benchmarking {variant} with {size} rows");
            let result = benchmark(&mut db, size, &cfg.workload, &mut rng);
            drop(db);
            info!(
                "{variant}/{size}: ops {}/{}/{}, {:.2} MB, sort {:.3} ms, heap sort {:.3} ms",
                result.ops.top,
                result.ops.set_rating,
                result.ops.best_group,
                result.memory_mib,
                result.sort_default_ms(),
                result.sort_heap_ms()
            );
            writer.append(&result)?;
            results.push(result);
        }
    }
    Ok(results)
}
