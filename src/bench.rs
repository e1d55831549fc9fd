//! Fixed-duration weighted workload against one [`StudentDb`].
//!
//! A run goes through three phases:
//!
//! * `Running`: until the deadline (computed once, checked once per
//!   iteration) draw an operation kind by weight and execute it. A slow
//!   operation can overshoot the deadline; that is accepted.
//! * `Finalizing`: sample the process heap, then time the stable birth-date
//!   sort followed by the heap sort on the container as the workload left it.
//! * `Done`: the [`BenchmarkResult`] is returned to the caller.
//!
//! The heap is sampled after the workload and before either sort, so the
//! sorts' temporary buffers never show up in the memory column.

use log::debug;
use rand::Rng;
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::container::StudentDb;
use crate::memory;
use crate::report::BenchmarkResult;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);
pub const DEFAULT_TOP_N: usize = 100;
pub const MAX_RATING: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Top,
    SetRating,
    BestGroup,
}

/// Relative frequency of each operation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    pub top: u32,
    pub set_rating: u32,
    pub best_group: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            top: 100,
            set_rating: 10,
            best_group: 50,
        }
    }
}

impl Weights {
    /// Sum of the weights. Widened so that any three `u32` weights fit.
    pub fn total(&self) -> u64 {
        u64::from(self.top) + u64::from(self.set_rating) + u64::from(self.best_group)
    }

    /// Maps a draw in `[0, total)` onto its operation kind.
    pub fn pick(&self, draw: u64) -> OpKind {
        let top = u64::from(self.top);
        if draw < top {
            OpKind::Top
        } else if draw < top + u64::from(self.set_rating) {
            OpKind::SetRating
        } else {
            OpKind::BestGroup
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub top: u64,
    pub set_rating: u64,
    pub best_group: u64,
}

impl OpCounts {
    #[inline]
    pub fn record(&mut self, kind: OpKind) {
        match kind {
            OpKind::Top => self.top += 1,
            OpKind::SetRating => self.set_rating += 1,
            OpKind::BestGroup => self.best_group += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.top + self.set_rating + self.best_group
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkloadConfig {
    pub duration: Duration,
    pub weights: Weights,
    pub top_n: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            weights: Weights::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Finalizing,
    Done,
}

/// Executes one operation of `kind`.
pub fn execute<R: Rng>(
    db: &mut StudentDb,
    kind: OpKind,
    emails: &[String],
    top_n: usize,
    rng: &mut R,
) {
    match kind {
        OpKind::Top => {
            black_box(db.top(top_n));
        }
        OpKind::SetRating => {
            if !emails.is_empty() {
                let email = &emails[rng.gen_range(0..emails.len())];
                let rating = rng.gen::<f32>() * MAX_RATING;
                db.set_rating(email, rating);
            }
        }
        OpKind::BestGroup => {
            black_box(db.best_group());
        }
    }
}

/// Runs the weighted loop until `cfg.duration` has elapsed.
///
/// # Panics
///
/// Panics if every weight is zero.
pub fn run_workload<R: Rng>(db: &mut StudentDb, cfg: &WorkloadConfig, rng: &mut R) -> OpCounts {
    let total = cfg.weights.total();
    assert!(total > 0, "workload weights must not all be zero");
    let emails = db.emails();
    let mut counts = OpCounts::default();

    let deadline = Instant::now() + cfg.duration;
    while Instant::now() < deadline {
        let kind = cfg.weights.pick(rng.gen_range(0..total));
        execute(db, kind, &emails, cfg.top_n, rng);
        counts.record(kind);
    }
    counts
}

/// Full benchmark of an already loaded container.
pub fn benchmark<R: Rng>(
    db: &mut StudentDb,
    size: usize,
    cfg: &WorkloadConfig,
    rng: &mut R,
) -> BenchmarkResult {
    let variant = db.variant();
    let mut phase = Phase::Running;
    debug!("{variant}/{size}: {phase:?} for {:?}", cfg.duration);
    let ops = run_workload(db, cfg, rng);

    phase = Phase::Finalizing;
    debug!("{variant}/{size}: {phase:?} after {} ops", ops.total());
    let memory_mib = memory::bytes_to_mib(memory::heap_bytes());

    let start = Instant::now();
    db.sort_by_birthdate();
    let sort_default = start.elapsed();

    let start = Instant::now();
    db.heap_sort_by_birthdate();
    let sort_heap = start.elapsed();

    phase = Phase::Done;
    debug!("{variant}/{size}: {phase:?}");
    BenchmarkResult {
        variant,
        size,
        ops,
        memory_mib,
        sort_default,
        sort_heap,
    }
}
