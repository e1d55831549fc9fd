#![deny(clippy::uninlined_format_args)]
#![deny(clippy::to_string_in_format_args)]
//! Benchmarks in-memory storage strategies for student records.
//!
//! A [`StudentDb`] pairs an ordered record sequence with an email index, both
//! chosen by [`Variant`]. [`bench`] drives a timed weighted workload against
//! one container, [`matrix`] runs it over every variant and dataset size, and
//! [`report`] writes the results table.

pub mod bench;
pub mod container;
pub mod dataset;
pub mod matrix;
pub mod memory;
pub mod record;
pub mod report;
pub mod storage;
pub mod variant;

pub use bench::{benchmark, run_workload, OpCounts, OpKind, Weights, WorkloadConfig};
pub use container::{StudentDb, BEST_GROUP_NONE};
pub use matrix::{run_matrix, MatrixConfig};
pub use memory::CountingAlloc;
pub use record::Student;
pub use report::{BenchmarkResult, ResultWriter};
pub use storage::{FastHashMap, MAX_RECORDS};
pub use variant::{IndexKind, SequenceKind, Variant};
