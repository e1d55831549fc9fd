//! Results table: one CSV row per (variant, dataset size) run.

use anyhow::{ensure, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::bench::OpCounts;
use crate::variant::Variant;

pub const RESULTS_HEADER: &str =
    "Variant,Size,Ops_Top100,Ops_SetRating,Ops_BestGroup,Memory_MB,Sort_Default_ms,Sort_Heap_ms";

const COLUMN_COUNT: usize = 8;

/// Outcome of one benchmark run.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    pub variant: Variant,
    pub size: usize,
    pub ops: OpCounts,
    /// Process heap in MiB, sampled after the workload and before the sorts.
    pub memory_mib: f64,
    pub sort_default: Duration,
    pub sort_heap: Duration,
}

#[inline]
fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

impl BenchmarkResult {
    pub fn sort_default_ms(&self) -> f64 {
        millis(self.sort_default)
    }

    pub fn sort_heap_ms(&self) -> f64 {
        millis(self.sort_heap)
    }

    /// The result as a table row, without trailing newline.
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.2},{:.3},{:.3}",
            self.variant.name(),
            self.size,
            self.ops.top,
            self.ops.set_rating,
            self.ops.best_group,
            self.memory_mib,
            self.sort_default_ms(),
            self.sort_heap_ms()
        )
    }
}

/// Appends result rows to a sink, header first. Every row is flushed as soon
/// as it is written so a crash mid-matrix keeps the finished runs.
pub struct ResultWriter<W: Write> {
    out: W,
    rows: usize,
}

impl ResultWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create results file {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{RESULTS_HEADER}")?;
        out.flush()?;
        Ok(Self { out, rows: 0 })
    }

    pub fn append(&mut self, result: &BenchmarkResult) -> Result<()> {
        writeln!(self.out, "{}", result.to_row())?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// A results row read back from disk. The variant stays textual so tables
/// written by other tools still load.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub variant: String,
    pub size: usize,
    pub ops: [u64; 3],
    pub memory_mib: f64,
    pub sort_default_ms: f64,
    pub sort_heap_ms: f64,
}

impl ResultRow {
    pub fn parse(line: &str) -> Result<Self> {
        let s: Vec<&str> = line.split(',').collect();
        ensure!(
            s.len() >= COLUMN_COUNT,
            "expected {COLUMN_COUNT} columns, found {}",
            s.len()
        );
        Ok(Self {
            variant: s[0].to_owned(),
            size: s[1].trim().parse().context("Size")?,
            ops: [
                s[2].trim().parse().context("Ops_Top100")?,
                s[3].trim().parse().context("Ops_SetRating")?,
                s[4].trim().parse().context("Ops_BestGroup")?,
            ],
            memory_mib: s[5].trim().parse().context("Memory_MB")?,
            sort_default_ms: s[6].trim().parse().context("Sort_Default_ms")?,
            sort_heap_ms: s[7].trim().parse().context("Sort_Heap_ms")?,
        })
    }
}

pub fn parse_results(text: &str) -> Result<Vec<ResultRow>> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| ResultRow::parse(line).with_context(|| format!("results line {}", i + 1)))
        .collect()
}

pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<ResultRow>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read results {}", path.display()))?;
    parse_results(&text)
}

/// Rows grouped by variant, variants in order of first appearance.
pub fn group_by_variant(rows: &[ResultRow]) -> Vec<(&str, Vec<&ResultRow>)> {
    let mut groups: Vec<(&str, Vec<&ResultRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(v, _)| *v == row.variant) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.variant.as_str(), vec![row])),
        }
    }
    groups
}

/// Writes a per-variant comparison table.
pub fn write_summary<W: Write>(out: &mut W, rows: &[ResultRow]) -> std::io::Result<()> {
    for (variant, members) in group_by_variant(rows) {
        writeln!(out, "\n  Variant: {variant}")?;
        writeln!(out, "  {}", "-".repeat(78))?;
        writeln!(
            out,
            "  {:>8} {:>10} {:>10} {:>10} {:>10} {:>12} {:>12}",
            "Size", "Top100", "SetRating", "BestGroup", "Mem (MB)", "Sort (ms)", "Heap (ms)"
        )?;
        for r in members {
            writeln!(
                out,
                "  {:>8} {:>10} {:>10} {:>10} {:>10.2} {:>12.3} {:>12.3}",
                r.size, r.ops[0], r.ops[1], r.ops[2], r.memory_mib, r.sort_default_ms, r.sort_heap_ms
            )?;
        }
    }
    writeln!(out)
}
