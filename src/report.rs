//! JSON reporting for benchmark runs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One timed (method, shape) measurement.
#[derive(Clone, Debug, Serialize)]
pub struct BenchRecord {
    pub method: &'static str,
    pub width_bits: u32,
    pub rows: usize,
    pub cols: usize,
    pub ns_per_iter: f64,
    pub iterations: u64,
}

/// A named benchmark run, serialized to `bench_out/<name>.json`.
#[derive(Clone, Debug, Serialize)]
pub struct BenchReport {
    pub name: String,
    pub records: Vec<BenchRecord>,
}

impl BenchReport {
    pub fn new(name: impl Into<String>) -> Self {
        BenchReport {
            name: name.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: BenchRecord) {
        self.records.push(record);
    }

    /// Writes the report as pretty JSON under `dir`, returning the path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating report directory {}", dir.display()))?;
        let path = dir.join(format!("{}.json", self.name));
        let file = fs::File::create(&path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("serializing benchmark report")?;
        Ok(path)
    }
}
