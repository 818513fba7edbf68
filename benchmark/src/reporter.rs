// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON report generation for benchmark runs.
//!
//! Saves a finished [`BenchmarkReport`] to a timestamped JSON file so runs
//! on different machines or builds can be compared afterwards.

use crate::metrics::BenchmarkReport;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to access output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save a benchmark report to a JSON file named after its start time.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let filename = format!("valref_{}.json", timestamp);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::debug!(path = %filepath.display(), "Saved benchmark report");
        Ok(filepath)
    }

    /// List all existing benchmark files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// The newest saved report other than `current`, if any.
    ///
    /// File names carry the run timestamp, so name order is run order.
    pub fn previous_report(&self, current: &Path) -> Result<Option<PathBuf>, ReporterError> {
        Ok(self
            .list_reports()?
            .into_iter()
            .filter(|path| path != current)
            .next_back())
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::harness::MeasurementRunner;
    use tempfile::TempDir;
    use valref_core::ScenarioParams;

    fn small_report() -> BenchmarkReport {
        let params = ScenarioParams::scaled(8, 2).unwrap();
        let mut runner = MeasurementRunner::new(std::io::sink());
        Driver::new(params, 1).run(&mut runner).unwrap()
    }

    #[test]
    fn test_reporter_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();
        let report = small_report();

        let path = reporter.save(&report).unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("valref_"));

        let loaded = JsonReporter::load(&path).unwrap();
        assert_eq!(loaded.results.len(), 20);
        assert_eq!(loaded.results[0].measurement.name, "Point Struct 2");
        assert_eq!(loaded.params, report.params);
        assert_eq!(loaded.summaries, report.summaries);
    }

    #[test]
    fn test_list_reports_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path().join("nested")).unwrap();

        reporter.save(&small_report()).unwrap();
        fs::write(temp_dir.path().join("nested").join("notes.txt"), "x").unwrap();

        let reports = reporter.list_reports().unwrap();
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_previous_report_skips_current_run() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();

        let current = reporter.save(&small_report()).unwrap();
        assert_eq!(reporter.previous_report(&current).unwrap(), None);

        let older = temp_dir.path().join("valref_2000-01-01T00-00-00Z.json");
        let oldest = temp_dir.path().join("valref_1999-01-01T00-00-00Z.json");
        fs::write(&older, "{}").unwrap();
        fs::write(&oldest, "{}").unwrap();

        assert_eq!(reporter.previous_report(&current).unwrap(), Some(older));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = JsonReporter::load(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ReporterError::Io(_))));
    }
}
