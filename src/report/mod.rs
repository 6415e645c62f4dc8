//! Report emitter.
//!
//! Builds the immutable optimization report from an engine evaluation and
//! persists it as an append-only artifact (a new timestamped file per run).
//! The timestamp is assigned exactly once at build time; serialization is
//! deterministic (struct field order, no re-sorting of arrays). Failing to
//! write the artifact is the only hard failure in the pipeline.

/// Minimal HTML rendering
pub mod html;

use crate::error::PagePulseError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::optimizer::{enumerate_fixes, CategorySection, Evaluation, FixDescriptor, Issue};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Issue counts by severity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total issues across all categories
    pub total_issues: usize,
    /// High-severity count
    pub high: usize,
    /// Medium-severity count
    pub medium: usize,
    /// Low-severity count
    pub low: usize,
}

/// The immutable, timestamped report artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Unique run identifier
    pub run_id: String,
    /// Assigned exactly once, when the report is built
    pub timestamp: DateTime<Utc>,
    /// Severity counts
    pub summary: ReportSummary,
    /// Per-category sections in discovery order
    pub categories: Vec<CategorySection>,
    /// Top actions by severity then discovery order
    pub prioritized_actions: Vec<Issue>,
    /// Candidate automated fixes (never executed here)
    pub automated_fixes: Vec<FixDescriptor>,
}

impl OptimizationReport {
    /// Build a report from an engine evaluation. Never mutated afterward.
    pub fn build(evaluation: Evaluation) -> Self {
        let all = evaluation.all_issues();
        let summary = ReportSummary {
            total_issues: all.len(),
            high: all
                .iter()
                .filter(|i| i.severity == crate::optimizer::Severity::High)
                .count(),
            medium: all
                .iter()
                .filter(|i| i.severity == crate::optimizer::Severity::Medium)
                .count(),
            low: all
                .iter()
                .filter(|i| i.severity == crate::optimizer::Severity::Low)
                .count(),
        };
        let automated_fixes = enumerate_fixes(&all);

        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            summary,
            categories: evaluation.categories,
            prioritized_actions: evaluation.prioritized,
            automated_fixes,
        }
    }
}

/// Cooperative cancellation flag for a report run.
///
/// A cancelled run discards accumulated issues and writes nothing.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Persists report artifacts into a reports directory, one file per run.
pub struct ReportWriter<FS: FileSystem = RealFileSystem> {
    dir: PathBuf,
    fs: FS,
}

impl ReportWriter<RealFileSystem> {
    /// Create a writer targeting the given reports directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(dir, RealFileSystem)
    }
}

impl<FS: FileSystem> ReportWriter<FS> {
    /// Create a writer with a custom filesystem implementation.
    pub fn with_fs(dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    /// Write the JSON artifact; returns the path written.
    ///
    /// This is the pipeline's only hard failure: a report that cannot be
    /// persisted means the run produced nothing usable.
    pub fn write(&self, report: &OptimizationReport) -> Result<PathBuf> {
        let path = self.artifact_path(report, "json");
        let json = serde_json::to_string_pretty(report)?;
        self.write_artifact(&path, json.as_bytes())?;
        Ok(path)
    }

    /// Optionally render and write the HTML artifact next to the JSON one.
    pub fn write_html(&self, report: &OptimizationReport) -> Result<PathBuf> {
        let path = self.artifact_path(report, "html");
        let rendered = html::render(report);
        self.write_artifact(&path, rendered.as_bytes())?;
        Ok(path)
    }

    fn artifact_path(&self, report: &OptimizationReport, ext: &str) -> PathBuf {
        let stamp = report.timestamp.format("%Y%m%dT%H%M%SZ");
        let short_id = &report.run_id[..8.min(report.run_id.len())];
        self.dir.join(format!("pagepulse-{}-{}.{}", stamp, short_id, ext))
    }

    fn write_artifact(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.fs
            .create_dir_all(&self.dir)
            .map_err(|source| PagePulseError::ReportWrite {
                path: path.to_path_buf(),
                source,
            })?;
        self.fs
            .write(path, bytes)
            .map_err(|source| PagePulseError::ReportWrite {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}
