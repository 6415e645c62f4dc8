//! Static asset analyzer.
//!
//! Scans a build-output tree and produces one [`AssetRecord`] per file:
//! size, gzip size at a fixed compression level, and filename/content
//! heuristics (content hash, chunk, vendor, minification). Unreadable files
//! or directories are skipped with a warning; a scan never aborts as a
//! whole.

/// Filename and source-text heuristics
pub mod heuristics;
/// Record types
pub mod types;

pub use types::{AdvisorySignals, AssetKind, AssetRecord, BundleAnalysis, DuplicateBody};

use crate::bundles::{BundleKind, MetricBundle};
use crate::error::PagePulseError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::Result;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::warn;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed gzip level so sizes are deterministic across runs.
const GZIP_LEVEL: u32 = 6;

/// Gzip a byte slice once and return the compressed length.
pub fn gzip_size(bytes: &[u8]) -> u64 {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
    // Writing to a Vec cannot fail
    let _ = encoder.write_all(bytes);
    encoder.finish().map(|v| v.len() as u64).unwrap_or(0)
}

/// Build-output scanner producing per-file asset records.
pub struct AssetAnalyzer<FS: FileSystem = RealFileSystem> {
    root: PathBuf,
    fs: FS,
}

impl AssetAnalyzer<RealFileSystem> {
    /// Create an analyzer for the given build root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, RealFileSystem)
    }
}

impl<FS: FileSystem + Sync> AssetAnalyzer<FS> {
    /// Create an analyzer with a custom filesystem implementation.
    pub fn with_fs(root: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// Scan the build tree and produce one record per readable file.
    #[must_use = "Analysis results feed the rule engine and cache classifier"]
    pub fn scan(&self) -> Result<BundleAnalysis> {
        if !self.root.is_dir() {
            return Err(PagePulseError::BuildDirNotFound {
                path: self.root.clone(),
            }
            .into());
        }

        let skipped = Mutex::new(Vec::new());
        let mut files = Vec::new();
        self.collect_files(&self.root, &mut files, &skipped);

        let bodies = Mutex::new(HashMap::new());
        let import_refs = Mutex::new(0u64);

        let mut records: Vec<AssetRecord> = files
            .par_iter()
            .filter_map(|path| match self.analyze_file(path) {
                Ok((record, content)) => {
                    if let Some(text) = content {
                        *import_refs.lock() += heuristics::count_import_refs(&text);
                        heuristics::collect_function_bodies(
                            &text,
                            &record.path,
                            &mut bodies.lock(),
                        );
                    }
                    Some(record)
                }
                Err(e) => {
                    warn!("skipping unreadable file {}: {}", path.display(), e);
                    skipped.lock().push(relative_path(&self.root, path));
                    None
                }
            })
            .collect();

        // Sorted records keep the artifact deterministic across runs.
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let mut duplicate_bodies: Vec<DuplicateBody> = bodies
            .into_inner()
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(body, mut paths)| {
                paths.sort();
                DuplicateBody {
                    body: body.chars().take(120).collect(),
                    paths,
                }
            })
            .collect();
        duplicate_bodies.sort_by(|a, b| a.body.cmp(&b.body));

        let mut skipped = skipped.into_inner();
        skipped.sort();

        Ok(BundleAnalysis {
            generated_at: Utc::now(),
            root: self.root.display().to_string(),
            skipped,
            records,
            advisory: AdvisorySignals {
                import_refs: import_refs.into_inner(),
                duplicate_bodies,
            },
        })
    }

    /// Serialize an analysis to a JSON artifact.
    pub fn write_json(&self, analysis: &BundleAnalysis, out_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(analysis)?;
        self.fs
            .write(out_path, json)
            .map_err(|source| PagePulseError::Io {
                context: format!("writing {}", out_path.display()),
                source,
            })?;
        Ok(())
    }

    fn analyze_file(&self, path: &Path) -> std::io::Result<(AssetRecord, Option<String>)> {
        let bytes = self.fs.read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let kind = AssetKind::from_path(path);

        // Text heuristics only apply to scripts and stylesheets.
        let (minified, content) = if matches!(kind, AssetKind::Js | AssetKind::Css) {
            match String::from_utf8(bytes.clone()) {
                Ok(text) => (heuristics::looks_minified(&text), Some(text)),
                Err(_) => (false, None),
            }
        } else {
            (false, None)
        };

        let record = AssetRecord {
            path: relative_path(&self.root, path),
            kind,
            size_bytes: bytes.len() as u64,
            gzip_size_bytes: gzip_size(&bytes),
            has_content_hash: heuristics::has_content_hash(filename),
            is_chunk: heuristics::is_chunk(filename),
            is_vendor: heuristics::is_vendor(filename),
            minified_heuristic: minified,
        };

        // Only scripts contribute to the dependency proxy.
        let content = if kind == AssetKind::Js { content } else { None };
        Ok((record, content))
    }

    fn collect_files(&self, dir: &Path, out: &mut Vec<PathBuf>, skipped: &Mutex<Vec<String>>) {
        let entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skipping unreadable directory {}: {}", dir.display(), e);
                skipped.lock().push(relative_path(&self.root, dir));
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
            }
            if path.is_dir() {
                self.collect_files(&path, out, skipped);
            } else {
                out.push(path);
            }
        }
    }
}

/// Reduce an analysis to a normalized bundle for the rule engine summary.
pub fn to_bundle(analysis: &BundleAnalysis) -> MetricBundle {
    let script_count = analysis
        .records
        .iter()
        .filter(|r| r.kind == AssetKind::Js)
        .count() as u64;
    let largest = analysis.largest().map(|r| r.size_bytes).unwrap_or(0);

    MetricBundle::new(BundleKind::Bundle)
        .with("fileCount", analysis.records.len() as u64)
        .with("scriptCount", script_count)
        .with("totalSize", analysis.total_size_bytes())
        .with("totalGzipSize", analysis.total_gzip_bytes())
        .with("largestAssetSize", largest)
        .with("importRefs", analysis.advisory.import_refs)
        .with(
            "duplicateBodies",
            analysis.advisory.duplicate_bodies.len() as u64,
        )
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}
