//! Asset record types produced by the static analyzer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coarse asset classification by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// JavaScript bundles and chunks
    Js,
    /// Stylesheets
    Css,
    /// Raster/vector images
    Image,
    /// Web fonts
    Font,
    /// Everything else (html, maps, manifests, ...)
    Other,
}

impl AssetKind {
    /// Classify by file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("js") | Some("mjs") | Some("cjs") => AssetKind::Js,
            Some("css") => AssetKind::Css,
            Some("png") | Some("jpg") | Some("jpeg") | Some("gif") | Some("svg")
            | Some("webp") | Some("ico") | Some("avif") => AssetKind::Image,
            Some("woff") | Some("woff2") | Some("ttf") | Some("otf") | Some("eot") => {
                AssetKind::Font
            }
            _ => AssetKind::Other,
        }
    }
}

/// One analyzed file from the build output tree.
///
/// Created once per analyzer run and not mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Path relative to the build root, with `/` separators
    pub path: String,
    /// Asset classification
    pub kind: AssetKind,
    /// Size on disk (bytes)
    pub size_bytes: u64,
    /// Size after gzip at a fixed level (bytes)
    pub gzip_size_bytes: u64,
    /// Filename carries a content-hash pattern
    pub has_content_hash: bool,
    /// Looks like a code-split chunk
    pub is_chunk: bool,
    /// Looks like a vendor bundle
    pub is_vendor: bool,
    /// Text content looks minified (advisory heuristic)
    pub minified_heuristic: bool,
}

/// A duplicate function body found in two or more files (advisory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateBody {
    /// Normalized body text (truncated for the report)
    pub body: String,
    /// Files containing the body, in discovery order
    pub paths: Vec<String>,
}

/// Regex-based dependency/duplication signals. Approximate by construction;
/// consumers treat these as advisory, not ground truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySignals {
    /// Total import/require occurrences across scripts
    pub import_refs: u64,
    /// Exact-string duplicate function bodies
    pub duplicate_bodies: Vec<DuplicateBody>,
}

/// Full analyzer output for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleAnalysis {
    /// When the scan ran
    pub generated_at: DateTime<Utc>,
    /// Scanned build root
    pub root: String,
    /// Files that could not be read and were skipped
    pub skipped: Vec<String>,
    /// Per-file records, sorted by path
    pub records: Vec<AssetRecord>,
    /// Advisory dependency/duplication signals
    pub advisory: AdvisorySignals,
}

impl BundleAnalysis {
    /// Total size across all records (bytes).
    pub fn total_size_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }

    /// Total gzip size across all records (bytes).
    pub fn total_gzip_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.gzip_size_bytes).sum()
    }

    /// Largest single record, if any.
    pub fn largest(&self) -> Option<&AssetRecord> {
        self.records.iter().max_by_key(|r| r.size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_common_extensions() {
        assert_eq!(AssetKind::from_path(Path::new("app.js")), AssetKind::Js);
        assert_eq!(AssetKind::from_path(Path::new("app.mjs")), AssetKind::Js);
        assert_eq!(AssetKind::from_path(Path::new("styles.css")), AssetKind::Css);
        assert_eq!(AssetKind::from_path(Path::new("logo.svg")), AssetKind::Image);
        assert_eq!(AssetKind::from_path(Path::new("font.woff2")), AssetKind::Font);
        assert_eq!(AssetKind::from_path(Path::new("index.html")), AssetKind::Other);
        assert_eq!(AssetKind::from_path(Path::new("app.js.map")), AssetKind::Other);
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(AssetKind::from_path(Path::new("APP.JS")), AssetKind::Js);
        assert_eq!(AssetKind::from_path(Path::new("LOGO.PNG")), AssetKind::Image);
    }

    #[test]
    fn test_totals_over_records() {
        let record = |path: &str, size: u64| AssetRecord {
            path: path.to_string(),
            kind: AssetKind::Js,
            size_bytes: size,
            gzip_size_bytes: size / 3,
            has_content_hash: false,
            is_chunk: false,
            is_vendor: false,
            minified_heuristic: false,
        };
        let analysis = BundleAnalysis {
            generated_at: Utc::now(),
            root: "dist".to_string(),
            skipped: vec![],
            records: vec![record("a.js", 300), record("b.js", 900)],
            advisory: AdvisorySignals::default(),
        };

        assert_eq!(analysis.total_size_bytes(), 1200);
        assert_eq!(analysis.total_gzip_bytes(), 400);
        assert_eq!(analysis.largest().unwrap().path, "b.js");
    }
}
