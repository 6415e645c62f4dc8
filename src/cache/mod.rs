//! Cache strategy classifier.
//!
//! Assigns exactly one cache policy per asset using a fixed, ordered rule
//! list evaluated top-down; the first matching rule wins and nothing is
//! re-evaluated. Classification is a pure function of the filename and
//! extension (plus the configured API prefix), so re-running on unchanged
//! input yields identical assignments.

/// Generated artifacts: headers document, precache manifest, proxy snippet
pub mod artifacts;

pub use artifacts::{proxy_config, CacheHeadersDoc, PolicyGroup, PrecacheEntry, PrecacheManifest};

use crate::assets::{heuristics, AssetKind, AssetRecord};
use crate::bundles::{BundleKind, MetricBundle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cache policy classes in descending cacheability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Content-hashed assets, cacheable forever
    Immutable,
    /// Stable media (images, fonts), 30 days
    LongTerm,
    /// Mutable assets, hours to a day
    ShortTerm,
    /// API responses, never cached
    NoCache,
}

impl CachePolicy {
    /// Fixed output ordering for grouped artifacts.
    pub const ORDERED: [CachePolicy; 4] = [
        CachePolicy::Immutable,
        CachePolicy::LongTerm,
        CachePolicy::ShortTerm,
        CachePolicy::NoCache,
    ];
}

/// One policy assignment: the policy plus its header and rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAssignment {
    /// Assigned policy class
    pub policy: CachePolicy,
    /// Cache-Control header value
    pub cache_control: String,
    /// Why this policy applies
    pub rationale: String,
}

fn assignment(policy: CachePolicy, cache_control: &str, rationale: &str) -> PolicyAssignment {
    PolicyAssignment {
        policy,
        cache_control: cache_control.to_string(),
        rationale: rationale.to_string(),
    }
}

/// An asset record together with its policy assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAsset {
    /// Asset path relative to the build root
    pub path: String,
    /// Asset classification
    pub kind: AssetKind,
    /// Size on disk (bytes)
    pub size_bytes: u64,
    /// Filename carries a content hash
    pub has_content_hash: bool,
    /// Assigned cache policy
    pub assignment: PolicyAssignment,
}

/// Classification output for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheReport {
    /// When classification ran
    pub generated_at: DateTime<Utc>,
    /// Per-asset assignments, in input order
    pub assets: Vec<ClassifiedAsset>,
}

/// Deterministic cache policy classifier.
#[derive(Debug, Clone)]
pub struct CacheClassifier {
    api_prefix: String,
    precache_limit: usize,
}

impl Default for CacheClassifier {
    fn default() -> Self {
        Self::new("/api", 50)
    }
}

impl CacheClassifier {
    /// Create a classifier with the given API prefix and precache bound.
    pub fn new(api_prefix: impl Into<String>, precache_limit: usize) -> Self {
        Self {
            api_prefix: api_prefix.into(),
            precache_limit: precache_limit.max(1),
        }
    }

    /// Assign a policy to one path. Ordered rules, first match wins.
    pub fn classify(&self, path: &str) -> PolicyAssignment {
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        let kind = AssetKind::from_path(Path::new(path));

        // Rule 1: content-hashed filenames never change, so a hashed .js
        // file must resolve here and not at the css/js rule below.
        if heuristics::has_content_hash(filename) {
            return assignment(
                CachePolicy::Immutable,
                "public, max-age=31536000, immutable",
                "content-hashed filename changes on every rebuild",
            );
        }

        // Rule 2: stable media
        if matches!(kind, AssetKind::Image | AssetKind::Font) {
            return assignment(
                CachePolicy::LongTerm,
                "public, max-age=2592000",
                "images and fonts change rarely",
            );
        }

        // Rule 3: unhashed scripts and stylesheets
        if matches!(kind, AssetKind::Js | AssetKind::Css) {
            return assignment(
                CachePolicy::ShortTerm,
                "public, max-age=86400",
                "unhashed code may change on deploy",
            );
        }

        // Rule 4: API documents are never cached; other HTML revalidates
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        if normalized.starts_with(&self.api_prefix) {
            return assignment(
                CachePolicy::NoCache,
                "no-cache, no-store, must-revalidate",
                "API responses must always be fresh",
            );
        }
        if is_html(path) {
            return assignment(
                CachePolicy::ShortTerm,
                "public, max-age=3600, must-revalidate",
                "HTML entry points revalidate hourly",
            );
        }

        // Rule 5: default
        assignment(
            CachePolicy::ShortTerm,
            "public, max-age=3600",
            "unclassified asset defaults to a short TTL",
        )
    }

    /// Classify a set of analyzed assets, one assignment per record.
    pub fn classify_assets(&self, records: &[AssetRecord]) -> CacheReport {
        let assets = records
            .iter()
            .map(|record| ClassifiedAsset {
                path: record.path.clone(),
                kind: record.kind,
                size_bytes: record.size_bytes,
                has_content_hash: record.has_content_hash,
                assignment: self.classify(&record.path),
            })
            .collect();

        CacheReport {
            generated_at: Utc::now(),
            assets,
        }
    }

    /// Configured precache manifest bound.
    pub fn precache_limit(&self) -> usize {
        self.precache_limit
    }
}

fn is_html(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Reduce a classification to a normalized bundle for the rule engine.
pub fn to_bundle(report: &CacheReport) -> MetricBundle {
    let immutable = report
        .assets
        .iter()
        .filter(|a| a.assignment.policy == CachePolicy::Immutable)
        .count() as u64;
    let unversioned_code = report
        .assets
        .iter()
        .filter(|a| {
            matches!(a.kind, AssetKind::Js | AssetKind::Css) && !a.has_content_hash
        })
        .count() as u64;

    MetricBundle::new(BundleKind::Cache)
        .with("assetCount", report.assets.len() as u64)
        .with("immutableCount", immutable)
        .with("unversionedCodeCount", unversioned_code)
}
