//! Artifacts generated from a cache classification: the grouped headers
//! document, the precache manifest for the offline-cache worker, and a
//! reverse-proxy configuration snippet.

use super::{CachePolicy, CacheReport, ClassifiedAsset};
use serde::{Deserialize, Serialize};

/// Files sharing one policy, with its header and rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyGroup {
    /// Policy class
    pub policy: CachePolicy,
    /// Cache-Control header value
    pub cache_control: String,
    /// Why this policy applies
    pub rationale: String,
    /// Files assigned the policy, in input order
    pub files: Vec<String>,
}

/// The cache-headers document: files grouped by policy in fixed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHeadersDoc {
    /// Groups in [`CachePolicy::ORDERED`] order; empty groups are omitted
    pub groups: Vec<PolicyGroup>,
}

impl CacheHeadersDoc {
    /// Build the grouped document from a classification.
    pub fn from_report(report: &CacheReport) -> Self {
        let mut groups = Vec::new();
        for policy in CachePolicy::ORDERED {
            let members: Vec<&ClassifiedAsset> = report
                .assets
                .iter()
                .filter(|a| a.assignment.policy == policy)
                .collect();
            if members.is_empty() {
                continue;
            }
            // Within one policy the header/rationale can differ (html vs
            // default short-term), so split by header string too.
            let mut seen_headers: Vec<&str> = Vec::new();
            for asset in &members {
                if !seen_headers.contains(&asset.assignment.cache_control.as_str()) {
                    seen_headers.push(asset.assignment.cache_control.as_str());
                }
            }
            for header in seen_headers {
                let subset: Vec<&&ClassifiedAsset> = members
                    .iter()
                    .filter(|a| a.assignment.cache_control == header)
                    .collect();
                groups.push(PolicyGroup {
                    policy,
                    cache_control: header.to_string(),
                    rationale: subset[0].assignment.rationale.to_string(),
                    files: subset.iter().map(|a| a.path.clone()).collect(),
                });
            }
        }
        Self { groups }
    }
}

/// One precache manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecacheEntry {
    /// Asset URL relative to the site root
    pub url: String,
    /// Content-hash revision when the filename carries one
    pub revision: Option<String>,
}

/// Bounded precache manifest for the offline-cache worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecacheManifest {
    /// Entries, Immutable assets first, then LongTerm, largest first
    pub entries: Vec<PrecacheEntry>,
}

impl PrecacheManifest {
    /// Build a manifest of at most `limit` Immutable/LongTerm assets.
    pub fn from_report(report: &CacheReport, limit: usize) -> Self {
        let mut candidates: Vec<&ClassifiedAsset> = report
            .assets
            .iter()
            .filter(|a| {
                matches!(
                    a.assignment.policy,
                    CachePolicy::Immutable | CachePolicy::LongTerm
                )
            })
            .collect();

        // Immutable before LongTerm, then the heaviest assets (they gain
        // the most from being precached). Stable sort keeps input order
        // for ties.
        candidates.sort_by(|a, b| {
            let rank = |asset: &ClassifiedAsset| match asset.assignment.policy {
                CachePolicy::Immutable => 0,
                _ => 1,
            };
            rank(a)
                .cmp(&rank(b))
                .then(b.size_bytes.cmp(&a.size_bytes))
        });

        let entries = candidates
            .into_iter()
            .take(limit)
            .map(|asset| PrecacheEntry {
                url: format!("/{}", asset.path.trim_start_matches('/')),
                revision: asset.has_content_hash.then(|| asset.path.clone()),
            })
            .collect();

        Self { entries }
    }
}

/// Render an nginx-style location block per extension pattern.
pub fn proxy_config(_report: &CacheReport) -> String {
    // Extension patterns map to the headers the ordered rules would assign
    // to unhashed files of that type; hashed files get their own rule.
    let rules: [(&str, &str); 4] = [
        (
            r"~* \.[0-9a-f]{8,}\.(js|css)$",
            "public, max-age=31536000, immutable",
        ),
        (
            r"~* \.(png|jpg|jpeg|gif|svg|webp|ico|avif|woff|woff2|ttf|otf|eot)$",
            "public, max-age=2592000",
        ),
        (r"~* \.(js|mjs|cjs|css)$", "public, max-age=86400"),
        (r"~* \.html?$", "public, max-age=3600, must-revalidate"),
    ];

    let mut out = String::from("# generated by pagepulse cache\n");
    for (pattern, header) in rules {
        out.push_str(&format!(
            "location {} {{\n    add_header Cache-Control \"{}\";\n}}\n",
            pattern, header
        ));
    }
    out.push_str(
        "location /api/ {\n    add_header Cache-Control \"no-cache, no-store, must-revalidate\";\n}\n",
    );
    out
}
