//! The threshold rule catalogue.
//!
//! One rule produces at most one issue. A rule whose required field is
//! absent from the bundle is skipped alone (logged at debug) while the
//! remaining rules in the category proceed.

use super::{Issue, Severity};
use crate::assets::BundleAnalysis;
use crate::bundles::MetricBundle;
use crate::cache::CacheReport;
use crate::config::ThresholdSettings;
use crate::fmt::{format_bytes, format_ms};
use log::debug;

fn issue(
    category: &str,
    issue_type: &str,
    severity: Severity,
    description: String,
    recommendations: Vec<&str>,
    related: Vec<String>,
) -> Issue {
    Issue {
        category: category.to_string(),
        issue_type: issue_type.to_string(),
        severity,
        description,
        recommendations: recommendations.into_iter().map(String::from).collect(),
        related,
    }
}

macro_rules! require_field {
    ($bundle:expr, $field:expr, $rule:expr) => {
        match $bundle.number($field) {
            Some(value) => value,
            None => {
                debug!("rule {} skipped: field {} missing", $rule, $field);
                return None;
            }
        }
    };
}

/// Frontend vitals rules: lcp, fid, cls.
pub fn frontend(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Vec<Issue> {
    [
        lcp_rule(thresholds, bundle),
        fid_rule(thresholds, bundle),
        cls_rule(thresholds, bundle),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn lcp_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let lcp = require_field!(bundle, "lcp", "lcp");
    (lcp > thresholds.lcp_ms).then(|| {
        issue(
            "frontend",
            "lcp",
            Severity::High,
            format!(
                "Largest Contentful Paint is {} (threshold {})",
                format_ms(lcp),
                format_ms(thresholds.lcp_ms)
            ),
            vec![
                "Preload the hero image and critical fonts",
                "Serve above-the-fold images in a modern format",
                "Inline critical CSS",
            ],
            vec![],
        )
    })
}

fn fid_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let fid = require_field!(bundle, "fid", "fid");
    (fid > thresholds.fid_ms).then(|| {
        issue(
            "frontend",
            "fid",
            Severity::High,
            format!(
                "First Input Delay is {} (threshold {})",
                format_ms(fid),
                format_ms(thresholds.fid_ms)
            ),
            vec![
                "Break up long main-thread tasks",
                "Defer non-critical scripts",
            ],
            vec![],
        )
    })
}

fn cls_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let cls = require_field!(bundle, "cls", "cls");
    (cls > thresholds.cls).then(|| {
        issue(
            "frontend",
            "cls",
            Severity::Medium,
            format!(
                "Cumulative Layout Shift is {:.3} (threshold {:.1})",
                cls, thresholds.cls
            ),
            vec![
                "Reserve dimensions for images and embeds",
                "Avoid inserting content above existing content",
            ],
            vec![],
        )
    })
}

/// Backend telemetry rules: response time, error rate, memory usage.
pub fn backend(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Vec<Issue> {
    [
        response_time_rule(thresholds, bundle),
        error_rate_rule(thresholds, bundle),
        memory_rule(thresholds, bundle),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn response_time_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let avg = require_field!(bundle, "averageResponseTime", "response-time");
    let severity = if avg > thresholds.response_time_crit_ms {
        Severity::High
    } else if avg > thresholds.response_time_warn_ms {
        Severity::Medium
    } else {
        return None;
    };

    Some(issue(
        "backend",
        "response-time",
        severity,
        format!("Average response time is {}", format_ms(avg)),
        vec![
            "Profile the slowest endpoints",
            "Add database indexes for hot queries",
            "Cache expensive lookups",
        ],
        vec![],
    ))
}

fn error_rate_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let rate = require_field!(bundle, "errorRate", "error-rate");
    (rate > thresholds.error_rate).then(|| {
        issue(
            "backend",
            "error-rate",
            Severity::High,
            format!("Error rate is {:.1}% of sampled requests", rate * 100.0),
            vec![
                "Inspect recent 5xx responses in the request log",
                "Add retries around flaky upstream calls",
            ],
            vec![],
        )
    })
}

fn memory_rule(thresholds: &ThresholdSettings, bundle: &MetricBundle) -> Option<Issue> {
    let usage = require_field!(bundle, "memoryUsage", "memory-usage");
    (usage > thresholds.memory_usage).then(|| {
        issue(
            "backend",
            "memory-usage",
            Severity::High,
            format!("Process memory usage is {:.0}% of available", usage * 100.0),
            vec![
                "Check for unbounded in-memory caches",
                "Lower worker concurrency or raise instance memory",
            ],
            vec![],
        )
    })
}

/// Bundle rules: oversized assets (all offenders aggregate into one issue).
pub fn bundle(thresholds: &ThresholdSettings, analysis: &BundleAnalysis) -> Vec<Issue> {
    let offenders: Vec<&crate::assets::AssetRecord> = analysis
        .records
        .iter()
        .filter(|r| r.size_bytes > thresholds.asset_size_bytes)
        .collect();

    if offenders.is_empty() {
        return Vec::new();
    }

    let total: u64 = offenders.iter().map(|r| r.size_bytes).sum();
    vec![issue(
        "bundle",
        "bundle-size",
        Severity::Medium,
        format!(
            "{} asset(s) exceed {} ({} combined)",
            offenders.len(),
            format_bytes(thresholds.asset_size_bytes),
            format_bytes(total)
        ),
        vec![
            "Split large chunks with dynamic imports",
            "Move rarely-used vendors into async chunks",
            "Audit images for uncompressed originals",
        ],
        offenders.iter().map(|r| r.path.clone()).collect(),
    )]
}

/// Cache rules: unhashed scripts/stylesheets cannot be cached long-term.
pub fn cache(report: &CacheReport) -> Vec<Issue> {
    let unversioned: Vec<String> = report
        .assets
        .iter()
        .filter(|a| {
            matches!(
                a.kind,
                crate::assets::AssetKind::Js | crate::assets::AssetKind::Css
            ) && !a.has_content_hash
        })
        .map(|a| a.path.clone())
        .collect();

    if unversioned.is_empty() {
        return Vec::new();
    }

    vec![issue(
        "cache",
        "versioning",
        Severity::Medium,
        format!(
            "{} script/stylesheet file(s) lack content hashes and cannot be cached immutably",
            unversioned.len()
        ),
        vec![
            "Enable content hashing in the bundler output filenames",
            "Serve hashed filenames with an immutable Cache-Control header",
        ],
        unversioned,
    )]
}
