//! Normalized metric bundles exchanged between collectors and the rule engine.
//!
//! Every collector reduces its typed summary to a [`MetricBundle`]: a flat map
//! of named numeric/boolean fields plus a timestamp. Bundles are immutable
//! once produced; the rule engine consumes any subset of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source category of a metric bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    /// In-browser runtime vitals
    Frontend,
    /// Server request telemetry
    Backend,
    /// Database connection/operation counters
    Database,
    /// Static asset / bundle analysis
    Bundle,
    /// Cache policy classification results
    Cache,
}

impl BundleKind {
    /// Stable lowercase name used in reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleKind::Frontend => "frontend",
            BundleKind::Backend => "backend",
            BundleKind::Database => "database",
            BundleKind::Bundle => "bundle",
            BundleKind::Cache => "cache",
        }
    }
}

/// A single field value inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric measurement (durations, sizes, rates)
    Number(f64),
    /// Boolean flag
    Flag(bool),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Number(v as f64)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Flag(v)
    }
}

/// Flat, immutable map of named fields produced by one collector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    /// Which collector produced this bundle
    pub kind: BundleKind,
    /// When the bundle was produced
    pub timestamp: DateTime<Utc>,
    /// Named fields (sorted map keeps serialization deterministic)
    fields: BTreeMap<String, MetricValue>,
}

impl MetricBundle {
    /// Create an empty bundle stamped with the current time.
    pub fn new(kind: BundleKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field during construction (builder style).
    pub fn with(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Look up a numeric field, `None` if absent or not a number.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(MetricValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Look up a boolean field, `None` if absent or not a flag.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(MetricValue::Flag(f)) => Some(*f),
            _ => None,
        }
    }

    /// Number of fields in the bundle.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the bundle carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
