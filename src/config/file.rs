//! Configuration file structure and validation

use serde::{Deserialize, Serialize};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = ".pagepulse.toml";

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    /// Frontend vitals collector settings
    #[serde(default)]
    pub frontend: FrontendSettings,
    /// Backend request collector settings
    #[serde(default)]
    pub backend: BackendSettings,
    /// Rule engine thresholds
    #[serde(default)]
    pub thresholds: ThresholdSettings,
    /// Cache classifier settings
    #[serde(default)]
    pub cache: CacheSettings,
    /// Report output settings
    #[serde(default)]
    pub report: ReportSettings,
}

/// Frontend vitals collector settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrontendSettings {
    /// Fraction of page views included in collection, within [0, 1]
    pub sample_rate: f64,
    /// Endpoint receiving the vitals beacon POST
    pub endpoint: Option<String>,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            sample_rate: 0.1,
            endpoint: None,
        }
    }
}

/// Backend request collector settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendSettings {
    /// Fraction of requests sampled, within [0, 1]
    pub sample_rate: f64,
    /// Single-request duration (ms) that fires an immediate alert
    pub slow_threshold_ms: f64,
    /// Ring buffer capacity for request records
    pub history_size: usize,
    /// Interval between system/database snapshots, in seconds
    pub snapshot_interval_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            sample_rate: 0.1,
            slow_threshold_ms: 1000.0,
            history_size: 1000,
            snapshot_interval_secs: 30,
        }
    }
}

/// Rule engine thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdSettings {
    /// LCP threshold in milliseconds
    pub lcp_ms: f64,
    /// FID threshold in milliseconds
    pub fid_ms: f64,
    /// CLS threshold (unitless score)
    pub cls: f64,
    /// Average response time warning threshold (ms)
    pub response_time_warn_ms: f64,
    /// Average response time critical threshold (ms)
    pub response_time_crit_ms: f64,
    /// Error rate threshold as a fraction
    pub error_rate: f64,
    /// Heap usage fraction above which memory is flagged
    pub memory_usage: f64,
    /// Single-asset size above which bundles are flagged (bytes)
    pub asset_size_bytes: u64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            lcp_ms: 2500.0,
            fid_ms: 100.0,
            cls: 0.1,
            response_time_warn_ms: 500.0,
            response_time_crit_ms: 1000.0,
            error_rate: 0.05,
            memory_usage: 0.8,
            asset_size_bytes: 1_000_000,
        }
    }
}

/// Cache classifier settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of entries in the precache manifest
    pub precache_limit: usize,
    /// Path prefix under which HTML responses are API documents (never cached)
    pub api_prefix: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            precache_limit: 50,
            api_prefix: "/api".to_string(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory receiving report artifacts
    pub output_dir: String,
    /// Whether to also render an HTML report
    pub html: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: "reports".to_string(),
            html: false,
        }
    }
}

impl ConfigFile {
    /// Validate configuration constraints.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.frontend.sample_rate) {
            return Err(format!(
                "frontend.sample_rate must be within [0, 1], got {}",
                self.frontend.sample_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.backend.sample_rate) {
            return Err(format!(
                "backend.sample_rate must be within [0, 1], got {}",
                self.backend.sample_rate
            ));
        }
        if self.backend.history_size == 0 {
            return Err("backend.history_size must be > 0".to_string());
        }
        if self.backend.slow_threshold_ms <= 0.0 {
            return Err("backend.slow_threshold_ms must be > 0".to_string());
        }
        if self.thresholds.response_time_warn_ms > self.thresholds.response_time_crit_ms {
            return Err(format!(
                "thresholds.response_time_warn_ms ({}) must not exceed response_time_crit_ms ({})",
                self.thresholds.response_time_warn_ms, self.thresholds.response_time_crit_ms
            ));
        }
        if self.cache.precache_limit == 0 {
            return Err("cache.precache_limit must be > 0".to_string());
        }
        Ok(())
    }
}
