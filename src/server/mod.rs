//! Backend request collector.
//!
//! A [`RequestMonitor`] is an explicit instance owned by the host
//! application (created at startup, disposed at shutdown). It wraps request
//! handling through [`RequestMonitor::observe`] or the
//! [`RequestMonitor::measure`] interceptor, samples each request
//! independently, and keeps sampled records in a fixed-capacity ring buffer.
//! Aggregate statistics are recomputed on demand from a snapshot.

/// Fixed-capacity FIFO buffer
pub mod ring;
/// Periodic system/database snapshots
pub mod snapshot;
/// Aggregate statistics
pub mod stats;

pub use ring::RingBuffer;
pub use snapshot::{
    DatabaseMetrics, DatabaseProbe, HostSystemProbe, Snapshot, SnapshotSampler, SystemMetrics,
    SystemProbe, UnavailableDatabaseProbe, DEFAULT_SNAPSHOT_INTERVAL,
};
pub use stats::{summarize, RequestSummary};

use crate::bundles::{BundleKind, MetricBundle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One sampled request observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// HTTP method
    pub method: String,
    /// Request path
    pub path: String,
    /// Response status code
    pub status_code: u16,
    /// Handler duration in milliseconds
    pub duration_ms: f64,
    /// Resident memory delta across the handler (bytes, may be negative)
    pub memory_delta_bytes: i64,
    /// When the request completed
    pub timestamp: DateTime<Utc>,
}

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Fraction of requests sampled, within [0, 1]
    pub sample_rate: f64,
    /// Duration above which a single request fires the slow alert (ms)
    pub slow_threshold_ms: f64,
    /// Ring buffer capacity
    pub history_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 0.1,
            slow_threshold_ms: 1000.0,
            history_size: 1000,
        }
    }
}

/// Callback invoked when a sampled request exceeds the slow threshold.
pub type SlowRequestAlert = Box<dyn Fn(&RequestRecord) + Send + Sync>;

/// Per-request sampling decision source; injectable for deterministic tests.
type SampleDecider = Box<dyn Fn() -> bool + Send + Sync>;

/// In-process request telemetry collector.
pub struct RequestMonitor {
    config: MonitorConfig,
    ring: RingBuffer<RequestRecord>,
    decider: SampleDecider,
    alert: Option<SlowRequestAlert>,
}

impl RequestMonitor {
    /// Create a monitor sampling with a uniform draw per request.
    pub fn new(config: MonitorConfig) -> Self {
        let sample_rate = config.sample_rate;
        Self::with_decider(config, Box::new(move || rand::random::<f64>() < sample_rate))
    }

    /// Create a monitor with an injected sampling decision source.
    pub fn with_decider(config: MonitorConfig, decider: SampleDecider) -> Self {
        let ring = RingBuffer::new(config.history_size);
        Self {
            config,
            ring,
            decider,
            alert: None,
        }
    }

    /// Register the slow-request alert callback.
    pub fn on_slow_request(&mut self, alert: SlowRequestAlert) {
        self.alert = Some(alert);
    }

    /// Observe one completed request.
    ///
    /// The sampling draw happens here, independently per request. Sampled
    /// requests are recorded; a sampled request over the slow threshold
    /// fires the alert immediately, regardless of aggregate statistics.
    pub fn observe(
        &self,
        method: &str,
        path: &str,
        status_code: u16,
        duration_ms: f64,
        memory_delta_bytes: i64,
    ) {
        if !(self.decider)() {
            return;
        }

        let record = RequestRecord {
            method: method.to_string(),
            path: path.to_string(),
            status_code,
            duration_ms,
            memory_delta_bytes,
            timestamp: Utc::now(),
        };

        if duration_ms > self.config.slow_threshold_ms {
            if let Some(alert) = &self.alert {
                alert(&record);
            }
        }

        self.ring.push(record);
    }

    /// Interceptor wrapper: time a handler and observe its outcome.
    ///
    /// This replaces response-object patching with an explicit wrapper
    /// registered at the framework's extension point.
    pub fn measure<R, F>(&self, method: &str, path: &str, handler: F) -> R
    where
        F: FnOnce() -> (u16, R),
    {
        let started = Instant::now();
        let (status_code, result) = handler();
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.observe(method, path, status_code, duration_ms, 0);
        result
    }

    /// Current aggregate summary, recomputed from a buffer snapshot.
    pub fn summary(&self) -> Option<RequestSummary> {
        summarize(&self.ring.snapshot())
    }

    /// Snapshot of the raw sampled records, oldest first.
    pub fn records(&self) -> Vec<RequestRecord> {
        self.ring.snapshot()
    }

    /// Reduce current state to a normalized backend bundle.
    ///
    /// Returns `None` when no requests have been sampled yet. System fields
    /// come from the latest sampler snapshot when one is supplied.
    pub fn to_bundle(&self, snapshot: Option<&Snapshot>) -> Option<MetricBundle> {
        let mut bundle = bundle_from_records(&self.ring.snapshot())?;

        if let Some(snapshot) = snapshot {
            bundle = bundle
                .with("memoryUsage", snapshot.system.memory_usage)
                .with("memoryUsedBytes", snapshot.system.memory_used_bytes)
                .with("cpuLoad", snapshot.system.cpu_load);
        }

        Some(bundle)
    }

    /// Reduce the latest snapshot's database metrics to a bundle, if present.
    pub fn database_bundle(snapshot: &Snapshot) -> Option<MetricBundle> {
        snapshot.database.map(|db| {
            MetricBundle::new(BundleKind::Database)
                .with("activeConnections", db.active_connections)
                .with("totalOperations", db.total_operations)
        })
    }
}

/// Reduce a set of request records to a normalized backend bundle.
///
/// Used by the live monitor and by offline ingestion of exported records.
/// Returns `None` for an empty set.
pub fn bundle_from_records(records: &[RequestRecord]) -> Option<MetricBundle> {
    let summary = summarize(records)?;
    Some(
        MetricBundle::new(BundleKind::Backend)
            .with("averageResponseTime", summary.mean_ms)
            .with("medianResponseTime", summary.median_ms)
            .with("p95ResponseTime", summary.p95_ms)
            .with("p99ResponseTime", summary.p99_ms)
            .with("errorRate", summary.error_rate)
            .with("requestCount", summary.count as u64),
    )
}
