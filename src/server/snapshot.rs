//! Periodic system/database snapshot sampling.
//!
//! A dedicated timer thread captures process memory and, when a database
//! probe is live, connection/operation counters. Only the latest snapshot is
//! kept (no time series); the slot is replaced as a whole `Arc` so readers
//! never observe a partially-written snapshot.

use chrono::{DateTime, Utc};
use log::warn;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Process/system resource metrics for one snapshot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Resident memory used by the process (bytes)
    pub memory_used_bytes: u64,
    /// Used fraction of available memory, within [0, 1]
    pub memory_usage: f64,
    /// One-minute load average divided by logical CPU count
    pub cpu_load: f64,
}

/// Database counters for one snapshot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetrics {
    /// Open connections
    pub active_connections: u64,
    /// Operations executed since process start
    pub total_operations: u64,
}

/// A point-in-time system/database snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the cycle ran
    pub captured_at: DateTime<Utc>,
    /// Process/system metrics
    pub system: SystemMetrics,
    /// Database metrics; absent when the database was unreachable this cycle
    pub database: Option<DatabaseMetrics>,
}

/// Source of system metrics.
pub trait SystemProbe: Send + 'static {
    /// Sample current process/system metrics. Must not fail; unknown values
    /// report as zero.
    fn sample(&self) -> SystemMetrics;
}

/// Source of database counters.
pub trait DatabaseProbe: Send + 'static {
    /// Sample database counters, or describe why the database is
    /// unreachable this cycle.
    fn sample(&self) -> Result<DatabaseMetrics, String>;
}

/// System probe reading `/proc` on Linux, zeros elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSystemProbe;

impl SystemProbe for HostSystemProbe {
    #[cfg(target_os = "linux")]
    fn sample(&self) -> SystemMetrics {
        let page_size = 4096u64;
        let resident_pages = std::fs::read_to_string("/proc/self/statm")
            .ok()
            .and_then(|s| s.split_whitespace().nth(1).and_then(|v| v.parse::<u64>().ok()))
            .unwrap_or(0);
        let memory_used_bytes = resident_pages * page_size;

        let total_bytes = std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("MemTotal:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .and_then(|kb| kb.parse::<u64>().ok())
            })
            .map(|kb| kb * 1024)
            .unwrap_or(0);

        let memory_usage = if total_bytes > 0 {
            memory_used_bytes as f64 / total_bytes as f64
        } else {
            0.0
        };

        let cpu_load = std::fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|s| s.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()))
            .map(|load| load / std::thread::available_parallelism().map_or(1, |n| n.get()) as f64)
            .unwrap_or(0.0);

        SystemMetrics {
            memory_used_bytes,
            memory_usage,
            cpu_load,
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn sample(&self) -> SystemMetrics {
        SystemMetrics {
            memory_used_bytes: 0,
            memory_usage: 0.0,
            cpu_load: 0.0,
        }
    }
}

/// Database probe for hosts without a live connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableDatabaseProbe;

impl DatabaseProbe for UnavailableDatabaseProbe {
    fn sample(&self) -> Result<DatabaseMetrics, String> {
        Err("no database connection configured".to_string())
    }
}

/// Default interval between snapshot cycles.
pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic snapshot sampler. Single writer, many readers.
pub struct SnapshotSampler {
    slot: Arc<RwLock<Option<Arc<Snapshot>>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotSampler {
    /// Start a sampler thread: one cycle immediately, then every `interval`.
    pub fn start<S, D>(interval: Duration, system: S, database: D) -> Self
    where
        S: SystemProbe,
        D: DatabaseProbe,
    {
        let slot: Arc<RwLock<Option<Arc<Snapshot>>>> = Arc::new(RwLock::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_slot = Arc::clone(&slot);
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            loop {
                let snapshot = capture_cycle(&system, &database);
                *thread_slot.write() = Some(Arc::new(snapshot));

                // Sleep in short slices so stop() is responsive.
                let mut remaining = interval;
                while !remaining.is_zero() {
                    if thread_stop.load(Ordering::Relaxed) {
                        return;
                    }
                    let slice = remaining.min(Duration::from_millis(100));
                    std::thread::sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
                if thread_stop.load(Ordering::Relaxed) {
                    return;
                }
            }
        });

        Self {
            slot,
            stop,
            handle: Some(handle),
        }
    }

    /// Latest snapshot, if at least one cycle has completed.
    ///
    /// The whole `Arc` is swapped per cycle, so the returned snapshot is
    /// always internally consistent.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().clone()
    }

    /// Stop the sampler and join its thread.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SnapshotSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_cycle<S: SystemProbe, D: DatabaseProbe>(system: &S, database: &D) -> Snapshot {
    let database_metrics = match database.sample() {
        Ok(metrics) => Some(metrics),
        Err(reason) => {
            // Never fatal to the host; this cycle just omits db metrics.
            warn!("database snapshot skipped: {}", reason);
            None
        }
    };

    Snapshot {
        captured_at: Utc::now(),
        system: system.sample(),
        database: database_metrics,
    }
}
