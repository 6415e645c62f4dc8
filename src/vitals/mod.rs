//! Frontend runtime collector for Core Web Vitals.
//!
//! The collector is fed typed performance entries by the host page runtime
//! (a Performance Observer bridge) and reduces them to a session payload:
//! LCP, FID, CLS, FCP, per-resource timing breakdowns, and a bounded error
//! log. One uniform draw per page view decides inclusion for the entire
//! session so a session's metrics stay internally consistent.
//!
//! Missing observer support degrades to a partial payload; nothing in this
//! module is allowed to fail the host page.

/// Best-effort payload transport
pub mod beacon;

use crate::bundles::{BundleKind, MetricBundle};
use serde::{Deserialize, Serialize};

/// Maximum number of page errors retained per session
pub const MAX_ERRORS: usize = 50;

/// Configuration for the vitals collector
#[derive(Debug, Clone)]
pub struct VitalsConfig {
    /// Fraction of page views included, within [0, 1]
    pub sample_rate: f64,
    /// Endpoint receiving the payload POST, if any
    pub endpoint: Option<String>,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            sample_rate: 0.1,
            endpoint: None,
        }
    }
}

/// A performance timeline entry delivered by the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEntry {
    /// A largest-contentful-paint candidate
    LargestContentfulPaint {
        /// Render timestamp relative to navigation start (ms)
        start_time_ms: f64,
    },
    /// A first-input entry
    FirstInput {
        /// Input timestamp (ms)
        start_time_ms: f64,
        /// When the handler started processing (ms)
        processing_start_ms: f64,
    },
    /// A layout-shift entry
    LayoutShift {
        /// Shift score contribution
        value: f64,
        /// Whether the shift followed recent user input
        had_recent_input: bool,
    },
    /// A paint timing entry
    Paint {
        /// Entry name, e.g. `first-contentful-paint`
        name: String,
        /// Paint timestamp (ms)
        start_time_ms: f64,
    },
    /// A resource timing entry
    Resource(ResourceEntry),
}

/// Raw resource timing fields as reported by the browser.
///
/// Cross-origin entries without a timing-allow-origin header report zeroed
/// sub-timestamps; the derived intervals are clamped to zero for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Resource URL
    pub name: String,
    /// Fetch start (ms)
    pub start_time_ms: f64,
    /// DNS lookup start (ms)
    pub domain_lookup_start_ms: f64,
    /// DNS lookup end (ms)
    pub domain_lookup_end_ms: f64,
    /// TCP connect start (ms)
    pub connect_start_ms: f64,
    /// TCP connect end (ms)
    pub connect_end_ms: f64,
    /// Request sent (ms)
    pub request_start_ms: f64,
    /// First response byte (ms)
    pub response_start_ms: f64,
    /// Last response byte (ms)
    pub response_end_ms: f64,
    /// Bytes transferred over the network
    pub transfer_size_bytes: u64,
}

/// Derived per-resource timing breakdown with clamped sub-intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTiming {
    /// Resource URL
    pub name: String,
    /// Total fetch duration (ms)
    pub duration_ms: f64,
    /// DNS lookup interval (ms)
    pub dns_ms: f64,
    /// TCP connect interval (ms)
    pub connect_ms: f64,
    /// Time to first byte (ms)
    pub ttfb_ms: f64,
    /// Download interval (ms)
    pub download_ms: f64,
    /// Bytes transferred
    pub transfer_size_bytes: u64,
}

impl ResourceTiming {
    /// Compute clamped sub-intervals from a raw entry.
    fn from_entry(entry: &ResourceEntry) -> Self {
        // Cross-origin privacy redaction zeroes timestamps, which would
        // otherwise produce negative intervals.
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };

        Self {
            name: entry.name.clone(),
            duration_ms: clamp(entry.response_end_ms - entry.start_time_ms),
            dns_ms: clamp(entry.domain_lookup_end_ms - entry.domain_lookup_start_ms),
            connect_ms: clamp(entry.connect_end_ms - entry.connect_start_ms),
            ttfb_ms: clamp(entry.response_start_ms - entry.request_start_ms),
            download_ms: clamp(entry.response_end_ms - entry.response_start_ms),
            transfer_size_bytes: entry.transfer_size_bytes,
        }
    }
}

/// Kind of captured page error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageErrorKind {
    /// Uncaught exception from the global error handler
    Javascript,
    /// Unhandled promise rejection
    Promise,
    /// Failed resource load
    Resource,
}

/// A captured page error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageError {
    /// Error kind
    pub kind: PageErrorKind,
    /// Error message
    pub message: String,
    /// Script or resource URL, if known
    pub source: Option<String>,
}

/// Session payload sent to the metrics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsPayload {
    /// Largest contentful paint (ms), if observed
    pub lcp_ms: Option<f64>,
    /// First input delay (ms), if an input occurred
    pub fid_ms: Option<f64>,
    /// Cumulative layout shift score
    pub cls: f64,
    /// First contentful paint (ms), if observed
    pub fcp_ms: Option<f64>,
    /// Per-resource timing breakdowns
    pub resources: Vec<ResourceTiming>,
    /// Captured page errors (bounded)
    pub errors: Vec<PageError>,
    /// True when observer support was missing and the payload is partial
    pub degraded: bool,
}

impl VitalsPayload {
    /// Reduce the payload to a normalized frontend bundle.
    ///
    /// Absent vitals leave their field out of the bundle rather than
    /// writing a sentinel value.
    pub fn to_bundle(&self) -> MetricBundle {
        let mut bundle = MetricBundle::new(BundleKind::Frontend)
            .with("cls", self.cls)
            .with("errorCount", self.errors.len() as u64)
            .with("degraded", self.degraded);
        if let Some(lcp) = self.lcp_ms {
            bundle = bundle.with("lcp", lcp);
        }
        if let Some(fid) = self.fid_ms {
            bundle = bundle.with("fid", fid);
        }
        if let Some(fcp) = self.fcp_ms {
            bundle = bundle.with("fcp", fcp);
        }
        bundle
    }
}

/// Per-session vitals collector.
///
/// Created once per page view; the inclusion decision is made at
/// construction and applies to every metric in the session.
#[derive(Debug)]
pub struct VitalsCollector {
    config: VitalsConfig,
    included: bool,
    lcp_ms: Option<f64>,
    lcp_frozen: bool,
    fid_ms: Option<f64>,
    cls: f64,
    fcp_ms: Option<f64>,
    resources: Vec<ResourceTiming>,
    errors: Vec<PageError>,
    degraded: bool,
    sent: bool,
}

impl VitalsCollector {
    /// Create a collector, drawing the session inclusion decision once.
    pub fn new(config: VitalsConfig) -> Self {
        let included = rand::random::<f64>() < config.sample_rate;
        Self::with_decision(config, included)
    }

    /// Create a collector with a forced inclusion decision (for tests and
    /// host runtimes with their own sampling).
    pub fn with_decision(config: VitalsConfig, included: bool) -> Self {
        Self {
            config,
            included,
            lcp_ms: None,
            lcp_frozen: false,
            fid_ms: None,
            cls: 0.0,
            fcp_ms: None,
            resources: Vec::new(),
            errors: Vec::new(),
            degraded: false,
            sent: false,
        }
    }

    /// Whether this session was included by the sampling draw.
    pub fn is_included(&self) -> bool {
        self.included
    }

    /// Mark the session as degraded (observer API unsupported).
    ///
    /// The payload stays partial; this is never an error.
    pub fn mark_degraded(&mut self) {
        self.degraded = true;
    }

    /// Feed one performance entry into the session.
    pub fn observe(&mut self, entry: PerformanceEntry) {
        if !self.included {
            return;
        }
        match entry {
            PerformanceEntry::LargestContentfulPaint { start_time_ms } => {
                // Last candidate before the freeze wins
                if !self.lcp_frozen {
                    self.lcp_ms = Some(start_time_ms);
                }
            }
            PerformanceEntry::FirstInput {
                start_time_ms,
                processing_start_ms,
            } => {
                if self.fid_ms.is_none() {
                    self.fid_ms = Some((processing_start_ms - start_time_ms).max(0.0));
                }
                // First interaction also freezes LCP
                self.freeze_lcp();
            }
            PerformanceEntry::LayoutShift {
                value,
                had_recent_input,
            } => {
                if !had_recent_input && value > 0.0 {
                    self.cls += value;
                }
            }
            PerformanceEntry::Paint {
                name,
                start_time_ms,
            } => {
                if name == "first-contentful-paint" && self.fcp_ms.is_none() {
                    self.fcp_ms = Some(start_time_ms);
                }
            }
            PerformanceEntry::Resource(raw) => {
                self.resources.push(ResourceTiming::from_entry(&raw));
            }
        }
    }

    /// Stop accepting LCP candidates (first interaction or tab hide).
    pub fn freeze_lcp(&mut self) {
        self.lcp_frozen = true;
    }

    /// Record a captured page error; the log is bounded to [`MAX_ERRORS`].
    pub fn record_error(&mut self, error: PageError) {
        if !self.included || self.errors.len() >= MAX_ERRORS {
            return;
        }
        self.errors.push(error);
    }

    /// Current cumulative layout shift score.
    pub fn cls(&self) -> f64 {
        self.cls
    }

    /// Build the session payload.
    pub fn payload(&self) -> VitalsPayload {
        VitalsPayload {
            lcp_ms: self.lcp_ms,
            fid_ms: self.fid_ms,
            cls: self.cls,
            fcp_ms: self.fcp_ms,
            resources: self.resources.clone(),
            errors: self.errors.clone(),
            degraded: self.degraded,
        }
    }

    /// Reduce the session to a normalized metric bundle.
    ///
    /// Returns `None` for excluded sessions; absent vitals simply leave
    /// their field out of the bundle.
    pub fn to_bundle(&self) -> Option<MetricBundle> {
        if !self.included {
            return None;
        }
        Some(self.payload().to_bundle())
    }

    /// Send the payload once, best-effort, through the given beacon.
    ///
    /// Exactly one send per included page view; repeated calls, excluded
    /// sessions, and missing endpoints are all no-ops. Transport failures
    /// are swallowed with a warning.
    pub fn flush<B: beacon::Beacon>(&mut self, beacon: &B) {
        if !self.included || self.sent {
            return;
        }
        let Some(endpoint) = self.config.endpoint.clone() else {
            return;
        };
        self.sent = true;
        beacon.send(&endpoint, &self.payload());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn included_collector() -> VitalsCollector {
        VitalsCollector::with_decision(VitalsConfig::default(), true)
    }

    #[test]
    fn test_lcp_takes_last_candidate_before_freeze() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 800.0 });
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 1600.0 });
        c.freeze_lcp();
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 2400.0 });

        assert_eq!(c.payload().lcp_ms, Some(1600.0));
    }

    #[test]
    fn test_first_input_freezes_lcp_and_sets_fid_once() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 900.0 });
        c.observe(PerformanceEntry::FirstInput {
            start_time_ms: 1000.0,
            processing_start_ms: 1060.0,
        });
        // Later inputs and LCP candidates are ignored
        c.observe(PerformanceEntry::FirstInput {
            start_time_ms: 2000.0,
            processing_start_ms: 2500.0,
        });
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 3000.0 });

        let payload = c.payload();
        assert_eq!(payload.fid_ms, Some(60.0));
        assert_eq!(payload.lcp_ms, Some(900.0));
    }

    #[test]
    fn test_cls_sums_only_shifts_without_recent_input() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::LayoutShift {
            value: 0.05,
            had_recent_input: false,
        });
        c.observe(PerformanceEntry::LayoutShift {
            value: 0.2,
            had_recent_input: true,
        });
        c.observe(PerformanceEntry::LayoutShift {
            value: 0.03,
            had_recent_input: false,
        });

        assert!((c.cls() - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_cls_is_monotone_non_decreasing() {
        let mut c = included_collector();
        let mut last = 0.0;
        for value in [0.01, 0.0, 0.07, 0.002] {
            c.observe(PerformanceEntry::LayoutShift {
                value,
                had_recent_input: false,
            });
            assert!(c.cls() >= last);
            last = c.cls();
        }
    }

    #[test]
    fn test_fcp_matches_only_named_paint_entry() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::Paint {
            name: "first-paint".to_string(),
            start_time_ms: 300.0,
        });
        c.observe(PerformanceEntry::Paint {
            name: "first-contentful-paint".to_string(),
            start_time_ms: 450.0,
        });

        assert_eq!(c.payload().fcp_ms, Some(450.0));
    }

    #[test]
    fn test_resource_timing_clamps_redacted_intervals() {
        let mut c = included_collector();
        // Cross-origin entry: all sub-timestamps zeroed, response_end before start
        c.observe(PerformanceEntry::Resource(ResourceEntry {
            name: "https://cdn.example.com/lib.js".to_string(),
            start_time_ms: 100.0,
            domain_lookup_start_ms: 0.0,
            domain_lookup_end_ms: 0.0,
            connect_start_ms: 0.0,
            connect_end_ms: 0.0,
            request_start_ms: 0.0,
            response_start_ms: 0.0,
            response_end_ms: 0.0,
            transfer_size_bytes: 0,
        }));

        let timing = &c.payload().resources[0];
        assert_eq!(timing.duration_ms, 0.0);
        assert_eq!(timing.dns_ms, 0.0);
        assert_eq!(timing.ttfb_ms, 0.0);
        assert_eq!(timing.download_ms, 0.0);
    }

    #[test]
    fn test_resource_timing_computes_sub_intervals() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::Resource(ResourceEntry {
            name: "/static/app.js".to_string(),
            start_time_ms: 100.0,
            domain_lookup_start_ms: 100.0,
            domain_lookup_end_ms: 110.0,
            connect_start_ms: 110.0,
            connect_end_ms: 140.0,
            request_start_ms: 140.0,
            response_start_ms: 220.0,
            response_end_ms: 300.0,
            transfer_size_bytes: 42_000,
        }));

        let timing = &c.payload().resources[0];
        assert_eq!(timing.dns_ms, 10.0);
        assert_eq!(timing.connect_ms, 30.0);
        assert_eq!(timing.ttfb_ms, 80.0);
        assert_eq!(timing.download_ms, 80.0);
        assert_eq!(timing.duration_ms, 200.0);
    }

    #[test]
    fn test_error_log_is_bounded() {
        let mut c = included_collector();
        for i in 0..(MAX_ERRORS + 10) {
            c.record_error(PageError {
                kind: PageErrorKind::Javascript,
                message: format!("error {}", i),
                source: None,
            });
        }
        assert_eq!(c.payload().errors.len(), MAX_ERRORS);
    }

    #[test]
    fn test_excluded_session_collects_nothing() {
        let mut c = VitalsCollector::with_decision(VitalsConfig::default(), false);
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 1000.0 });
        c.record_error(PageError {
            kind: PageErrorKind::Promise,
            message: "rejected".to_string(),
            source: None,
        });

        assert!(c.payload().lcp_ms.is_none());
        assert!(c.payload().errors.is_empty());
        assert!(c.to_bundle().is_none());
    }

    #[test]
    fn test_degraded_payload_is_partial_not_an_error() {
        let mut c = included_collector();
        c.mark_degraded();
        let payload = c.payload();
        assert!(payload.degraded);
        assert!(payload.lcp_ms.is_none());

        let bundle = c.to_bundle().unwrap();
        assert_eq!(bundle.flag("degraded"), Some(true));
        assert_eq!(bundle.number("lcp"), None);
    }

    #[test]
    fn test_bundle_carries_observed_vitals() {
        let mut c = included_collector();
        c.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 1800.0 });
        c.observe(PerformanceEntry::FirstInput {
            start_time_ms: 2000.0,
            processing_start_ms: 2050.0,
        });

        let bundle = c.to_bundle().unwrap();
        assert_eq!(bundle.number("lcp"), Some(1800.0));
        assert_eq!(bundle.number("fid"), Some(50.0));
        assert_eq!(bundle.number("cls"), Some(0.0));
    }

    #[test]
    fn test_sample_rate_extremes_are_deterministic() {
        let always = VitalsCollector::new(VitalsConfig {
            sample_rate: 1.0,
            endpoint: None,
        });
        assert!(always.is_included());

        let never = VitalsCollector::new(VitalsConfig {
            sample_rate: 0.0,
            endpoint: None,
        });
        assert!(!never.is_included());
    }
}
