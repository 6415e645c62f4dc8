#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pagepulse library
//!
//! This library provides the core functionality for the pagepulse
//! performance monitoring and optimization pipeline. It can be used
//! programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Collecting web vitals for one page view:
//!
//! ```
//! use pagepulse::vitals::{PerformanceEntry, VitalsCollector, VitalsConfig};
//!
//! // Forced inclusion; production collectors draw once per session
//! let mut collector = VitalsCollector::with_decision(VitalsConfig::default(), true);
//!
//! collector.observe(PerformanceEntry::LargestContentfulPaint { start_time_ms: 1800.0 });
//! collector.observe(PerformanceEntry::LayoutShift { value: 0.02, had_recent_input: false });
//! collector.freeze_lcp();
//!
//! let payload = collector.payload();
//! assert_eq!(payload.lcp_ms, Some(1800.0));
//! assert_eq!(payload.cls, 0.02);
//! ```
//!
//! # Advanced Example: Rule Engine
//!
//! Evaluating thresholds over normalized metric bundles:
//!
//! ```
//! use pagepulse::bundles::{BundleKind, MetricBundle};
//! use pagepulse::optimizer::{OptimizationEngine, PipelineInput, Severity};
//!
//! let input = PipelineInput {
//!     frontend: Some(
//!         MetricBundle::new(BundleKind::Frontend)
//!             .with("lcp", 4200.0)
//!             .with("cls", 0.02),
//!     ),
//!     ..PipelineInput::default()
//! };
//!
//! let evaluation = OptimizationEngine::default().evaluate(&input);
//! let issues = evaluation.all_issues();
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].issue_type, "lcp");
//! assert_eq!(issues[0].severity, Severity::High);
//! ```

/// Static asset scanning and heuristics
pub mod assets;
/// Normalized metric bundles shared across collectors
pub mod bundles;
/// Cache policy classification and derived artifacts
pub mod cache;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file loading and validation
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Threshold rule engine and fix enumeration
pub mod optimizer;
/// Report construction and persistence
pub mod report;
/// Backend request monitoring and system snapshots
pub mod server;
/// Frontend web vitals collection
pub mod vitals;
