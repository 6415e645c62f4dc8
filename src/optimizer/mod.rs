//! Optimization rule engine.
//!
//! A synchronous, stateless pass over the (possibly partial) set of
//! normalized collector outputs. Each rule is a pure function of bundle
//! fields and produces at most one issue; a category with no input is
//! skipped with a recorded reason, and a rule whose required field is
//! missing is skipped alone while the rest proceed.

/// Automated fix enumeration
pub mod fixes;
/// The threshold rule catalogue
pub mod rules;

pub use fixes::{enumerate_fixes, FixDescriptor};

use crate::assets::BundleAnalysis;
use crate::bundles::MetricBundle;
use crate::cache::CacheReport;
use crate::config::ThresholdSettings;
use serde::{Deserialize, Serialize};

/// Issue severity. Ordering follows severity rank (high sorts greatest).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nice to fix
    Low,
    /// Should fix
    Medium,
    /// Fix now
    High,
}

impl Severity {
    /// Ordinal rank: high=3, medium=2, low=1.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

/// One finding produced by exactly one rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Category the producing rule belongs to
    pub category: String,
    /// Stable rule identifier, e.g. `response-time`
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Ordered recommendations; the first is the primary action
    pub recommendations: Vec<String>,
    /// Related identifiers (offending asset paths, field names)
    pub related: Vec<String>,
}

/// The (possibly partial) set of collector outputs the engine consumes.
///
/// Callers pass owned copies; the evaluation itself holds no locks and no
/// mutable state.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    /// Frontend vitals bundle
    pub frontend: Option<MetricBundle>,
    /// Backend request/system bundle
    pub backend: Option<MetricBundle>,
    /// Full asset analysis
    pub bundle: Option<BundleAnalysis>,
    /// Cache classification
    pub cache: Option<CacheReport>,
}

/// Issues for one category, or the reason the category was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySection {
    /// Category name
    pub category: String,
    /// Whether input data was present for the category
    pub evaluated: bool,
    /// Stated reason when the category was skipped
    pub skip_reason: Option<String>,
    /// Issues in rule order
    pub issues: Vec<Issue>,
}

/// Full engine output: per-category sections in fixed discovery order plus
/// the severity-ranked prioritized list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Sections in category iteration order
    pub categories: Vec<CategorySection>,
    /// Top issues by severity then discovery order, at most
    /// [`PRIORITIZED_LIMIT`]
    pub prioritized: Vec<Issue>,
}

/// Maximum number of prioritized actions surfaced per run.
pub const PRIORITIZED_LIMIT: usize = 10;

impl Evaluation {
    /// All issues across categories, in discovery order.
    pub fn all_issues(&self) -> Vec<&Issue> {
        self.categories
            .iter()
            .flat_map(|section| section.issues.iter())
            .collect()
    }

    /// Total issue count.
    pub fn total_issues(&self) -> usize {
        self.categories.iter().map(|s| s.issues.len()).sum()
    }
}

/// Threshold rule engine.
#[derive(Debug, Clone, Default)]
pub struct OptimizationEngine {
    thresholds: ThresholdSettings,
}

impl OptimizationEngine {
    /// Create an engine with the given thresholds.
    pub fn new(thresholds: ThresholdSettings) -> Self {
        Self { thresholds }
    }

    /// Evaluate the full rule catalogue over the input.
    ///
    /// Pure: same input yields the same issue set, in the same order.
    pub fn evaluate(&self, input: &PipelineInput) -> Evaluation {
        let mut categories = Vec::with_capacity(4);

        categories.push(section(
            "frontend",
            input.frontend.as_ref().map(|b| rules::frontend(&self.thresholds, b)),
            "no frontend vitals collected",
        ));
        categories.push(section(
            "backend",
            input.backend.as_ref().map(|b| rules::backend(&self.thresholds, b)),
            "no backend telemetry collected",
        ));
        categories.push(section(
            "bundle",
            input.bundle.as_ref().map(|a| rules::bundle(&self.thresholds, a)),
            "no bundle analysis available",
        ));
        categories.push(section(
            "cache",
            input.cache.as_ref().map(rules::cache),
            "no cache classification available",
        ));

        let discovered: Vec<Issue> = categories
            .iter()
            .flat_map(|s| s.issues.iter().cloned())
            .collect();
        let prioritized = prioritize(&discovered);

        Evaluation {
            categories,
            prioritized,
        }
    }
}

fn section(
    category: &str,
    issues: Option<Vec<Issue>>,
    skip_reason: &str,
) -> CategorySection {
    match issues {
        Some(issues) => CategorySection {
            category: category.to_string(),
            evaluated: true,
            skip_reason: None,
            issues,
        },
        None => CategorySection {
            category: category.to_string(),
            evaluated: false,
            skip_reason: Some(skip_reason.to_string()),
            issues: Vec::new(),
        },
    }
}

/// Stable-sort issues by severity rank descending and truncate.
///
/// Ties preserve discovery order, so no high-severity issue ever appears
/// after a medium or low one.
pub fn prioritize(issues: &[Issue]) -> Vec<Issue> {
    let mut sorted: Vec<Issue> = issues.to_vec();
    sorted.sort_by_key(|issue| std::cmp::Reverse(issue.severity.rank()));
    sorted.truncate(PRIORITIZED_LIMIT);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::BundleKind;

    fn issue(category: &str, issue_type: &str, severity: Severity) -> Issue {
        Issue {
            category: category.to_string(),
            issue_type: issue_type.to_string(),
            severity,
            description: format!("{} issue", issue_type),
            recommendations: vec!["do the thing".to_string()],
            related: vec![],
        }
    }

    #[test]
    fn test_severity_ordering_and_ranks() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::High.rank(), 3);
        assert_eq!(Severity::Medium.rank(), 2);
        assert_eq!(Severity::Low.rank(), 1);
    }

    #[test]
    fn test_prioritize_orders_by_severity_then_discovery() {
        // Scenario E: 5 high, 4 medium, 3 low discovered in that order
        let mut issues = Vec::new();
        for i in 0..5 {
            issues.push(issue("a", &format!("high-{}", i), Severity::High));
        }
        for i in 0..4 {
            issues.push(issue("b", &format!("medium-{}", i), Severity::Medium));
        }
        for i in 0..3 {
            issues.push(issue("c", &format!("low-{}", i), Severity::Low));
        }

        let prioritized = prioritize(&issues);

        assert_eq!(prioritized.len(), 10);
        let types: Vec<&str> = prioritized.iter().map(|i| i.issue_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "high-0", "high-1", "high-2", "high-3", "high-4", "medium-0", "medium-1",
                "medium-2", "medium-3", "low-0"
            ]
        );
    }

    #[test]
    fn test_prioritize_is_stable_within_rank() {
        let issues = vec![
            issue("x", "first", Severity::Medium),
            issue("y", "second", Severity::Medium),
            issue("z", "third", Severity::High),
        ];
        let prioritized = prioritize(&issues);
        assert_eq!(prioritized[0].issue_type, "third");
        assert_eq!(prioritized[1].issue_type, "first");
        assert_eq!(prioritized[2].issue_type, "second");
    }

    #[test]
    fn test_no_high_after_lower_severity() {
        let issues = vec![
            issue("a", "m", Severity::Medium),
            issue("a", "h1", Severity::High),
            issue("a", "l", Severity::Low),
            issue("a", "h2", Severity::High),
        ];
        let prioritized = prioritize(&issues);
        let last_high = prioritized
            .iter()
            .rposition(|i| i.severity == Severity::High)
            .unwrap();
        let first_lower = prioritized
            .iter()
            .position(|i| i.severity != Severity::High)
            .unwrap();
        assert!(last_high < first_lower);
    }

    #[test]
    fn test_absent_categories_are_skipped_with_reason() {
        let engine = OptimizationEngine::default();
        let evaluation = engine.evaluate(&PipelineInput::default());

        assert_eq!(evaluation.categories.len(), 4);
        for section in &evaluation.categories {
            assert!(!section.evaluated);
            assert!(section.skip_reason.is_some());
            assert!(section.issues.is_empty());
        }
        assert!(evaluation.prioritized.is_empty());
        assert_eq!(evaluation.total_issues(), 0);
    }

    #[test]
    fn test_same_input_yields_same_evaluation() {
        let engine = OptimizationEngine::default();
        let input = PipelineInput {
            frontend: Some(
                MetricBundle::new(BundleKind::Frontend)
                    .with("lcp", 4000.0)
                    .with("cls", 0.4),
            ),
            ..PipelineInput::default()
        };

        let first = engine.evaluate(&input);
        let second = engine.evaluate(&input);
        assert_eq!(first.categories, second.categories);
        assert_eq!(first.prioritized, second.prioritized);
    }

    #[test]
    fn test_category_order_is_fixed() {
        let engine = OptimizationEngine::default();
        let evaluation = engine.evaluate(&PipelineInput::default());
        let names: Vec<&str> = evaluation
            .categories
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(names, vec!["frontend", "backend", "bundle", "cache"]);
    }
}
