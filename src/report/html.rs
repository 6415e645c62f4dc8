//! Minimal static HTML rendering of a report.
//!
//! No templating engine: the report is small and the layout fixed, so the
//! page is assembled with `write!` into a String.

use super::OptimizationReport;
use crate::optimizer::Severity;
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem;color:#1a1a2e}\
h1{font-size:1.5rem}h2{font-size:1.2rem;margin-top:2rem}\
table{border-collapse:collapse;width:100%}\
td,th{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
.high{color:#b00020;font-weight:600}.medium{color:#b36b00}.low{color:#2a6f2a}\
.skipped{color:#777;font-style:italic}";

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the report as a standalone HTML page.
pub fn render(report: &OptimizationReport) -> String {
    let mut page = String::with_capacity(4096);
    // write! to a String cannot fail
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>pagepulse report {}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape(&report.run_id),
        STYLE
    );
    let _ = write!(
        page,
        "<h1>pagepulse optimization report</h1>\n\
         <p>Run <code>{}</code> at {}</p>\n\
         <p>{} issue(s): <span class=\"high\">{} high</span>, \
         <span class=\"medium\">{} medium</span>, \
         <span class=\"low\">{} low</span></p>\n",
        escape(&report.run_id),
        report.timestamp.to_rfc3339(),
        report.summary.total_issues,
        report.summary.high,
        report.summary.medium,
        report.summary.low,
    );

    if !report.prioritized_actions.is_empty() {
        page.push_str("<h2>Prioritized actions</h2>\n<table>\n<tr><th>Severity</th><th>Type</th><th>Description</th><th>Recommendation</th></tr>\n");
        for issue in &report.prioritized_actions {
            let _ = write!(
                page,
                "<tr><td class=\"{}\">{:?}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                severity_class(issue.severity),
                issue.severity,
                escape(&issue.issue_type),
                escape(&issue.description),
                escape(issue.recommendations.first().map(String::as_str).unwrap_or("")),
            );
        }
        page.push_str("</table>\n");
    }

    for section in &report.categories {
        let _ = write!(page, "<h2>{}</h2>\n", escape(&section.category));
        if !section.evaluated {
            let _ = write!(
                page,
                "<p class=\"skipped\">skipped: {}</p>\n",
                escape(section.skip_reason.as_deref().unwrap_or("no data")),
            );
            continue;
        }
        if section.issues.is_empty() {
            page.push_str("<p>No issues found.</p>\n");
            continue;
        }
        page.push_str("<ul>\n");
        for issue in &section.issues {
            let _ = write!(
                page,
                "<li><span class=\"{}\">{:?}</span> <strong>{}</strong>: {}</li>\n",
                severity_class(issue.severity),
                issue.severity,
                escape(&issue.issue_type),
                escape(&issue.description),
            );
        }
        page.push_str("</ul>\n");
    }

    if !report.automated_fixes.is_empty() {
        page.push_str("<h2>Automated fixes</h2>\n<ul>\n");
        for fix in &report.automated_fixes {
            let _ = write!(
                page,
                "<li><code>{}</code>: {}</li>\n",
                escape(&fix.command),
                escape(&fix.description),
            );
        }
        page.push_str("</ul>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::{CategorySection, Evaluation, Issue};

    fn report_with(sections: Vec<CategorySection>, prioritized: Vec<Issue>) -> OptimizationReport {
        OptimizationReport::build(Evaluation {
            categories: sections,
            prioritized,
        })
    }

    #[test]
    fn test_render_escapes_markup_in_descriptions() {
        let issue = Issue {
            category: "frontend".to_string(),
            issue_type: "lcp".to_string(),
            severity: Severity::High,
            description: "<script>alert(1)</script>".to_string(),
            recommendations: vec!["fix & verify".to_string()],
            related: vec![],
        };
        let section = CategorySection {
            category: "frontend".to_string(),
            evaluated: true,
            skip_reason: None,
            issues: vec![issue.clone()],
        };
        let page = render(&report_with(vec![section], vec![issue]));

        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("fix &amp; verify"));
    }

    #[test]
    fn test_render_notes_skipped_categories() {
        let section = CategorySection {
            category: "cache".to_string(),
            evaluated: false,
            skip_reason: Some("no cache classification available".to_string()),
            issues: vec![],
        };
        let page = render(&report_with(vec![section], vec![]));
        assert!(page.contains("skipped: no cache classification available"));
    }

    #[test]
    fn test_render_is_a_complete_page() {
        let page = render(&report_with(vec![], vec![]));
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.ends_with("</html>\n"));
    }
}
