//! Report command implementation
//!
//! Handles the `pagepulse report` command: runs the full pipeline. Any
//! combination of inputs may be present; absent collectors become skipped
//! categories rather than errors. Only the final artifact write can fail
//! the run.

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

use crate::assets::AssetAnalyzer;
use crate::cache::CacheClassifier;
use crate::config::ConfigFile;
use crate::fmt::{CHART, CHECKMARK, SPARKLES, WARNING};
use crate::optimizer::{OptimizationEngine, PipelineInput, Severity};
use crate::report::{CancelToken, OptimizationReport, ReportWriter};
use crate::server::{self, RequestRecord};
use crate::vitals::VitalsPayload;

/// Inputs for one report run. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    /// Production build directory to scan
    pub build_dir: Option<PathBuf>,
    /// Exported frontend vitals payload (JSON)
    pub vitals_path: Option<PathBuf>,
    /// Exported backend request records (JSON array)
    pub backend_path: Option<PathBuf>,
}

/// Run the pipeline and write the report artifact(s).
pub fn cmd_report(
    config: &ConfigFile,
    inputs: &ReportInputs,
    html: bool,
    cancel: &CancelToken,
) -> Result<()> {
    println!(
        "{} {} Optimization Report",
        CHART,
        style("pagepulse").bold()
    );
    println!();

    let input = gather_inputs(config, inputs)?;

    // A cancelled run discards what it gathered and writes nothing.
    if cancel.is_cancelled() {
        println!("{} Run cancelled, no report written", WARNING);
        return Ok(());
    }

    let engine = OptimizationEngine::new(config.thresholds.clone());
    let evaluation = engine.evaluate(&input);

    if cancel.is_cancelled() {
        println!("{} Run cancelled, no report written", WARNING);
        return Ok(());
    }

    let report = OptimizationReport::build(evaluation);
    print_summary(&report);

    let writer = ReportWriter::new(&config.report.output_dir);
    let json_path = writer.write(&report)?;
    println!("{} Wrote {}", CHECKMARK, style(json_path.display()).cyan());

    if html || config.report.html {
        let html_path = writer.write_html(&report)?;
        println!("{} Wrote {}", CHECKMARK, style(html_path.display()).cyan());
    }

    println!();
    println!("{} Done", SPARKLES);
    Ok(())
}

/// Assemble the (possibly partial) pipeline input.
///
/// A named build directory that does not exist is an error; unnamed
/// inputs are simply absent.
fn gather_inputs(config: &ConfigFile, inputs: &ReportInputs) -> Result<PipelineInput> {
    let mut input = PipelineInput::default();

    if let Some(build_dir) = &inputs.build_dir {
        let analysis = AssetAnalyzer::new(build_dir).scan()?;
        let classifier = CacheClassifier::new(
            &config.cache.api_prefix,
            config.cache.precache_limit,
        );
        input.cache = Some(classifier.classify_assets(&analysis.records));
        input.bundle = Some(analysis);
    }

    if let Some(path) = &inputs.vitals_path {
        let payload = read_vitals(path)?;
        input.frontend = Some(payload.to_bundle());
    }

    if let Some(path) = &inputs.backend_path {
        let records = read_backend_records(path)?;
        input.backend = server::bundle_from_records(&records);
        if input.backend.is_none() {
            log::warn!("backend export {} contained no records", path.display());
        }
    }

    Ok(input)
}

fn read_vitals(path: &Path) -> Result<VitalsPayload> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read vitals export {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse vitals export {}", path.display()))
}

fn read_backend_records(path: &Path) -> Result<Vec<RequestRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backend export {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse backend export {}", path.display()))
}

fn print_summary(report: &OptimizationReport) {
    for section in &report.categories {
        if !section.evaluated {
            println!(
                "   {} {}",
                style(format!("{:<10}", section.category)).bold(),
                style(format!(
                    "skipped: {}",
                    section.skip_reason.as_deref().unwrap_or("no data")
                ))
                .dim()
            );
            continue;
        }
        println!(
            "   {} {} issue(s)",
            style(format!("{:<10}", section.category)).bold(),
            section.issues.len()
        );
        for issue in &section.issues {
            let severity = match issue.severity {
                Severity::High => style("high").red().bold(),
                Severity::Medium => style("medium").yellow(),
                Severity::Low => style("low").green(),
            };
            println!("      [{}] {}: {}", severity, issue.issue_type, issue.description);
        }
    }
    println!();
    println!(
        "   {} total, {} high / {} medium / {} low",
        style(report.summary.total_issues).bold(),
        style(report.summary.high).red(),
        style(report.summary.medium).yellow(),
        style(report.summary.low).green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use tempfile::TempDir;

    #[test]
    fn test_gather_inputs_with_nothing_is_all_absent() {
        let config = ConfigFile::default();
        let input = gather_inputs(&config, &ReportInputs::default()).unwrap();
        assert!(input.frontend.is_none());
        assert!(input.backend.is_none());
        assert!(input.bundle.is_none());
        assert!(input.cache.is_none());
    }

    #[test]
    fn test_gather_inputs_reads_vitals_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vitals.json");
        std::fs::write(
            &path,
            r#"{"lcp_ms":3000.0,"fid_ms":null,"cls":0.05,"fcp_ms":900.0,"resources":[],"errors":[],"degraded":false}"#,
        )
        .unwrap();

        let config = ConfigFile::default();
        let inputs = ReportInputs {
            vitals_path: Some(path),
            ..ReportInputs::default()
        };
        let input = gather_inputs(&config, &inputs).unwrap();

        let frontend = input.frontend.unwrap();
        assert_eq!(frontend.number("lcp"), Some(3000.0));
        assert_eq!(frontend.number("cls"), Some(0.05));
        assert_eq!(frontend.number("fid"), None);
    }

    #[test]
    fn test_gather_inputs_missing_build_dir_is_an_error() {
        let config = ConfigFile::default();
        let inputs = ReportInputs {
            build_dir: Some(PathBuf::from("/nonexistent/build")),
            ..ReportInputs::default()
        };
        assert!(gather_inputs(&config, &inputs).is_err());
    }

    #[test]
    fn test_gather_inputs_reads_backend_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requests.json");
        std::fs::write(
            &path,
            r#"[{"method":"GET","path":"/api/x","status_code":200,"duration_ms":120.0,"memory_delta_bytes":0,"timestamp":"2026-08-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let config = ConfigFile::default();
        let inputs = ReportInputs {
            backend_path: Some(path),
            ..ReportInputs::default()
        };
        let input = gather_inputs(&config, &inputs).unwrap();

        let backend = input.backend.unwrap();
        assert_eq!(backend.number("requestCount"), Some(1.0));
        assert_eq!(backend.number("averageResponseTime"), Some(120.0));
    }
}
