//! Analyze command implementation
//!
//! Handles the `pagepulse analyze` command: scans a production build
//! directory, sizes every static asset (raw and gzip), runs the source
//! heuristics, and prints or writes the analysis.

use anyhow::{Context, Result};
use console::style;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

use crate::assets::{AssetAnalyzer, BundleAnalysis};
use crate::fmt::{format_bytes, CHART, MICROSCOPE, WARNING};

/// Scan a build directory and report on its static assets.
///
/// With `json` the full analysis goes to stdout as JSON; otherwise a
/// human-readable summary is printed. When `out` is given the JSON
/// artifact is also written there.
pub fn cmd_analyze(build_dir: &Path, json: bool, out: Option<&Path>) -> Result<()> {
    let analyzer = AssetAnalyzer::new(build_dir);

    let analysis = if json {
        analyzer.scan()?
    } else {
        println!(
            "{} {} Static Asset Analysis",
            MICROSCOPE,
            style("pagepulse").bold()
        );
        println!("   Build dir: {}", style(build_dir.display()).cyan());
        println!();

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("scanning assets...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        let analysis = analyzer.scan();
        spinner.finish_and_clear();
        analysis?
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&analysis).context("Failed to serialize analysis")?
        );
    } else {
        print_analysis(&analysis);
    }

    if let Some(out) = out {
        analyzer.write_json(&analysis, out)?;
        if !json {
            println!();
            println!("   Wrote {}", style(out.display()).cyan());
        }
    }

    Ok(())
}

fn print_analysis(analysis: &BundleAnalysis) {
    println!(
        "{} {} files, {} raw / {} gzip",
        CHART,
        style(analysis.records.len()).bold(),
        style(format_bytes(analysis.total_size_bytes())).bold(),
        format_bytes(analysis.total_gzip_bytes())
    );
    println!();

    let mut by_size: Vec<_> = analysis.records.iter().collect();
    by_size.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

    println!("   Largest assets:");
    for record in by_size.iter().take(10) {
        let mut tags = Vec::new();
        if record.has_content_hash {
            tags.push("hashed");
        }
        if record.is_vendor {
            tags.push("vendor");
        }
        if record.is_chunk {
            tags.push("chunk");
        }
        let tag_str = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!(
            "   {:>10}  {}{}",
            style(format_bytes(record.size_bytes)).green(),
            record.path,
            style(tag_str).dim()
        );
    }

    if !analysis.advisory.duplicate_bodies.is_empty() {
        println!();
        println!(
            "   {} {} duplicated function bodies across files",
            WARNING,
            style(analysis.advisory.duplicate_bodies.len()).yellow()
        );
    }

    if !analysis.skipped.is_empty() {
        println!();
        println!(
            "   {} {} unreadable files skipped",
            WARNING,
            style(analysis.skipped.len()).yellow()
        );
        for path in &analysis.skipped {
            println!("      {}", style(path).dim());
        }
    }
}
