//! Cache command implementation
//!
//! Handles the `pagepulse cache` command: classifies every asset in the
//! build directory into a cache policy class and emits the derived
//! artifacts (grouped headers document, precache manifest, proxy config
//! snippet).

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::assets::AssetAnalyzer;
use crate::cache::{
    proxy_config, CacheClassifier, CacheHeadersDoc, CacheReport, PrecacheManifest,
};
use crate::config::CacheSettings;
use crate::fmt::{CHECKMARK, MICROSCOPE};
use crate::infra::{FileSystem, RealFileSystem};

/// Artifact file names written into the output directory.
pub const HEADERS_FILE: &str = "cache-headers.json";
/// Precache manifest file name
pub const PRECACHE_FILE: &str = "precache-manifest.json";
/// Proxy snippet file name
pub const PROXY_FILE: &str = "proxy-cache.conf";

/// Classify build assets and write the cache artifacts.
pub fn cmd_cache(
    build_dir: &Path,
    out_dir: &Path,
    settings: &CacheSettings,
    json: bool,
) -> Result<()> {
    if !json {
        println!(
            "{} {} Cache Strategy",
            MICROSCOPE,
            style("pagepulse").bold()
        );
        println!("   Build dir: {}", style(build_dir.display()).cyan());
        println!();
    }

    let analysis = AssetAnalyzer::new(build_dir).scan()?;
    let classifier = CacheClassifier::new(&settings.api_prefix, settings.precache_limit);
    let report = classifier.classify_assets(&analysis.records);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize cache report")?
        );
    } else {
        print_report(&report);
    }

    write_artifacts(&report, out_dir, settings.precache_limit, &RealFileSystem)?;

    if !json {
        println!();
        for name in [HEADERS_FILE, PRECACHE_FILE, PROXY_FILE] {
            println!(
                "{} Wrote {}",
                CHECKMARK,
                style(out_dir.join(name).display()).cyan()
            );
        }
    }

    Ok(())
}

/// Write the three cache artifacts into `out_dir`.
pub fn write_artifacts<FS: FileSystem>(
    report: &CacheReport,
    out_dir: &Path,
    precache_limit: usize,
    fs: &FS,
) -> Result<()> {
    fs.create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let headers = CacheHeadersDoc::from_report(report);
    fs.write(
        &out_dir.join(HEADERS_FILE),
        serde_json::to_string_pretty(&headers)?,
    )
    .context("Failed to write cache headers document")?;

    let manifest = PrecacheManifest::from_report(report, precache_limit);
    fs.write(
        &out_dir.join(PRECACHE_FILE),
        serde_json::to_string_pretty(&manifest)?,
    )
    .context("Failed to write precache manifest")?;

    fs.write(&out_dir.join(PROXY_FILE), proxy_config(report))
        .context("Failed to write proxy config snippet")?;

    Ok(())
}

fn print_report(report: &CacheReport) {
    let doc = CacheHeadersDoc::from_report(report);
    for group in &doc.groups {
        println!(
            "   {:?} ({} files)",
            style(group.policy).bold(),
            group.files.len()
        );
        println!("      Cache-Control: {}", style(&group.cache_control).green());
        println!("      {}", style(&group.rationale).dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, AssetRecord};
    use tempfile::TempDir;

    fn record(path: &str, kind: AssetKind, hashed: bool) -> AssetRecord {
        AssetRecord {
            path: path.to_string(),
            kind,
            size_bytes: 1000,
            gzip_size_bytes: 300,
            has_content_hash: hashed,
            is_chunk: false,
            is_vendor: false,
            minified_heuristic: false,
        }
    }

    #[test]
    fn test_write_artifacts_emits_three_files() {
        let out = TempDir::new().unwrap();
        let records = vec![
            record("static/js/app.1a2b3c4d.js", AssetKind::Js, true),
            record("index.html", AssetKind::Other, false),
        ];
        let report = CacheClassifier::default().classify_assets(&records);

        write_artifacts(&report, out.path(), 50, &RealFileSystem).unwrap();

        for name in [HEADERS_FILE, PRECACHE_FILE, PROXY_FILE] {
            assert!(out.path().join(name).exists(), "{} missing", name);
        }

        let headers: CacheHeadersDoc = serde_json::from_str(
            &std::fs::read_to_string(out.path().join(HEADERS_FILE)).unwrap(),
        )
        .unwrap();
        assert!(!headers.groups.is_empty());
    }
}
