//! Filename and source-text heuristics.
//!
//! All of these are best-effort approximations: content hashes are matched
//! by shape, dependency counting is regex-based (not AST-based), and the
//! minification check can misfire on already-transformed code. Consumers
//! treat the outputs as advisory.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static CONTENT_HASH_RE: OnceLock<Regex> = OnceLock::new();
static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
static FUNCTION_BODY_RE: OnceLock<Regex> = OnceLock::new();

fn content_hash_re() -> &'static Regex {
    CONTENT_HASH_RE.get_or_init(|| {
        // Matches bundler output like app.3f2a9c1d.js or main-8c1f9e2a4b.css
        Regex::new(r"(?i)[.\-][0-9a-f]{8,32}\.").expect("content hash regex is valid")
    })
}

/// True when the filename carries a content-hash-like segment.
pub fn has_content_hash(filename: &str) -> bool {
    content_hash_re().is_match(filename)
}

/// True when the filename looks like a code-split chunk: a content-hash
/// suffix or a `.chunk.` infix.
pub fn is_chunk(filename: &str) -> bool {
    filename.contains(".chunk.") || has_content_hash(filename)
}

/// True when the filename looks like a vendor bundle.
pub fn is_vendor(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.contains("vendor") || lower.starts_with("vendors~")
}

/// Minification heuristic: average line length over 100 characters and
/// fewer than 50 lines total.
pub fn looks_minified(content: &str) -> bool {
    let line_count = content.lines().count();
    if line_count == 0 || line_count >= 50 {
        return false;
    }
    let total_len: usize = content.lines().map(str::len).sum();
    (total_len as f64 / line_count as f64) > 100.0
}

/// Count import/require occurrences as an external-dependency proxy.
pub fn count_import_refs(content: &str) -> u64 {
    let re = IMPORT_RE.get_or_init(|| {
        Regex::new(r#"\bimport\s|\brequire\s*\("#).expect("import regex is valid")
    });
    re.find_iter(content).count() as u64
}

/// Collect simple function bodies keyed by their exact text.
///
/// Only brace-free bodies of moderate length are considered; nested
/// functions are invisible to this pattern, which is acceptable for an
/// exact-duplicate signal.
pub fn collect_function_bodies(content: &str, path: &str, out: &mut HashMap<String, Vec<String>>) {
    let re = FUNCTION_BODY_RE.get_or_init(|| {
        Regex::new(r"function\s*\w*\s*\([^)]*\)\s*\{([^{}]{40,400})\}")
            .expect("function body regex is valid")
    });
    for cap in re.captures_iter(content) {
        if let Some(body) = cap.get(1) {
            let body = body.as_str().trim().to_string();
            let paths = out.entry(body).or_default();
            if !paths.iter().any(|p| p == path) {
                paths.push(path.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_detection() {
        assert!(has_content_hash("app.3f2a9c1d.js"));
        assert!(has_content_hash("main-8c1f9e2a4b.css"));
        assert!(has_content_hash("vendors~main.0a1b2c3d4e5f.js"));
        assert!(!has_content_hash("styles.css"));
        assert!(!has_content_hash("app.v2.js")); // too short to be a hash
        assert!(!has_content_hash("index.html"));
    }

    #[test]
    fn test_chunk_detection_via_hash_or_infix() {
        assert!(is_chunk("app.3f2a9c1d.js"));
        assert!(is_chunk("2.chunk.js"));
        assert!(!is_chunk("runtime.js"));
    }

    #[test]
    fn test_vendor_detection() {
        assert!(is_vendor("vendor.js"));
        assert!(is_vendor("vendors~main.js"));
        assert!(is_vendor("my-vendor-bundle.js"));
        assert!(!is_vendor("main.js"));
    }

    #[test]
    fn test_minified_heuristic_matches_long_few_lines() {
        let minified = "x".repeat(5000);
        assert!(looks_minified(&minified));

        let formatted: String = (0..200).map(|i| format!("let x{} = {};\n", i, i)).collect();
        assert!(!looks_minified(&formatted));

        assert!(!looks_minified(""));
    }

    #[test]
    fn test_minified_heuristic_is_advisory_on_edge_content() {
        // Short file with short lines: not flagged even though it is code
        assert!(!looks_minified("const a = 1;\nconst b = 2;\n"));
    }

    #[test]
    fn test_import_counting() {
        let src = r#"
            import { a } from "./a";
            import b from "b";
            const c = require("c");
            // not an importlike token
        "#;
        assert_eq!(count_import_refs(src), 3);
        assert_eq!(count_import_refs("no deps here"), 0);
    }

    #[test]
    fn test_duplicate_function_bodies_found_across_files() {
        let body = "return input.map(function(x) x).filter(Boolean).join(', ');";
        let src_a = format!("function fmtA(input) {{ {} }}", body);
        let src_b = format!("function fmtB(input) {{ {} }}", body);

        let mut bodies = HashMap::new();
        collect_function_bodies(&src_a, "a.js", &mut bodies);
        collect_function_bodies(&src_b, "b.js", &mut bodies);

        let duplicate = bodies.values().find(|paths| paths.len() > 1);
        assert!(duplicate.is_some());
    }

    #[test]
    fn test_same_file_repeat_counts_once_per_file() {
        let body = "return value + value + value + value + value + value;";
        let src = format!(
            "function one() {{ {} }}\nfunction two() {{ {} }}",
            body, body
        );

        let mut bodies = HashMap::new();
        collect_function_bodies(&src, "a.js", &mut bodies);

        let paths = bodies.get(body).expect("body should be collected");
        assert_eq!(paths.len(), 1);
    }
}
