//! Test fixtures: realistic production build trees

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

/// Create a build directory resembling typical bundler output.
///
/// Contains a hashed vendor chunk, an unhashed runtime script, a
/// stylesheet, an image, a font, and the HTML entry point.
pub fn create_build_dir() -> io::Result<TempDir> {
    let dir = TempDir::new()?;
    let root = dir.path();

    write(root, "static/js/main.3f2a9c1d.js", &minified_js(40_000))?;
    write(root, "static/js/vendors~app.9b8c7d6e.chunk.js", &minified_js(120_000))?;
    write(root, "static/js/runtime.js", "import './main';\nconsole.log('boot');\n")?;
    write(root, "static/css/app.4d5e6f7a.css", "body{margin:0}\n")?;
    write(root, "static/media/hero.png", &vec![0u8, 1, 2, 3].repeat(2000))?;
    write(root, "static/media/inter.woff2", &vec![7u8; 4096])?;
    write(root, "index.html", "<!DOCTYPE html><html><body></body></html>")?;

    // Dotfiles are excluded from scans
    write(root, ".DS_Store", "junk")?;

    Ok(dir)
}

/// A build directory where every script lacks a content hash.
pub fn create_unversioned_build_dir() -> io::Result<TempDir> {
    let dir = TempDir::new()?;
    let root = dir.path();
    write(root, "app.js", "console.log('a');\n")?;
    write(root, "styles.css", "body{}\n")?;
    write(root, "index.html", "<html></html>")?;
    Ok(dir)
}

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// A plausible minified script body of roughly `len` bytes, one long line.
fn minified_js(len: usize) -> String {
    let unit = "function a(b){return b*2}var c=a(21);";
    let mut out = String::with_capacity(len + unit.len());
    while out.len() < len {
        out.push_str(unit);
    }
    out
}
