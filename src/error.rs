//! Crate error types with contextual suggestions
//!
//! Structured errors that carry actionable messages, suggested fixes, and
//! proper exit codes for CI use. Partial collection failures never surface
//! here; only the failures that leave a run without a usable artifact do.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by pagepulse commands
#[derive(Error, Debug)]
pub enum PagePulseError {
    /// Build output directory missing or not a directory
    #[error("Build directory not found: {path}")]
    BuildDirNotFound {
        /// Path that was supplied
        path: PathBuf,
    },

    /// Configuration file was present but invalid
    #[error("Invalid configuration in {path}")]
    ConfigInvalid {
        /// Path to the config file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Report artifact could not be written.
    ///
    /// The one hard failure in the pipeline: without the artifact the run
    /// produced nothing usable.
    #[error("Failed to write report artifact: {path}")]
    ReportWrite {
        /// Destination path of the artifact
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl PagePulseError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::BuildDirNotFound { path } => Some(format!(
                "Run your frontend build first, then point pagepulse at its output:\n  pagepulse analyze {}",
                path.display()
            )),
            Self::ConfigInvalid { reason, .. } => Some(format!(
                "{}\nRun 'pagepulse init' to regenerate a default .pagepulse.toml",
                reason
            )),
            Self::ReportWrite { path, .. } => Some(format!(
                "Ensure the reports directory is writable: {}",
                path.parent().unwrap_or(path.as_path()).display()
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get documentation URL for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::ConfigInvalid { .. } => {
                Some("https://github.com/pagepulse/pagepulse#configuration")
            }
            Self::ReportWrite { .. } => Some("https://github.com/pagepulse/pagepulse#reports"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BuildDirNotFound { .. } => 66, // EX_NOINPUT
            Self::ConfigInvalid { .. } => 65,   // EX_DATAERR
            Self::ReportWrite { .. } => 73,     // EX_CANTCREAT
            Self::Io { .. } => 74,              // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(pp_error) = error.downcast_ref::<PagePulseError>() {
            if let Some(suggestion) = pp_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = pp_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(pp_error) = error.downcast_ref::<PagePulseError>() {
            pp_error.exit_code()
        } else {
            1
        }
    }
}
