//! Configuration file and loading support
//!
//! `.pagepulse.toml` controls sampling rates, alert thresholds, cache
//! classification bounds, and report output. A missing file means defaults;
//! a present-but-invalid file is an error.

/// Configuration file structures and validation
pub mod file;
/// Loading and saving configuration
pub mod loader;

pub use file::{
    BackendSettings, CacheSettings, ConfigFile, FrontendSettings, ReportSettings,
    ThresholdSettings, CONFIG_FILE_NAME,
};
pub use loader::ConfigLoader;
