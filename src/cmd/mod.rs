//! Command handlers for the pagepulse CLI
//!
//! This module contains all command implementations, organized by
//! functionality. Each submodule handles a specific CLI command.

pub mod analyze;
pub mod cache;
pub mod completions;
pub mod init;
pub mod report;

// Re-export command functions for convenient access
pub use analyze::cmd_analyze;
pub use cache::cmd_cache;
pub use completions::cmd_completions;
pub use init::cmd_init;
pub use report::cmd_report;
