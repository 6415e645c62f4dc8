//! Init command implementation
//!
//! Handles the `pagepulse init` command which writes a default
//! `.pagepulse.toml` configuration file into the project root.

use anyhow::Result;
use console::style;
use std::env;

use crate::config::{ConfigFile, ConfigLoader, CONFIG_FILE_NAME};
use crate::fmt::{CHECKMARK, SPARKLES, WARNING};
use crate::infra::RealFileSystem;

/// Write the default configuration file, refusing to overwrite one.
pub fn cmd_init() -> Result<()> {
    println!(
        "{} {} Initializing configuration",
        SPARKLES,
        style("pagepulse init").bold()
    );
    println!();

    let project_root = env::current_dir()?;

    if project_root.join(CONFIG_FILE_NAME).exists() {
        println!(
            "{} Config file already exists: {}",
            WARNING,
            style(CONFIG_FILE_NAME).cyan()
        );
        println!("   Delete it first or edit manually to update.");
        return Ok(());
    }

    let config = ConfigFile::default();
    ConfigLoader::save(&project_root, &config, &RealFileSystem)?;

    println!(
        "{} Created {}",
        CHECKMARK,
        style(CONFIG_FILE_NAME).cyan().bold()
    );
    println!();
    println!("{}  Next Steps:", style("💡").bold());
    println!("   1. Review and customize {} if needed", CONFIG_FILE_NAME);
    println!(
        "   2. Run {} to inspect your build output",
        style("pagepulse analyze <build-dir>").cyan()
    );
    println!(
        "   3. Run {} to generate a full optimization report",
        style("pagepulse report").cyan()
    );

    Ok(())
}
