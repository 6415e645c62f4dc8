//! Completions command implementation
//!
//! Handles the `pagepulse completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// pagepulse completions bash > /etc/bash_completion.d/pagepulse
///
/// # Zsh
/// pagepulse completions zsh > ~/.zfunc/_pagepulse
///
/// # Fish
/// pagepulse completions fish > ~/.config/fish/completions/pagepulse.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    // The Cli struct lives in main.rs, so the command tree is re-created
    // here with clap's builder API for completion generation.
    use clap::{Arg, ArgAction, Command};

    let mut cmd = Command::new("pagepulse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Performance monitoring and optimization pipeline")
        .arg(
            Arg::new("no-emoji")
                .long("no-emoji")
                .help("Disable emoji output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("analyze").about("Analyze a production build directory"))
        .subcommand(Command::new("cache").about("Classify assets and emit cache artifacts"))
        .subcommand(Command::new("report").about("Run the pipeline and write a report"))
        .subcommand(Command::new("init").about("Initialize pagepulse configuration"))
        .subcommand(Command::new("completions").about("Generate shell completions"));

    let bin_name = "pagepulse".to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
