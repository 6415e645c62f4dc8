use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pagepulse::cmd;
use pagepulse::cmd::report::ReportInputs;
use pagepulse::config::ConfigLoader;
use pagepulse::report::CancelToken;
use std::path::PathBuf;
use std::process;

/// Performance monitoring and optimization pipeline
///
/// pagepulse turns raw runtime telemetry and build output into a
/// prioritized list of performance fixes: it sizes static assets, assigns
/// cache policies, evaluates web vitals and request latencies against
/// thresholds, and writes a timestamped optimization report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a production build directory
    Analyze {
        /// Build directory to scan
        #[arg(value_name = "BUILD_DIR")]
        build_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Also write the analysis JSON to this path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Classify assets and emit cache artifacts
    Cache {
        /// Build directory to scan
        #[arg(value_name = "BUILD_DIR")]
        build_dir: PathBuf,

        /// Directory for the generated artifacts
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Output the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline and write an optimization report
    Report {
        /// Build directory to scan (bundle and cache categories)
        #[arg(short, long)]
        build_dir: Option<PathBuf>,

        /// Exported frontend vitals payload (JSON)
        #[arg(long)]
        vitals: Option<PathBuf>,

        /// Exported backend request records (JSON array)
        #[arg(long)]
        backend: Option<PathBuf>,

        /// Also render an HTML report
        #[arg(long)]
        html: bool,
    },

    /// Initialize pagepulse configuration
    Init,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match &cli.command {
        Some(Commands::Analyze {
            build_dir,
            json,
            out,
        }) => cmd::cmd_analyze(build_dir, *json, out.as_deref()),
        Some(Commands::Cache {
            build_dir,
            out_dir,
            json,
        }) => run_cache(build_dir, out_dir.as_deref(), *json),
        Some(Commands::Report {
            build_dir,
            vitals,
            backend,
            html,
        }) => run_report(build_dir, vitals, backend, *html),
        Some(Commands::Init) => cmd::cmd_init(),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("pagepulse v{}", env!("CARGO_PKG_VERSION"));
            println!("Performance monitoring and optimization pipeline\n");
            println!("Usage: pagepulse <COMMAND>\n");
            println!("Commands:");
            println!("  analyze  Analyze a production build directory");
            println!("  cache    Classify assets and emit cache artifacts");
            println!("  report   Run the pipeline and write a report");
            println!("  init     Initialize pagepulse configuration");
            println!("\nRun 'pagepulse <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use pagepulse::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

fn run_cache(
    build_dir: &std::path::Path,
    out_dir: Option<&std::path::Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = ConfigLoader::load(&std::env::current_dir()?)?;
    let default_out = PathBuf::from(&config.report.output_dir);
    let out_dir = out_dir.unwrap_or(&default_out);
    cmd::cmd_cache(build_dir, out_dir, &config.cache, json)
}

fn run_report(
    build_dir: &Option<PathBuf>,
    vitals: &Option<PathBuf>,
    backend: &Option<PathBuf>,
    html: bool,
) -> anyhow::Result<()> {
    let config = ConfigLoader::load(&std::env::current_dir()?)?;
    let inputs = ReportInputs {
        build_dir: build_dir.clone(),
        vitals_path: vitals.clone(),
        backend_path: backend.clone(),
    };
    cmd::cmd_report(&config, &inputs, html, &CancelToken::new())
}
