use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ganttline_cli::{
    CliError, Command, ConfigOverrides, OutputFormat, load_view_config, read_tasks,
};

/// ganttline - Gantt chart layout from the command line
#[derive(Parser)]
#[command(name = "gtl")]
#[command(version = "0.1.0")]
#[command(about = "Lay out Gantt chart tasks", long_about = None)]
struct Args {
    /// Task list as a JSON array (reads stdin when omitted)
    #[arg(long, global = true)]
    tasks: Option<PathBuf>,

    /// View configuration file (defaults to <config dir>/ganttline/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging based on the RUST_LOG environment variable
///
/// Examples:
/// - `RUST_LOG=trace` - show all trace logs
/// - `RUST_LOG=debug` - show debug and above
/// - `RUST_LOG=ganttline_core=debug` - engine internals only
///
/// Logs go to stderr so they never mix with command output.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    init_logging();

    if let Err(e) = run_app() {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Main application logic - separated for testability
fn run_app() -> Result<(), CliError> {
    let args = Args::parse();
    if let Some(output) = run_with_args(&args)? {
        println!("{}", output);
    }
    Ok(())
}

/// Run the application with the given arguments
fn run_with_args(args: &Args) -> Result<Option<String>, CliError> {
    let Some(command) = &args.command else {
        return Ok(None);
    };

    let config = load_view_config(args.config.as_deref(), &args.overrides)?;
    let tasks = read_tasks(args.tasks.as_deref())?;
    debug!(
        command = command.as_str(),
        view_mode = %config.view_mode,
        format = %args.format,
        "Running command"
    );

    command.execute(&tasks, &config, args.format).map(Some)
}
