mod calc;
mod cmd;
mod data;
mod errors;
mod locale;
mod logging;
mod selection;

use calc::MonthRef;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leavecal", about = "leave calendar and TOG hours")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data files with sample leave types
    Init,
    /// Print a month with leave days marked
    Calendar {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<MonthRef>,
    },
    /// Manage leave types
    #[command(subcommand)]
    Types(cmd::types::TypesCommand),
    /// Set or clear a single leave day
    #[command(subcommand)]
    Leave(cmd::leave::LeaveCommand),
    /// Log leave for a range of days
    Range(cmd::range::RangeArgs),
    /// Leave used and remaining per type
    Stats {
        #[arg(long)]
        year: Option<i32>,
    },
    /// TOG hours
    #[command(subcommand)]
    Tog(cmd::tog::TogCommand),
    /// Convert between clock time and decimal hours
    #[command(subcommand)]
    Convert(cmd::convert::ConvertCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::calendar::run(None),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Calendar { month }) => cmd::calendar::run(month),
        Some(Commands::Types(c)) => cmd::types::run(c),
        Some(Commands::Leave(c)) => cmd::leave::run(c),
        Some(Commands::Range(args)) => cmd::range::run(args),
        Some(Commands::Stats { year }) => cmd::stats::run(year),
        Some(Commands::Tog(c)) => cmd::tog::run(c),
        Some(Commands::Convert(c)) => cmd::convert::run(c),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
