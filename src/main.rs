//! cmake-ext-builder command-line interface
//!
//! Builds native Python extension modules with `CMake`

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    // Show backtrace if enabled
    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "cmake-ext-builder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build native Python extensions with CMake", long_about = None)]
pub(crate) struct Cli {
    /// Print each command before running it
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a backtrace on error (requires `RUST_BACKTRACE=1`)
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure and build extensions with CMake
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Show the CMake commands a build would run, without running them
    Plan {
        #[command(flatten)]
        args: BuildArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove per-extension temporary build directories
    Clean {
        #[command(flatten)]
        project: ProjectArgs,

        /// Remove the whole temporary build root
        #[arg(long)]
        all: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which extensions to act on and where their temporary builds live
#[derive(Args)]
struct ProjectArgs {
    /// Extension as NAME or NAME=SOURCE_DIR (repeatable, replaces the config list)
    #[arg(short = 'e', long = "extension", value_name = "NAME[=SOURCE_DIR]")]
    extensions: Vec<String>,

    /// Root directory for temporary build directories
    #[arg(short = 't', long)]
    build_temp: Option<PathBuf>,

    /// Path to config file (default: ./cmake-ext.toml, then user config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not load any config file
    #[arg(long)]
    norc: bool,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Build a Debug configuration (otherwise `DEBUG` decides)
    #[arg(short = 'g', long)]
    debug: bool,

    /// Number of parallel build jobs
    #[arg(short = 'j', long)]
    parallel: Option<usize>,

    /// Platform name (e.g., win-amd64); defaults to the host
    #[arg(short = 'p', long)]
    plat_name: Option<String>,

    /// Directory for built extension modules
    #[arg(short = 'b', long)]
    build_lib: Option<PathBuf>,

    /// Place built modules next to the sources
    #[arg(short = 'i', long)]
    inplace: bool,

    /// Python interpreter passed to CMake
    #[arg(long, env = "PYTHON")]
    python: Option<PathBuf>,

    /// CMake program to run
    #[arg(long, env = "CMAKE")]
    cmake: Option<String>,

    /// Extension module filename suffix (e.g., .so)
    #[arg(long)]
    ext_suffix: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    cmake_ext_builder::init_verbose(cli.verbose);

    let result = match cli.command {
        Commands::Build { args } => commands::build::run(&args),
        Commands::Plan { args, json } => commands::plan::run(&args, json),
        Commands::Clean { project, all } => commands::clean::run(&project, all),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        display_error(&e, cli.backtrace);
        process::exit(1);
    }
}

mod commands;
