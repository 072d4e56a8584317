//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// vdeps - A declarative multi-configuration CMake dependency build orchestrator
#[derive(Parser)]
#[command(name = "vdeps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dependencies to process (defaults to every build_by_default one)
    pub names: Vec<String>,

    /// Skip configure for dependencies that already have a CMake cache
    #[arg(long)]
    pub build_only: bool,

    /// Workspace root directory (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Manifest location (defaults to <root>/vdeps.toml)
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress status output, errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
