//! vdeps CLI - builds third-party CMake dependencies from a manifest.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vdeps::ops::{self, BuildOptions};
use vdeps::util::shell::{ColorChoice, Shell};

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("vdeps=debug")
    } else {
        EnvFilter::new("vdeps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color);

    let opts = BuildOptions {
        names: cli.names,
        build_only: cli.build_only,
        root: cli.root,
        manifest_path: cli.manifest_path,
    };

    ops::build(&opts, &shell)?;
    Ok(())
}
