//! High-level operations backing the CLI.

pub mod vdeps_build;

pub use vdeps_build::{build, select_dependencies, BuildOptions, BuildSummary};
