//! Build planning and execution.
//!
//! This module turns a [`DependencyRecord`](crate::core::DependencyRecord)
//! into concrete CMake invocations and copies the resulting artifacts into
//! the workspace output layout.

pub mod artifacts;
pub mod cmake;
pub mod context;
pub mod install;
pub mod paths;
pub mod plan;

pub use artifacts::{harvest_artifacts, ArtifactKind, ArtifactMatcher};
pub use cmake::CMakeDriver;
pub use context::BuildConfig;
pub use install::apply_install_rules;
pub use plan::BuildPlan;
