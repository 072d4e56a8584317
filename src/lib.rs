//! vdeps - A declarative multi-configuration CMake dependency build
//! orchestrator.
//!
//! This crate provides the core library functionality for vdeps: manifest
//! loading with platform-conditional filtering, per-configuration build
//! planning, CMake execution and artifact harvesting into a normalized
//! output layout.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::core::{
    manifest::{DependencyRecord, InstallRule, Manifest},
    platform::PlatformContext,
    workspace::Workspace,
};

pub use crate::builder::{BuildConfig, BuildPlan};
pub use crate::util::shell::Shell;
