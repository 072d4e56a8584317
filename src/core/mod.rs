//! Core data structures for vdeps.
//!
//! This module contains the foundational types used throughout the tool:
//! - The target platform description
//! - Platform-conditional list filtering
//! - The dependency manifest and its validated records
//! - Workspace layout

pub mod filter;
pub mod manifest;
pub mod platform;
pub mod workspace;

pub use manifest::{DependencyRecord, InstallRule, Manifest, ManifestError};
pub use platform::PlatformContext;
pub use workspace::Workspace;
