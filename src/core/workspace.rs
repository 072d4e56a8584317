//! Workspace layout: the root directory and everything derived from it.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::manifest::{DependencyRecord, Manifest, MANIFEST_NAME};
use crate::core::platform::PlatformContext;

/// Directory under the root that holds dependency source trees.
pub const DEPS_DIR_NAME: &str = "vdeps";

/// The workspace: a root directory plus its validated manifest.
///
/// All output and source locations are derived from here so the rest of the
/// code never joins paths against the root directly.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Load the workspace rooted at `root`. `manifest_path` overrides the
    /// default `<root>/vdeps.toml`.
    pub fn load(
        root: PathBuf,
        manifest_path: Option<PathBuf>,
        platform: &PlatformContext,
    ) -> Result<Self> {
        let manifest_path = manifest_path.unwrap_or_else(|| root.join(MANIFEST_NAME));
        let manifest = Manifest::load(&manifest_path, platform, &root)?;
        Ok(Workspace {
            root,
            manifest_path,
            manifest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory containing dependency source trees.
    pub fn deps_root(&self) -> PathBuf {
        self.root.join(DEPS_DIR_NAME)
    }

    /// Source directory for one dependency.
    pub fn dep_dir(&self, dep: &DependencyRecord) -> PathBuf {
        self.deps_root().join(&dep.rel_path)
    }

    /// Library output directory for one configuration.
    pub fn output_lib_dir(&self, platform: &PlatformContext, config_name: &str) -> PathBuf {
        self.root
            .join("lib")
            .join(format!("{}_{}", platform.tag(), config_name))
    }

    /// Tools output directory for one configuration.
    pub fn output_tools_dir(&self, platform: &PlatformContext, config_name: &str) -> PathBuf {
        self.root
            .join("tools")
            .join(format!("{}_{}", platform.tag(), config_name))
    }
}
