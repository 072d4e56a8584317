//! Dependency manifest (`vdeps.toml`) loading and validation.
//!
//! The manifest is deserialized into raw mirror structs first, then
//! validated and normalized into [`DependencyRecord`]s. Platform filtering
//! and `${ROOT_DIR}` interpolation happen here, exactly once; records are
//! immutable afterwards.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::filter::filter_platform_items;
use crate::core::platform::PlatformContext;
use crate::util::fs::read_to_string;

/// Manifest file name expected at the workspace root.
pub const MANIFEST_NAME: &str = "vdeps.toml";

/// C++ standard passed to CMake when a dependency does not pin one.
pub const DEFAULT_CXX_STANDARD: u32 = 20;

/// Variable expanded in `cmake_options` values to the forward-slashed
/// workspace root.
pub const ROOT_DIR_VAR: &str = "${ROOT_DIR}";

/// Structured manifest validation problems.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("dependency #{index} is missing a name")]
    MissingName { index: usize },

    #[error("dependency `{name}` is missing rel_path")]
    MissingRelPath { name: String },

    #[error("duplicate dependency name `{name}` (names are matched case-insensitively)")]
    DuplicateName { name: String },
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    temp_dir: Option<String>,
    #[serde(default)]
    dependency: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    name: Option<String>,
    rel_path: Option<String>,
    #[serde(default)]
    cmake_options: Vec<String>,
    #[serde(default)]
    libs: Option<Vec<String>>,
    #[serde(default)]
    executables: Option<Vec<String>>,
    #[serde(default)]
    extra_files: Option<Vec<String>>,
    #[serde(default)]
    library_paths: Vec<String>,
    #[serde(default = "default_cxx_standard")]
    cxx_standard: u32,
    #[serde(default = "default_true")]
    build_by_default: bool,
    #[serde(default = "default_true")]
    build: bool,
    #[serde(default)]
    init_submodules: bool,
    #[serde(default)]
    install: Vec<RawInstallRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInstallRule {
    pattern: String,
    target: String,
}

fn default_true() -> bool {
    true
}

fn default_cxx_standard() -> u32 {
    DEFAULT_CXX_STANDARD
}

/// An explicit copy rule: glob pattern relative to the artifact search root,
/// destination rooted at `lib` or `tools`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRule {
    pub pattern: String,
    pub target: String,
}

/// One buildable unit from the manifest, with platform filtering and
/// `${ROOT_DIR}` interpolation already applied.
///
/// For `libs`, `None` means "copy every library-kind artifact" while an
/// empty list copies none. `executables` and `extra_files` are only
/// consulted when present.
#[derive(Debug, Clone)]
pub struct DependencyRecord {
    pub name: String,
    pub rel_path: String,
    pub cmake_options: Vec<String>,
    pub libs: Option<Vec<String>>,
    pub executables: Option<Vec<String>>,
    pub extra_files: Option<Vec<String>>,
    pub library_paths: Vec<String>,
    pub cxx_standard: u32,
    pub build_by_default: bool,
    pub build: bool,
    pub init_submodules: bool,
    pub install: Vec<InstallRule>,
}

impl DependencyRecord {
    fn from_raw(
        raw: RawDependency,
        index: usize,
        platform: &PlatformContext,
        root_token: &str,
    ) -> Result<Self, ManifestError> {
        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(ManifestError::MissingName { index }),
        };
        let rel_path = match raw.rel_path {
            Some(path) if !path.trim().is_empty() => path,
            _ => return Err(ManifestError::MissingRelPath { name }),
        };

        // Filter first, then interpolate: a drive-letter colon in a
        // substituted path must never be parsed as filter syntax.
        let cmake_options = filter_platform_items(&raw.cmake_options, platform)
            .into_iter()
            .map(|option| option.replace(ROOT_DIR_VAR, root_token))
            .collect();

        let filter_list = |items: Vec<String>| filter_platform_items(&items, platform);

        Ok(DependencyRecord {
            name,
            rel_path,
            cmake_options,
            libs: raw.libs.map(&filter_list),
            executables: raw.executables.map(&filter_list),
            extra_files: raw.extra_files.map(&filter_list),
            library_paths: filter_list(raw.library_paths),
            cxx_standard: raw.cxx_standard,
            build_by_default: raw.build_by_default,
            build: raw.build,
            init_submodules: raw.init_submodules,
            install: raw
                .install
                .into_iter()
                .map(|rule| InstallRule {
                    pattern: rule.pattern,
                    target: rule.target,
                })
                .collect(),
        })
    }

    /// Whether this record routes anything into the tools directory.
    pub fn wants_tools_dir(&self) -> bool {
        let declared = |list: &Option<Vec<String>>| {
            list.as_ref().map_or(false, |names| !names.is_empty())
        };
        declared(&self.executables) || declared(&self.extra_files)
    }
}

/// The validated manifest: redirect directory plus dependency records in
/// declaration order.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub temp_dir: Option<String>,
    pub dependencies: Vec<DependencyRecord>,
}

impl Manifest {
    /// Load and validate the manifest at `path`, normalizing records for
    /// `platform` with `${ROOT_DIR}` bound to `root`.
    pub fn load(path: &Path, platform: &PlatformContext, root: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("configuration file not found at {}", path.display());
        }
        let content = read_to_string(path)?;
        Self::parse(&content, path, platform, root)
    }

    /// Parse manifest content. `path` is used for error context only.
    pub fn parse(
        content: &str,
        path: &Path,
        platform: &PlatformContext,
        root: &Path,
    ) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let root_token = root.display().to_string().replace('\\', "/");

        let mut seen = HashSet::new();
        let mut dependencies = Vec::with_capacity(raw.dependency.len());
        for (index, raw_dep) in raw.dependency.into_iter().enumerate() {
            let dep = DependencyRecord::from_raw(raw_dep, index + 1, platform, &root_token)?;
            if !seen.insert(dep.name.to_lowercase()) {
                return Err(ManifestError::DuplicateName { name: dep.name }.into());
            }
            dependencies.push(dep);
        }

        Ok(Manifest {
            temp_dir: raw.temp_dir,
            dependencies,
        })
    }

    /// Look up a record by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&DependencyRecord> {
        let folded = name.to_lowercase();
        self.dependencies
            .iter()
            .find(|dep| dep.name.to_lowercase() == folded)
    }

    /// Dependency names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.dependencies.iter().map(|dep| dep.name.as_str()).collect()
    }
}
