//! Implementation of the `vdeps` build run.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::{
    apply_install_rules, harvest_artifacts, ArtifactMatcher, BuildConfig, BuildPlan, CMakeDriver,
};
use crate::core::manifest::{DependencyRecord, Manifest};
use crate::core::platform::PlatformContext;
use crate::core::workspace::Workspace;
use crate::util::fs::{ensure_dir, relative_path};
use crate::util::process::{find_git, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Characters rejected in requested dependency names.
const FORBIDDEN_NAME_CHARS: [char; 12] =
    ['/', '\\', ';', '&', '|', '<', '>', '*', '?', '`', '"', '\''];

/// Options for a build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Dependencies to process (empty = every `build_by_default` one)
    pub names: Vec<String>,

    /// Skip configure when a CMake cache is already present
    pub build_only: bool,

    /// Workspace root (default: current directory)
    pub root: Option<PathBuf>,

    /// Manifest location (default: `<root>/vdeps.toml`)
    pub manifest_path: Option<PathBuf>,
}

/// Result of a build run.
#[derive(Debug)]
pub struct BuildSummary {
    /// Dependencies processed, in manifest order.
    pub processed: Vec<String>,

    /// Total files copied into the output layout.
    pub artifacts_copied: usize,
}

/// Select dependencies to process.
///
/// With no names, every record whose `build_by_default` flag is set is
/// selected. Explicit names are trimmed, case-folded and de-duplicated, and
/// unknown names are all reported before anything builds. The result is
/// always in manifest order, regardless of request order.
pub fn select_dependencies<'a>(
    manifest: &'a Manifest,
    names: &[String],
) -> Result<Vec<&'a DependencyRecord>> {
    if names.is_empty() {
        return Ok(manifest
            .dependencies
            .iter()
            .filter(|dep| dep.build_by_default)
            .collect());
    }

    // (folded, as requested) so diagnostics keep the user's spelling
    let mut requested: Vec<(String, String)> = Vec::new();
    for raw in names {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if name.contains(&FORBIDDEN_NAME_CHARS[..]) {
            bail!(
                "invalid dependency name `{}` (path separators and shell metacharacters are not allowed)",
                name
            );
        }
        let folded = name.to_lowercase();
        if !requested.iter().any(|(seen, _)| *seen == folded) {
            requested.push((folded, name.to_string()));
        }
    }

    if requested.is_empty() {
        bail!("requested dependency names are all blank");
    }

    let missing: Vec<&str> = requested
        .iter()
        .filter(|(folded, _)| manifest.find(folded).is_none())
        .map(|(_, original)| original.as_str())
        .collect();
    if !missing.is_empty() {
        let known = manifest.names();
        let available = if known.is_empty() {
            "(none)".to_string()
        } else {
            known.join(", ")
        };
        if missing.len() == 1 {
            bail!(
                "dependency `{}` not found in manifest\n\
                 available dependencies: {}",
                missing[0],
                available
            );
        }
        let listing: Vec<String> = missing.iter().map(|name| format!("`{}`", name)).collect();
        bail!(
            "dependencies {} not found in manifest\n\
             available dependencies: {}",
            listing.join(", "),
            available
        );
    }

    Ok(manifest
        .dependencies
        .iter()
        .filter(|dep| {
            let folded = dep.name.to_lowercase();
            requested.iter().any(|(seen, _)| *seen == folded)
        })
        .collect())
}

/// Process every selected dependency, Debug then Release, sequentially in
/// manifest order.
pub fn build(opts: &BuildOptions, shell: &Shell) -> Result<BuildSummary> {
    let platform = PlatformContext::current();
    let root = match &opts.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("failed to determine current directory")?,
    };
    let ws = Workspace::load(root, opts.manifest_path.clone(), &platform)?;
    let selected = select_dependencies(ws.manifest(), &opts.names)?;

    // One environment snapshot per run; each invocation layers its own
    // overlay on a copy and nothing leaks between invocations.
    let base_env: HashMap<String, String> = env::vars().collect();

    let mut processed = Vec::new();
    let mut artifacts_copied = 0;

    for dep in selected {
        let dep_dir = ws.dep_dir(dep);
        if !dep_dir.exists() {
            shell.error(format!(
                "directory for {} not found at {}",
                dep.name,
                dep_dir.display()
            ));
            continue;
        }

        shell.status(Status::Processing, &dep.name);

        if dep.init_submodules {
            init_submodules(dep, &dep_dir, shell)?;
        }

        for config in BuildConfig::ALL {
            let plan = BuildPlan::new(dep, config, &platform, &ws, &base_env);
            artifacts_copied += run_configuration(dep, config, &plan, &platform, opts, &ws, shell)?;
        }

        processed.push(dep.name.clone());
    }

    let listing = if processed.is_empty() {
        "(none)".to_string()
    } else {
        processed.join(", ")
    };
    shell.status(
        Status::Finished,
        format!("processed dependencies: {}", listing),
    );

    Ok(BuildSummary {
        processed,
        artifacts_copied,
    })
}

fn run_configuration(
    dep: &DependencyRecord,
    config: BuildConfig,
    plan: &BuildPlan,
    platform: &PlatformContext,
    opts: &BuildOptions,
    ws: &Workspace,
    shell: &Shell,
) -> Result<usize> {
    ensure_dir(&plan.lib_dir)?;
    if dep.wants_tools_dir() {
        ensure_dir(&plan.tools_dir)?;
    }

    let label = format!("{} ({})", dep.name, config);

    if dep.build {
        let driver = CMakeDriver::new(plan);
        if opts.build_only && driver.is_configured() {
            shell.status(
                Status::Skipped,
                format!("configure for {} (cache present)", label),
            );
        } else {
            if opts.build_only {
                shell.warn(format!(
                    "no CMake cache in {}; configuring before build",
                    plan.build_dir.display()
                ));
            }
            shell.status(
                Status::Configuring,
                format!(
                    "{} in {}",
                    label,
                    relative_path(ws.root(), &plan.build_dir).display()
                ),
            );
            driver.configure()?;
        }
        shell.status(Status::Building, &label);
        driver.build()?;
    } else {
        shell.status(
            Status::Skipped,
            format!("{} build step (build = false)", dep.name),
        );
    }

    let matcher = ArtifactMatcher::new(dep, platform);
    let mut copied = harvest_artifacts(plan, &matcher, shell)?;
    copied += apply_install_rules(&dep.install, plan, shell)?;

    if copied == 0 {
        shell.warn(format!("no artifacts copied for {} ({})", dep.name, config));
    }

    Ok(copied)
}

/// Initialize git submodules for a dependency that asks for them.
///
/// Skipped with a notice when neither the dependency directory nor its
/// parent is a git checkout. A failing git invocation is fatal, like any
/// other build-tool failure.
fn init_submodules(dep: &DependencyRecord, dep_dir: &Path, shell: &Shell) -> Result<()> {
    let in_repo = dep_dir.join(".git").exists()
        || dep_dir
            .parent()
            .map_or(false, |parent| parent.join(".git").exists());
    if !in_repo {
        shell.status(
            Status::Skipped,
            format!("submodule update for {} (not a git repository)", dep.name),
        );
        return Ok(());
    }

    let git = find_git().context("git not found in PATH")?;
    shell.status(Status::Updating, format!("submodules for {}", dep.name));
    ProcessBuilder::new(git)
        .args(["submodule", "update", "--init", "--recursive", "--depth", "1"])
        .cwd(dep_dir)
        .run()
}
