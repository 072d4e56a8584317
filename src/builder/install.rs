//! Explicit install rules.
//!
//! Install rules copy files by glob pattern, independently of heuristic
//! artifact classification. A file can be picked up by both.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use crate::builder::plan::BuildPlan;
use crate::core::manifest::InstallRule;
use crate::util::fs::{copy_file, ensure_dir, glob_files};
use crate::util::shell::{Shell, Status};

/// Apply one dependency's install rules against the plan's search root.
/// Returns the number of files copied.
pub fn apply_install_rules(
    rules: &[InstallRule],
    plan: &BuildPlan,
    shell: &Shell,
) -> Result<usize> {
    let mut copied = 0;
    for rule in rules {
        copied += apply_rule(rule, plan, shell)?;
    }
    Ok(copied)
}

fn apply_rule(rule: &InstallRule, plan: &BuildPlan, shell: &Shell) -> Result<usize> {
    let mut components = Path::new(&rule.target).components();
    let base = components
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default();

    let dest_root = match base.as_str() {
        "lib" => &plan.lib_dir,
        "tools" => &plan.tools_dir,
        other => {
            warn!("unknown install target base '{}' (expected lib or tools)", other);
            return Ok(0);
        }
    };

    let subdir: PathBuf = components.as_path().to_path_buf();
    let dest_dir = dest_root.join(&subdir);
    ensure_dir(&dest_dir)?;

    let files = match glob_files(&plan.search_root, std::slice::from_ref(&rule.pattern)) {
        Ok(files) => files,
        Err(err) => {
            warn!("install rule '{}' skipped: {:#}", rule.pattern, err);
            return Ok(0);
        }
    };

    let mut copied = 0;
    for file in &files {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        copy_file(file, &dest_dir.join(file_name))?;
        shell.status(
            Status::Copying,
            format!("{} ({})", file_name.to_string_lossy(), rule.target),
        );
        copied += 1;
    }

    Ok(copied)
}
