//! CMake invocation driver.

use anyhow::{Context, Result};

use crate::builder::plan::BuildPlan;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Executes the configure and build steps for one plan.
///
/// Child stdio is inherited so CMake's own output streams through; a
/// non-zero exit aborts the whole run.
pub struct CMakeDriver<'a> {
    plan: &'a BuildPlan,
}

impl<'a> CMakeDriver<'a> {
    pub fn new(plan: &'a BuildPlan) -> Self {
        CMakeDriver { plan }
    }

    /// Whether a previous configure left its cache in the build directory.
    pub fn is_configured(&self) -> bool {
        self.plan.build_dir.join("CMakeCache.txt").exists()
    }

    pub fn configure(&self) -> Result<()> {
        // Redirected build dirs may point outside the dependency tree.
        if let Some(parent) = self.plan.build_dir.parent() {
            ensure_dir(parent)?;
        }

        self.command()?.args(&self.plan.configure_args).run()
    }

    pub fn build(&self) -> Result<()> {
        self.command()?.args(&self.plan.build_args).run()
    }

    fn command(&self) -> Result<ProcessBuilder> {
        let cmake = find_cmake().context("cmake not found in PATH")?;
        Ok(ProcessBuilder::new(cmake)
            .cwd(&self.plan.dep_dir)
            .envs(&self.plan.env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::context::BuildConfig;
    use crate::core::platform::PlatformContext;
    use crate::core::workspace::Workspace;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn demo_plan(tmp: &TempDir) -> BuildPlan {
        fs::write(
            tmp.path().join("vdeps.toml"),
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            "#,
        )
        .unwrap();
        let platform = PlatformContext::linux();
        let ws = Workspace::load(tmp.path().to_path_buf(), None, &platform).unwrap();
        BuildPlan::new(
            &ws.manifest().dependencies[0],
            BuildConfig::Debug,
            &platform,
            &ws,
            &HashMap::new(),
        )
    }

    #[test]
    fn test_cache_evidence_detection() {
        let tmp = TempDir::new().unwrap();
        let plan = demo_plan(&tmp);
        let driver = CMakeDriver::new(&plan);

        assert!(!driver.is_configured());

        fs::create_dir_all(&plan.build_dir).unwrap();
        fs::write(plan.build_dir.join("CMakeCache.txt"), "# cache").unwrap();
        assert!(driver.is_configured());
    }
}
