//! Artifact discovery and classification.
//!
//! After a dependency's build (or straight from its source tree when it does
//! not build), every discovered file is classified against the record's
//! allow-lists and copied into the output layout. Classifications are not
//! exclusive; a file can be copied by more than one rule and counts once per
//! copy.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::builder::plan::BuildPlan;
use crate::core::manifest::DependencyRecord;
use crate::core::platform::PlatformContext;
use crate::util::fs::{copy_file, ensure_dir};
use crate::util::shell::{Shell, Status};

/// How a discovered file is routed to the output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Library,
    Executable,
    ExtraFile,
}

impl ArtifactKind {
    pub fn noun(&self) -> &'static str {
        match self {
            ArtifactKind::Library => "lib",
            ArtifactKind::Executable => "tool",
            ArtifactKind::ExtraFile => "extra file",
        }
    }
}

/// Classifies discovered file names against one dependency's allow-lists.
pub struct ArtifactMatcher<'a> {
    dep: &'a DependencyRecord,
    platform: &'a PlatformContext,
}

impl<'a> ArtifactMatcher<'a> {
    pub fn new(dep: &'a DependencyRecord, platform: &'a PlatformContext) -> Self {
        ArtifactMatcher { dep, platform }
    }

    /// Every classification that applies to `file_name`.
    pub fn classify(&self, file_name: &str) -> Vec<ArtifactKind> {
        let mut kinds = Vec::new();
        if self.matches_library(file_name) {
            kinds.push(ArtifactKind::Library);
        }
        if self.matches_executable(file_name) {
            kinds.push(ArtifactKind::Executable);
        }
        if self.matches_extra_file(file_name) {
            kinds.push(ArtifactKind::ExtraFile);
        }
        kinds
    }

    fn is_library_kind(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        if ext == self.platform.lib_ext() || ext == ".dylib" || ext == ".so" {
            return true;
        }
        if self.platform.is_windows() && (ext == ".pdb" || ext == ".dll") {
            return true;
        }
        // Versioned shared libraries keep their library role on Unix even
        // though the trailing component is a version number.
        if !self.platform.is_windows()
            && (file_name.contains(".so.") || file_name.contains(".dylib."))
        {
            return true;
        }
        false
    }

    fn matches_library(&self, file_name: &str) -> bool {
        if !self.is_library_kind(file_name) {
            return false;
        }
        match &self.dep.libs {
            None => true,
            Some(bases) => {
                let stem = stem_of(file_name);
                bases.iter().any(|base| {
                    stem == base.as_str()
                        || stem == format!("lib{}", base)
                        || file_name.starts_with(&format!("lib{}.so", base))
                        || file_name.starts_with(&format!("{}.so", base))
                })
            }
        }
    }

    fn matches_executable(&self, file_name: &str) -> bool {
        let Some(names) = &self.dep.executables else {
            return false;
        };
        if self.platform.is_windows() {
            let ext = extension_of(file_name);
            if ext != self.platform.exe_ext() && ext != ".pdb" {
                return false;
            }
            let stem = stem_of(file_name);
            names.iter().any(|name| stem == name.as_str())
        } else {
            extension_of(file_name).is_empty()
                && names.iter().any(|name| file_name == name.as_str())
        }
    }

    fn matches_extra_file(&self, file_name: &str) -> bool {
        match &self.dep.extra_files {
            Some(names) => names.iter().any(|name| file_name == name.as_str()),
            None => false,
        }
    }
}

/// Collect candidate files under each existing root, recursively, in a
/// deterministic order.
pub fn scan_artifact_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Scan the plan's roots and copy every classified artifact into the output
/// layout. Returns the number of copies performed.
pub fn harvest_artifacts(
    plan: &BuildPlan,
    matcher: &ArtifactMatcher<'_>,
    shell: &Shell,
) -> Result<usize> {
    let files = scan_artifact_files(&plan.scan_roots());
    let mut copied = 0;

    for file in &files {
        let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        for kind in matcher.classify(file_name) {
            let dest_dir = match kind {
                ArtifactKind::Library => &plan.lib_dir,
                ArtifactKind::Executable | ArtifactKind::ExtraFile => &plan.tools_dir,
            };
            ensure_dir(dest_dir)?;
            copy_file(file, &dest_dir.join(file_name))?;
            shell.status(Status::Copying, format!("{} ({})", file_name, kind.noun()));
            copied += 1;
        }
    }

    Ok(copied)
}

fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!(".{}", ext),
        None => String::new(),
    }
}

fn stem_of(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::context::BuildConfig;
    use crate::core::workspace::Workspace;
    use crate::util::shell::{ColorChoice, Verbosity};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn record(manifest: &str, platform: &PlatformContext) -> DependencyRecord {
        let manifest = crate::core::manifest::Manifest::parse(
            manifest,
            Path::new("vdeps.toml"),
            platform,
            Path::new("/work"),
        )
        .unwrap();
        manifest.dependencies.into_iter().next().unwrap()
    }

    const MATCH_ALL: &str = r#"
        [[dependency]]
        name = "demo"
        rel_path = "demo"
    "#;

    #[test]
    fn test_library_kind_extensions_linux() {
        let platform = PlatformContext::linux();
        let dep = record(MATCH_ALL, &platform);
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(matcher.classify("libdemo.a"), vec![ArtifactKind::Library]);
        assert_eq!(matcher.classify("libdemo.so"), vec![ArtifactKind::Library]);
        assert_eq!(matcher.classify("libdemo.dylib"), vec![ArtifactKind::Library]);
        assert!(matcher.classify("demo.lib").is_empty());
        assert!(matcher.classify("demo.pdb").is_empty());
        assert!(matcher.classify("demo.txt").is_empty());
        assert!(matcher.classify("demo.o").is_empty());
    }

    #[test]
    fn test_library_kind_extensions_windows() {
        let platform = PlatformContext::windows();
        let dep = record(MATCH_ALL, &platform);
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(matcher.classify("demo.lib"), vec![ArtifactKind::Library]);
        assert_eq!(matcher.classify("demo.dll"), vec![ArtifactKind::Library]);
        assert_eq!(matcher.classify("demo.pdb"), vec![ArtifactKind::Library]);
        assert!(matcher.classify("libdemo.a").is_empty());
    }

    #[test]
    fn test_versioned_shared_objects() {
        let platform = PlatformContext::linux();
        let dep = record(MATCH_ALL, &platform);
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(matcher.classify("libdemo.so.1"), vec![ArtifactKind::Library]);
        assert_eq!(
            matcher.classify("libdemo.so.1.2.3"),
            vec![ArtifactKind::Library]
        );
    }

    #[test]
    fn test_versioned_so_not_library_on_windows() {
        let platform = PlatformContext::windows();
        let dep = record(MATCH_ALL, &platform);
        let matcher = ArtifactMatcher::new(&dep, &platform);
        assert!(matcher.classify("libdemo.so.1").is_empty());
    }

    #[test]
    fn test_allow_list_matches_base_and_lib_prefix() {
        let platform = PlatformContext::linux();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            libs = ["complex_core", "complex_utils"]
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(
            matcher.classify("complex_core.a"),
            vec![ArtifactKind::Library]
        );
        assert_eq!(
            matcher.classify("libcomplex_core.a"),
            vec![ArtifactKind::Library]
        );
        assert_eq!(
            matcher.classify("libcomplex_utils.so"),
            vec![ArtifactKind::Library]
        );
        assert!(matcher.classify("complex_extras.a").is_empty());
        assert!(matcher.classify("libcomplex_extras.so").is_empty());
    }

    #[test]
    fn test_allow_list_matches_versioned_stems() {
        let platform = PlatformContext::linux();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            libs = ["fake_lib"]
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(
            matcher.classify("libfake_lib.so.1"),
            vec![ArtifactKind::Library]
        );
        assert_eq!(
            matcher.classify("fake_lib.so.1.2.3"),
            vec![ArtifactKind::Library]
        );
        assert!(matcher.classify("libother.so.1").is_empty());
    }

    #[test]
    fn test_empty_allow_list_matches_nothing() {
        let platform = PlatformContext::linux();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            libs = []
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);
        assert!(matcher.classify("libdemo.a").is_empty());
    }

    #[test]
    fn test_executables_unix() {
        let platform = PlatformContext::linux();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            executables = ["demo_tool"]
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(
            matcher.classify("demo_tool"),
            vec![ArtifactKind::Executable]
        );
        assert!(matcher.classify("demo_tool.txt").is_empty());
        assert!(matcher.classify("other_tool").is_empty());
    }

    #[test]
    fn test_executables_windows() {
        let platform = PlatformContext::windows();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            executables = ["demo_tool"]
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(
            matcher.classify("demo_tool.exe"),
            vec![ArtifactKind::Executable]
        );
        // A PDB named after a listed executable routes to tools and, as a
        // library-kind file with no lib allow-list, to lib as well.
        assert_eq!(
            matcher.classify("demo_tool.pdb"),
            vec![ArtifactKind::Library, ArtifactKind::Executable]
        );
        assert!(matcher.classify("demo_tool").is_empty());
    }

    #[test]
    fn test_executables_not_evaluated_when_undeclared() {
        let platform = PlatformContext::linux();
        let dep = record(MATCH_ALL, &platform);
        let matcher = ArtifactMatcher::new(&dep, &platform);
        assert!(matcher.classify("demo_tool").is_empty());
    }

    #[test]
    fn test_extra_files_exact_match() {
        let platform = PlatformContext::linux();
        let dep = record(
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            extra_files = ["settings.json"]
            "#,
            &platform,
        );
        let matcher = ArtifactMatcher::new(&dep, &platform);

        assert_eq!(
            matcher.classify("settings.json"),
            vec![ArtifactKind::ExtraFile]
        );
        assert!(matcher.classify("other.json").is_empty());
    }

    #[test]
    fn test_scan_skips_missing_roots() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("present");
        fs::create_dir_all(present.join("nested")).unwrap();
        fs::write(present.join("nested").join("libdemo.a"), "ar").unwrap();

        let files = scan_artifact_files(&[present.clone(), tmp.path().join("absent")]);
        assert_eq!(files, vec![present.join("nested").join("libdemo.a")]);
    }

    #[test]
    fn test_harvest_copies_and_counts() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("vdeps.toml"),
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            build = false
            extra_files = ["settings.json"]
            "#,
        )
        .unwrap();
        let platform = PlatformContext::linux();
        let ws = Workspace::load(tmp.path().to_path_buf(), None, &platform).unwrap();
        let dep = &ws.manifest().dependencies[0];

        let dep_dir = ws.dep_dir(dep);
        fs::create_dir_all(dep_dir.join("lib")).unwrap();
        fs::write(dep_dir.join("lib").join("libdemo.a"), "ar").unwrap();
        fs::write(dep_dir.join("lib").join("libdemo.so.1"), "so").unwrap();
        fs::write(dep_dir.join("settings.json"), "{}").unwrap();
        fs::write(dep_dir.join("readme.md"), "docs").unwrap();

        let plan = BuildPlan::new(dep, BuildConfig::Debug, &platform, &ws, &HashMap::new());
        let matcher = ArtifactMatcher::new(dep, &platform);
        let shell = Shell::new(Verbosity::Quiet, ColorChoice::Never);

        let copied = harvest_artifacts(&plan, &matcher, &shell).unwrap();
        assert_eq!(copied, 3);
        assert!(plan.lib_dir.join("libdemo.a").exists());
        assert!(plan.lib_dir.join("libdemo.so.1").exists());
        assert!(plan.tools_dir.join("settings.json").exists());
        assert!(!plan.lib_dir.join("readme.md").exists());
    }

    #[test]
    fn test_harvest_overwrites_existing() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("vdeps.toml"),
            r#"
            [[dependency]]
            name = "demo"
            rel_path = "demo"
            build = false
            "#,
        )
        .unwrap();
        let platform = PlatformContext::linux();
        let ws = Workspace::load(tmp.path().to_path_buf(), None, &platform).unwrap();
        let dep = &ws.manifest().dependencies[0];

        let dep_dir = ws.dep_dir(dep);
        fs::create_dir_all(&dep_dir).unwrap();
        fs::write(dep_dir.join("libdemo.a"), "new contents").unwrap();

        let plan = BuildPlan::new(dep, BuildConfig::Debug, &platform, &ws, &HashMap::new());
        fs::create_dir_all(&plan.lib_dir).unwrap();
        fs::write(plan.lib_dir.join("libdemo.a"), "stale").unwrap();

        let matcher = ArtifactMatcher::new(dep, &platform);
        let shell = Shell::new(Verbosity::Quiet, ColorChoice::Never);
        harvest_artifacts(&plan, &matcher, &shell).unwrap();

        assert_eq!(
            fs::read_to_string(plan.lib_dir.join("libdemo.a")).unwrap(),
            "new contents"
        );
    }
}
