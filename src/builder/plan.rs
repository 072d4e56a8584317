//! Per-(dependency, configuration) build planning.
//!
//! A [`BuildPlan`] bundles everything one CMake configure + build pass
//! needs: directory placement, the full argument vectors, the environment
//! overlay and the artifact search roots. Plans are pure data; execution
//! lives in [`crate::builder::cmake`].

use std::collections::HashMap;
use std::path::PathBuf;

use crate::builder::context::BuildConfig;
use crate::builder::paths;
use crate::core::manifest::DependencyRecord;
use crate::core::platform::PlatformContext;
use crate::core::workspace::Workspace;

#[derive(Debug)]
pub struct BuildPlan {
    /// Dependency source directory; configure runs with this as cwd.
    pub dep_dir: PathBuf,
    pub build_dir: PathBuf,
    pub configure_args: Vec<String>,
    pub build_args: Vec<String>,
    /// Variables layered over the inherited environment for this invocation.
    pub env: HashMap<String, String>,
    pub lib_dir: PathBuf,
    pub tools_dir: PathBuf,
    /// Root searched by install rules and by heuristic classification: the
    /// build directory when the dependency builds, its source directory
    /// otherwise.
    pub search_root: PathBuf,
    /// Extra directories scanned by heuristic classification only.
    pub extra_scan_dirs: Vec<PathBuf>,
}

impl BuildPlan {
    pub fn new(
        dep: &DependencyRecord,
        config: BuildConfig,
        platform: &PlatformContext,
        workspace: &Workspace,
        base_env: &HashMap<String, String>,
    ) -> Self {
        let dep_dir = workspace.dep_dir(dep);
        let build_dir = build_dir_for(dep, config, workspace);
        let lib_dir = workspace.output_lib_dir(platform, config.name());
        let tools_dir = workspace.output_tools_dir(platform, config.name());

        let mut search_paths = vec![lib_dir.clone()];
        for raw in &dep.library_paths {
            search_paths.push(paths::resolve_path(raw, workspace.root()));
        }

        let build_type = config.cmake_build_type(platform);

        let mut configure_args = vec![
            "-S".to_string(),
            ".".to_string(),
            "-B".to_string(),
            build_dir.display().to_string(),
        ];
        configure_args.extend(platform_cmake_args(platform, dep.cxx_standard));
        configure_args.push(format!("-DCMAKE_BUILD_TYPE={}", build_type));
        configure_args.extend(dep.cmake_options.iter().cloned());

        let search_flags = paths::linker_search_flags(&search_paths, platform);
        paths::merge_or_append_flag(&mut configure_args, "-DCMAKE_EXE_LINKER_FLAGS", &search_flags);
        paths::merge_or_append_flag(
            &mut configure_args,
            "-DCMAKE_SHARED_LINKER_FLAGS",
            &search_flags,
        );

        let mut build_args = vec!["--build".to_string(), build_dir.display().to_string()];
        if platform.is_windows() {
            // Multi-config generators need the type repeated at build time.
            build_args.push("--config".to_string());
            build_args.push(build_type.to_string());
        }

        let env = invocation_env(&search_paths, base_env, platform);

        let (search_root, extra_scan_dirs) = if dep.build {
            (
                build_dir.clone(),
                vec![dep_dir.join("bin"), dep_dir.join("lib")],
            )
        } else {
            (dep_dir.clone(), Vec::new())
        };

        BuildPlan {
            dep_dir,
            build_dir,
            configure_args,
            build_args,
            env,
            lib_dir,
            tools_dir,
            search_root,
            extra_scan_dirs,
        }
    }

    /// Directories scanned for heuristic artifact classification.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.search_root.clone()];
        roots.extend(self.extra_scan_dirs.iter().cloned());
        roots
    }
}

fn build_dir_for(dep: &DependencyRecord, config: BuildConfig, workspace: &Workspace) -> PathBuf {
    let redirect = workspace
        .manifest()
        .temp_dir
        .as_deref()
        .map(str::trim)
        .filter(|dir| !dir.is_empty());

    match redirect {
        Some(dir) => paths::resolve_path(dir, workspace.root())
            .join(format!("{}_{}", dep.name, config.name())),
        None => workspace
            .dep_dir(dep)
            .join(format!("build_{}", config.name())),
    }
}

/// Platform-wide CMake arguments shared by every dependency.
pub fn platform_cmake_args(platform: &PlatformContext, cxx_standard: u32) -> Vec<String> {
    let mut args = vec![
        format!("-DCMAKE_CXX_STANDARD={}", cxx_standard),
        "-DCMAKE_CXX_STANDARD_REQUIRED=ON".to_string(),
    ];

    if platform.is_windows() {
        args.push("-DVK_USE_PLATFORM_WIN32_KHR=ON".to_string());
        args.push("-DCMAKE_POLICY_DEFAULT_CMP0091=NEW".to_string());
        args.push("-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreaded$<$<CONFIG:Debug>:Debug>".to_string());
    } else {
        let mut link_flags = "-stdlib=libc++".to_string();
        if !platform.is_macos() {
            link_flags.push_str(" -lc++abi");
        }
        args.push("-G".to_string());
        args.push("Ninja".to_string());
        args.push("-DCMAKE_C_COMPILER=clang".to_string());
        args.push("-DCMAKE_CXX_COMPILER=clang++".to_string());
        args.push("-DCMAKE_C_FLAGS=-w".to_string());
        args.push("-DCMAKE_CXX_FLAGS=-w -stdlib=libc++".to_string());
        args.push(format!("-DCMAKE_EXE_LINKER_FLAGS={}", link_flags));
        args.push(format!("-DCMAKE_SHARED_LINKER_FLAGS={}", link_flags));
    }

    args
}

fn invocation_env(
    search_paths: &[PathBuf],
    base_env: &HashMap<String, String>,
    platform: &PlatformContext,
) -> HashMap<String, String> {
    let lib_var = platform.library_path_var();
    let mut env = HashMap::new();
    env.insert(
        lib_var.to_string(),
        paths::prepend_path_list(search_paths, base_env.get(lib_var).map(String::as_str), platform),
    );
    env.insert(
        "CMAKE_LIBRARY_PATH".to_string(),
        paths::prepend_path_list(
            search_paths,
            base_env.get("CMAKE_LIBRARY_PATH").map(String::as_str),
            platform,
        ),
    );
    env
}
