//! Build configurations.

use crate::core::platform::PlatformContext;

/// The build variants produced for every dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildConfig {
    Debug,
    Release,
}

impl BuildConfig {
    /// Every configuration, in the order it is built.
    pub const ALL: [BuildConfig; 2] = [BuildConfig::Debug, BuildConfig::Release];

    /// Short name used in directory suffixes (`<tag>_<name>`).
    pub fn name(&self) -> &'static str {
        match self {
            BuildConfig::Debug => "debug",
            BuildConfig::Release => "release",
        }
    }

    /// CMake configuration type. Release maps to RelWithDebInfo on Windows.
    pub fn cmake_build_type(&self, platform: &PlatformContext) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release if platform.is_windows() => "RelWithDebInfo",
            BuildConfig::Release => "Release",
        }
    }
}

impl std::fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
