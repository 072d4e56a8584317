//! Target platform description.

/// Platform tags recognized in manifest filter expressions.
pub const KNOWN_TAGS: [&str; 3] = ["win", "linux", "mac"];

/// Immutable description of the platform dependencies are built for.
///
/// Constructed once at startup (or explicitly in tests) and threaded through
/// the filter, planner and matcher instead of being read from ambient `cfg!`
/// checks, so every platform's behavior is exercisable in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformContext {
    tag: &'static str,
    windows: bool,
    macos: bool,
}

impl PlatformContext {
    pub fn windows() -> Self {
        PlatformContext {
            tag: "win",
            windows: true,
            macos: false,
        }
    }

    pub fn macos() -> Self {
        PlatformContext {
            tag: "mac",
            windows: false,
            macos: true,
        }
    }

    pub fn linux() -> Self {
        PlatformContext {
            tag: "linux",
            windows: false,
            macos: false,
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::windows()
        } else if cfg!(target_os = "macos") {
            Self::macos()
        } else {
            Self::linux()
        }
    }

    /// Short tag used in filter specs and output directory names.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn is_windows(&self) -> bool {
        self.windows
    }

    pub fn is_macos(&self) -> bool {
        self.macos
    }

    /// Static library extension, with the leading dot.
    pub fn lib_ext(&self) -> &'static str {
        if self.windows {
            ".lib"
        } else {
            ".a"
        }
    }

    /// Executable extension, with the leading dot; empty on Unix-like hosts.
    pub fn exe_ext(&self) -> &'static str {
        if self.windows {
            ".exe"
        } else {
            ""
        }
    }

    /// Separator for path-list environment variables such as `LIBRARY_PATH`.
    pub fn path_list_separator(&self) -> char {
        if self.windows {
            ';'
        } else {
            ':'
        }
    }

    /// Environment variable the native linker consults for library search
    /// paths.
    pub fn library_path_var(&self) -> &'static str {
        if self.windows {
            "LIB"
        } else {
            "LIBRARY_PATH"
        }
    }

    /// Whether `tag` is one of the recognized platform tags.
    pub fn is_known_tag(tag: &str) -> bool {
        KNOWN_TAGS.contains(&tag)
    }
}
