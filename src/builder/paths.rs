//! Path resolution and linker search-path formatting.

use std::path::{Path, PathBuf};

use crate::core::platform::PlatformContext;

/// Resolve a manifest-supplied path against the workspace root. Absolute
/// paths, including Windows drive-letter paths on any host, are kept as-is.
pub fn resolve_path(raw: &str, root: &Path) -> PathBuf {
    if is_absolute(raw) {
        PathBuf::from(raw)
    } else {
        root.join(raw)
    }
}

fn is_absolute(raw: &str) -> bool {
    if Path::new(raw).is_absolute() {
        return true;
    }
    // `C:\...` and `C:/...` are not absolute to a Unix host.
    let bytes = raw.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Format one linker search flag in the platform's syntax.
pub fn linker_search_flag(path: &Path, platform: &PlatformContext) -> String {
    if platform.is_windows() {
        format!("/LIBPATH:\"{}\"", path.display())
    } else {
        format!("-L\"{}\"", path.display())
    }
}

/// Space-join several search paths into one flag value.
pub fn linker_search_flags(paths: &[PathBuf], platform: &PlatformContext) -> String {
    paths
        .iter()
        .map(|path| linker_search_flag(path, platform))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append `value` to the argument starting with `prefix=` if one exists,
/// preserving its position; otherwise push a new `prefix=value` argument.
pub fn merge_or_append_flag(args: &mut Vec<String>, prefix: &str, value: &str) {
    let key = format!("{}=", prefix);
    for arg in args.iter_mut() {
        if arg.starts_with(&key) {
            arg.push(' ');
            arg.push_str(value);
            return;
        }
    }
    args.push(format!("{}{}", key, value));
}

/// Prefix `paths`, joined with the platform list separator, to an existing
/// environment value. The existing value is never dropped.
pub fn prepend_path_list(
    paths: &[PathBuf],
    existing: Option<&str>,
    platform: &PlatformContext,
) -> String {
    let sep = platform.path_list_separator();
    let joined = paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(&sep.to_string());

    match existing {
        Some(old) if !old.is_empty() => format!("{}{}{}", joined, sep, old),
        _ => joined,
    }
}
