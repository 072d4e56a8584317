//! Platform-conditional filtering of manifest string lists.
//!
//! Manifest arrays may prefix entries with a platform spec: `win:`,
//! `linux,mac:`, `!win:`. Bare entries (no colon) always pass through
//! untouched. Prefixed entries are kept only when the spec matches the
//! target platform, with the value whitespace-trimmed.

use std::collections::HashSet;

use tracing::warn;

use crate::core::platform::PlatformContext;

/// Filter one manifest string list, preserving the relative order of the
/// surviving entries. Applied exactly once per list, at manifest load.
pub fn filter_platform_items(items: &[String], platform: &PlatformContext) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| evaluate_item(item, platform))
        .collect()
}

fn evaluate_item(item: &str, platform: &PlatformContext) -> Option<String> {
    let (spec, value) = match item.split_once(':') {
        Some(parts) => parts,
        // No platform spec: keep verbatim, whitespace and all.
        None => return Some(item.to_string()),
    };

    let spec = spec.trim();
    let (negated, tag_list) = match spec.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };

    // Unknown tags never match; each distinct one warns once per item.
    let mut warned: HashSet<&str> = HashSet::new();
    let mut matched = false;
    for tag in tag_list.split(',') {
        let tag = tag.trim();
        if !PlatformContext::is_known_tag(tag) {
            if warned.insert(tag) {
                warn!("unknown platform tag '{}' in '{}'", tag, item);
            }
            continue;
        }
        if tag == platform.tag() {
            matched = true;
        }
    }

    if matched != negated {
        Some(value.trim().to_string())
    } else {
        None
    }
}
