//! Version-floor/ceiling removal and the empty-sentinel sweep

use tracing::debug;

use super::flags::{FlagMap, ALLOW_PRIVILEGED, CADVISOR_PORT, POD_MAX_PIDS, SENTINEL_EMPTY};
use crate::version::at_least;

/// Flags the kubelet does not accept before the given version
pub const INTRODUCED_IN: &[(&str, &str)] = &[(POD_MAX_PIDS, "1.10.0")];

/// Flags the kubelet no longer accepts from the given version on
pub const RETIRED_IN: &[(&str, &str)] = &[
    (CADVISOR_PORT, "1.12.0"),
    (ALLOW_PRIVILEGED, "1.15.0-beta.1"),
];

/// Remove flags unsupported by `version`, then every flag whose value is the
/// empty sentinel.
///
/// The version removals must run first: static overrides blank flags on
/// purpose and rely on this sweep to drop them.
pub fn filter_flags(flags: &mut FlagMap, version: &str) {
    for (key, floor) in INTRODUCED_IN {
        if !at_least(version, floor) && flags.remove(key).is_some() {
            debug!("Removed {} (requires >= {})", key, floor);
        }
    }

    for (key, ceiling) in RETIRED_IN {
        if at_least(version, ceiling) && flags.remove(key).is_some() {
            debug!("Removed {} (retired in {})", key, ceiling);
        }
    }

    flags.retain(|_, value| value != SENTINEL_EMPTY);
}
