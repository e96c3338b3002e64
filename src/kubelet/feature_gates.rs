//! Feature gate accumulation
//!
//! The kubelet takes all feature gates through one comma-joined flag. Here
//! the gates are handled as an ordered list of `name=value` entries and only
//! flattened back to the comma-joined form when written into a [`FlagMap`].

use std::fmt;

use tracing::debug;

use super::flags::{FlagMap, FEATURE_GATES};
use crate::version::at_least;

pub const POD_PRIORITY: &str = "PodPriority=true";
pub const ROTATE_KUBELET_SERVER_CERTIFICATE: &str = "RotateKubeletServerCertificate=true";
pub const ACCELERATORS: &str = "Accelerators=true";
pub const SUPPORT_POD_PIDS_LIMIT: &str = "SupportPodPidsLimit=true";

/// Gates every role receives once the orchestrator version reaches the floor
pub const VERSIONED_DEFAULT_GATES: &[(&str, &str)] = &[
    ("1.8.0", POD_PRIORITY),
    ("1.11.9", ROTATE_KUBELET_SERVER_CERTIFICATE),
];

/// Ordered set of `name=value` feature gate entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureGateSet {
    entries: Vec<String>,
}

impl FeatureGateSet {
    /// Parse the comma-joined composite form. Blank segments are dropped;
    /// every other segment is kept as written and in order.
    pub fn parse(composite: &str) -> Self {
        let entries = composite
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Read the gates currently stored in `flags`.
    pub fn from_flags(flags: &FlagMap) -> Self {
        flags.get(FEATURE_GATES).map(Self::parse).unwrap_or_default()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Append `entry` unless that exact entry is already present.
    /// Existing entries keep their position. Returns true when appended.
    pub fn insert(&mut self, entry: &str) -> bool {
        if self.contains(entry) {
            return false;
        }
        self.entries.push(entry.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the composite back into `flags`. An empty set removes the flag.
    pub fn store(&self, flags: &mut FlagMap) {
        if self.is_empty() {
            flags.remove(FEATURE_GATES);
        } else {
            flags.set(FEATURE_GATES, self.to_string());
        }
    }
}

impl fmt::Display for FeatureGateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join(","))
    }
}

/// Add `entry` to the feature gates of `flags` when `version >= threshold`.
///
/// Below the threshold nothing changes. An entry already present is not
/// added again; the same gate with another value still gets `entry` appended.
pub fn add_gate(flags: &mut FlagMap, version: &str, threshold: &str, entry: &str) {
    if !at_least(version, threshold) {
        return;
    }
    let mut gates = FeatureGateSet::from_flags(flags);
    if gates.insert(entry) {
        debug!("Enabled feature gate {} (>= {})", entry, threshold);
    }
    gates.store(flags);
}

/// Apply every gate in [`VERSIONED_DEFAULT_GATES`].
pub fn add_default_gates(flags: &mut FlagMap, version: &str) {
    for (threshold, entry) in VERSIONED_DEFAULT_GATES {
        add_gate(flags, version, threshold, entry);
    }
}
