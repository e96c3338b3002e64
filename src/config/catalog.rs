//! Version-indexed component lookup table
//!
//! Image tags and per-release kubelet settings change with the orchestrator
//! minor version. Entries are keyed by `major.minor`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::version::OrchestratorVersion;

const PAUSE_3_0: &str = "pause-amd64:3.0";
const PAUSE_3_1: &str = "pause-amd64:3.1";
const NODE_STATUS_FREQUENCY: &str = "10s";

/// Components pinned for one orchestrator minor version
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentVersions {
    /// Pause image name and tag, appended to the image base
    pub pause: String,
    pub node_status_frequency: String,
}

/// Read-only table of [`ComponentVersions`] by `major.minor`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ComponentCatalog {
    entries: HashMap<String, ComponentVersions>,
}

impl ComponentCatalog {
    /// Releases this build knows about.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for minor in 6..=16u32 {
            let pause = if minor < 8 { PAUSE_3_0 } else { PAUSE_3_1 };
            catalog.insert(
                &format!("1.{}", minor),
                ComponentVersions {
                    pause: pause.to_string(),
                    node_status_frequency: NODE_STATUS_FREQUENCY.to_string(),
                },
            );
        }
        catalog
    }

    pub fn insert(&mut self, minor: &str, components: ComponentVersions) {
        self.entries.insert(minor.to_string(), components);
    }

    /// Add every entry of `overrides`, replacing entries for the same minor.
    pub fn extend(&mut self, overrides: &ComponentCatalog) {
        for (minor, components) in &overrides.entries {
            self.entries.insert(minor.clone(), components.clone());
        }
    }

    /// Components for `version`, or `None` for unknown or unparsable versions.
    pub fn lookup(&self, version: &OrchestratorVersion) -> Option<&ComponentVersions> {
        version.minor_key().and_then(|key| self.entries.get(&key))
    }
}
