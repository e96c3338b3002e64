use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::ComponentCatalog;
use super::cluster::{ClusterContext, Role};
use super::ConfigError;

/// Cluster definition file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterFileFormat {
    Yaml,
    /// JSON, with `//` and `/* */` comments allowed
    Json,
}

impl ClusterFileFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") | Some("jsonc") => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("").to_string(),
            )),
        }
    }
}

/// A cluster and the node roles whose kubelet flags get resolved
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterDefinition {
    pub context: ClusterContext,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane: Option<Role>,

    #[serde(default)]
    pub worker_pools: Vec<Role>,

    /// Extra component catalog entries by `major.minor`
    #[serde(default)]
    pub components: ComponentCatalog,
}

impl ClusterDefinition {
    /// Every role, control plane first.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.control_plane.iter().chain(self.worker_pools.iter())
    }

    pub fn find_role(&self, name: &str) -> Option<&Role> {
        self.roles().find(|r| r.name == name)
    }
}

// ============================================================================
// SBIO: Pure parsing functions (no I/O)
// ============================================================================

/// Strip C-style comments from JSONC content.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => {
                result.push(c);
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
                result.push(c);
            }
            '/' if !in_string && chars.peek() == Some(&'/') => {
                for nc in chars.by_ref() {
                    if nc == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for nc in chars.by_ref() {
                    if prev == '*' && nc == '/' {
                        break;
                    }
                    prev = nc;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse a cluster definition from file content.
pub fn parse_cluster_definition(
    content: &str,
    format: ClusterFileFormat,
) -> Result<ClusterDefinition, ConfigError> {
    match format {
        ClusterFileFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        ClusterFileFormat::Json => serde_json::from_str(&strip_jsonc_comments(content))
            .map_err(|e| ConfigError::ParseError(e.to_string())),
    }
}
