pub mod catalog;
pub mod cluster;
pub mod definition;

pub use catalog::{ComponentCatalog, ComponentVersions};
pub use cluster::{
    CloudProviderMode, ClusterContext, NetworkPlugin, NetworkPolicy, OsFamily, Role, RoleKind,
};
pub use definition::{
    parse_cluster_definition, strip_jsonc_comments, ClusterDefinition, ClusterFileFormat,
};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors for loading cluster definition files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse cluster definition: {0}")]
    ParseError(String),

    #[error("Unsupported cluster definition format '{0}' (expected .yaml, .yml, .json or .jsonc)")]
    UnsupportedFormat(String),
}

// ============================================================================
// SBIO: I/O wrapper - thin layer over pure functions
// ============================================================================

/// Expand a leading `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

/// Load and parse a cluster definition file from disk.
pub fn load_cluster_file(path: &Path) -> Result<ClusterDefinition, ConfigError> {
    let path = expand_path(path);
    let format = ClusterFileFormat::from_path(&path)?;
    let content = std::fs::read_to_string(&path)?;
    parse_cluster_definition(&content, format)
}
