//! Orchestrator version gating
//!
//! Every version-dependent decision in the resolver goes through
//! [`at_least`]. Versions are compared with semantic-version ordering, so a
//! pre-release such as `1.15.0-beta.1` sorts before `1.15.0`.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors produced when an orchestrator version string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionError {
    #[error("Orchestrator version is empty")]
    Empty,

    #[error("Invalid orchestrator version '{0}': {1}")]
    Invalid(String, String),
}

/// Target orchestrator version as written in the cluster definition.
///
/// The raw string is kept as-is; it is only interpreted when compared
/// against a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OrchestratorVersion(String);

impl OrchestratorVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a semantic version. A leading `v` is accepted.
    pub fn parse(&self) -> Result<Version, VersionError> {
        parse_version(&self.0)
    }

    /// True when this version is at or above `threshold`.
    pub fn at_least(&self, threshold: &str) -> bool {
        at_least(&self.0, threshold)
    }

    /// `major.minor` of the version, used to index the component catalog.
    pub fn minor_key(&self) -> Option<String> {
        self.parse()
            .ok()
            .map(|v| format!("{}.{}", v.major, v.minor))
    }
}

impl fmt::Display for OrchestratorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_version(raw: &str) -> Result<Version, VersionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(stripped).map_err(|e| VersionError::Invalid(raw.to_string(), e.to_string()))
}

/// Check whether `version` is at or above `threshold`.
///
/// Fails closed: if either side does not parse, the threshold is treated as
/// not met and a warning is logged. Resolution never aborts on a bad version.
pub fn at_least(version: &str, threshold: &str) -> bool {
    let version = match parse_version(version) {
        Ok(v) => v,
        Err(e) => {
            warn!("{}; treating '>= {}' as not met", e, threshold);
            return false;
        }
    };
    match parse_version(threshold) {
        Ok(t) => version >= t,
        Err(e) => {
            warn!("Invalid version threshold: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_ordering() {
        assert!(at_least("1.10.0", "1.10.0"));
        assert!(at_least("1.10.1", "1.10.0"));
        assert!(at_least("1.12.0", "1.9.11"));
        assert!(!at_least("1.9.11", "1.10.0"));
    }

    #[test]
    fn test_prerelease_sorts_before_release() {
        assert!(!at_least("1.15.0-beta.1", "1.15.0"));
        assert!(at_least("1.15.0", "1.15.0-beta.1"));
        assert!(at_least("1.15.0-beta.1", "1.15.0-beta.1"));
        assert!(!at_least("1.15.0-alpha.3", "1.15.0-beta.1"));
        assert!(at_least("1.15.0-rc.1", "1.15.0-beta.1"));
    }

    #[test]
    fn test_leading_v_accepted() {
        assert!(at_least("v1.11.9", "1.11.9"));
    }

    #[test]
    fn test_unparsable_fails_closed() {
        assert!(!at_least("latest", "1.0.0"));
        assert!(!at_least("", "0.0.0"));
        assert!(!at_least("1.10", "1.6.0"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(OrchestratorVersion::new("  ").parse(), Err(VersionError::Empty));
        assert!(matches!(
            OrchestratorVersion::new("one.two").parse(),
            Err(VersionError::Invalid(_, _))
        ));
    }

    #[test]
    fn test_minor_key() {
        let v = OrchestratorVersion::new("1.15.0-beta.1");
        assert_eq!(v.minor_key(), Some("1.15".to_string()));
        assert_eq!(OrchestratorVersion::new("bogus").minor_key(), None);
    }
}
