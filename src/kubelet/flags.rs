//! Kubelet flag map and well-known flag names

use std::collections::hash_map::Iter;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const ADDRESS: &str = "--address";
pub const ALLOW_PRIVILEGED: &str = "--allow-privileged";
pub const ANONYMOUS_AUTH: &str = "--anonymous-auth";
pub const AUTHORIZATION_MODE: &str = "--authorization-mode";
pub const AZURE_CONTAINER_REGISTRY_CONFIG: &str = "--azure-container-registry-config";
pub const CADVISOR_PORT: &str = "--cadvisor-port";
pub const CGROUPS_PER_QOS: &str = "--cgroups-per-qos";
pub const CLIENT_CA_FILE: &str = "--client-ca-file";
pub const CLOUD_CONFIG: &str = "--cloud-config";
pub const CLOUD_PROVIDER: &str = "--cloud-provider";
pub const CLUSTER_DNS: &str = "--cluster-dns";
pub const CLUSTER_DOMAIN: &str = "--cluster-domain";
pub const ENFORCE_NODE_ALLOCATABLE: &str = "--enforce-node-allocatable";
pub const EVENT_QPS: &str = "--event-qps";
pub const EVICTION_HARD: &str = "--eviction-hard";
pub const FEATURE_GATES: &str = "--feature-gates";
pub const HAIRPIN_MODE: &str = "--hairpin-mode";
pub const IMAGE_GC_HIGH_THRESHOLD: &str = "--image-gc-high-threshold";
pub const IMAGE_GC_LOW_THRESHOLD: &str = "--image-gc-low-threshold";
pub const IMAGE_PULL_PROGRESS_DEADLINE: &str = "--image-pull-progress-deadline";
pub const KEEP_TERMINATED_POD_VOLUMES: &str = "--keep-terminated-pod-volumes";
pub const KUBECONFIG: &str = "--kubeconfig";
pub const MAX_PODS: &str = "--max-pods";
pub const NETWORK_PLUGIN: &str = "--network-plugin";
pub const NODE_STATUS_UPDATE_FREQUENCY: &str = "--node-status-update-frequency";
pub const NON_MASQUERADE_CIDR: &str = "--non-masquerade-cidr";
pub const POD_INFRA_CONTAINER_IMAGE: &str = "--pod-infra-container-image";
pub const POD_MANIFEST_PATH: &str = "--pod-manifest-path";
pub const POD_MAX_PIDS: &str = "--pod-max-pids";
pub const RESOLV_CONF: &str = "--resolv-conf";
pub const ROTATE_CERTIFICATES: &str = "--rotate-certificates";
pub const STREAMING_CONNECTION_IDLE_TIMEOUT: &str = "--streaming-connection-idle-timeout";
pub const SYSTEM_RESERVED: &str = "--system-reserved";
pub const TLS_CERT_FILE: &str = "--tls-cert-file";
pub const TLS_CIPHER_SUITES: &str = "--tls-cipher-suites";
pub const TLS_PRIVATE_KEY_FILE: &str = "--tls-private-key-file";

/// Value marking a flag as "present but to be removed" mid-pipeline
pub const SENTINEL_EMPTY: &str = "";

/// Mapping of kubelet flag name to value.
///
/// Iteration order is unspecified; anything that needs a stable order
/// (rendering, comparison output) must sort explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FlagMap(HashMap<String, String>);

impl FlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a flag, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a flag only when it is not already present.
    /// Returns true when the value was inserted.
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), value.to_string());
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    /// Entries sorted by flag name
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<'a> IntoIterator for &'a FlagMap {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_absent_keeps_existing() {
        let mut flags = FlagMap::new();
        flags.set(MAX_PODS, "50");
        assert!(!flags.set_if_absent(MAX_PODS, "110"));
        assert!(flags.set_if_absent(CLUSTER_DOMAIN, "cluster.local"));
        assert_eq!(flags.get(MAX_PODS), Some("50"));
        assert_eq!(flags.get(CLUSTER_DOMAIN), Some("cluster.local"));
    }

    #[test]
    fn test_sorted_is_by_key() {
        let flags: FlagMap = [("--b", "2"), ("--a", "1"), ("--c", "3")]
            .into_iter()
            .collect();
        let keys: Vec<_> = flags.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["--a", "--b", "--c"]);
    }

    #[test]
    fn test_deserialize_from_yaml_mapping() {
        let yaml = "\"--max-pods\": \"30\"\n\"--cluster-domain\": example.local\n";
        let flags: FlagMap = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(flags.get(MAX_PODS), Some("30"));
        assert_eq!(flags.len(), 2);
    }
}
