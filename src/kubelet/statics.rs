//! Platform flags the operator can never override
//!
//! Windows values are derived from the Linux set: Linux-only entries are
//! blanked with the empty sentinel, then platform paths and additions are
//! written on top.

use super::flags::*;
use crate::config::{ClusterContext, CloudProviderMode, OsFamily};

/// Quoted-empty token the Windows start script passes through as an empty
/// argument. Unlike [`SENTINEL_EMPTY`] it survives the sentinel sweep.
pub const WINDOWS_EMPTY_ARG: &str = "\"\"\"\"";

/// Flags that only make sense on Linux nodes
const LINUX_ONLY: &[&str] = &[POD_MANIFEST_PATH, TLS_CERT_FILE, TLS_PRIVATE_KEY_FILE];

/// Flags dropped when secure kubelet access is disabled
pub const SECURE_KUBELET_FLAGS: &[&str] = &[ANONYMOUS_AUTH, CLIENT_CA_FILE];

/// Forced flag values per operating system family
#[derive(Debug, Clone, PartialEq)]
pub struct StaticOverrides {
    linux: FlagMap,
    windows: FlagMap,
}

impl StaticOverrides {
    pub fn for_context(ctx: &ClusterContext) -> Self {
        let linux = linux_flags(ctx);
        let windows = windows_flags(&linux, ctx.secure_kubelet);
        Self { linux, windows }
    }

    pub fn for_os(&self, os: OsFamily) -> &FlagMap {
        match os {
            OsFamily::Linux => &self.linux,
            OsFamily::Windows => &self.windows,
        }
    }

    /// Overwrite every flag the `os` set defines, whatever `flags` held.
    pub fn apply(&self, flags: &mut FlagMap, os: OsFamily) {
        for (key, value) in self.for_os(os) {
            flags.set(key.as_str(), value.as_str());
        }
    }
}

fn linux_flags(ctx: &ClusterContext) -> FlagMap {
    let mut flags: FlagMap = [
        (ADDRESS, "0.0.0.0"),
        (ALLOW_PRIVILEGED, "true"),
        (ANONYMOUS_AUTH, "false"),
        (AUTHORIZATION_MODE, "Webhook"),
        (CLIENT_CA_FILE, "/etc/kubernetes/certs/ca.crt"),
        (POD_MANIFEST_PATH, "/etc/kubernetes/manifests"),
        (CLUSTER_DNS, ctx.dns_service_ip.as_str()),
        (CGROUPS_PER_QOS, "true"),
        (KUBECONFIG, "/var/lib/kubelet/kubeconfig"),
        (KEEP_TERMINATED_POD_VOLUMES, "false"),
        (TLS_CERT_FILE, "/etc/kubernetes/certs/kubeletserver.crt"),
        (TLS_PRIVATE_KEY_FILE, "/etc/kubernetes/certs/kubeletserver.key"),
    ]
    .into_iter()
    .collect();

    if ctx.cloud_provider == CloudProviderMode::External {
        flags.set(CLOUD_PROVIDER, "external");
    }

    if !ctx.secure_kubelet {
        for key in SECURE_KUBELET_FLAGS {
            flags.set(*key, SENTINEL_EMPTY);
        }
    }

    flags
}

fn windows_flags(linux: &FlagMap, secure_kubelet: bool) -> FlagMap {
    let mut flags = linux.clone();
    for key in LINUX_ONLY {
        flags.set(*key, SENTINEL_EMPTY);
    }

    flags.set(AZURE_CONTAINER_REGISTRY_CONFIG, "c:\\k\\azure.json");
    flags.set(POD_INFRA_CONTAINER_IMAGE, "kubletwin/pause");
    flags.set(KUBECONFIG, "c:\\k\\config");
    flags.set(CLOUD_CONFIG, "c:\\k\\azure.json");
    flags.set(CGROUPS_PER_QOS, "false");
    flags.set(ENFORCE_NODE_ALLOCATABLE, WINDOWS_EMPTY_ARG);
    flags.set(SYSTEM_RESERVED, "memory=2Gi");
    flags.set(HAIRPIN_MODE, "promiscuous-bridge");
    flags.set(IMAGE_PULL_PROGRESS_DEADLINE, "20m");
    flags.set(RESOLV_CONF, WINDOWS_EMPTY_ARG);
    flags.set(EVICTION_HARD, WINDOWS_EMPTY_ARG);
    if secure_kubelet {
        flags.set(CLIENT_CA_FILE, "c:\\k\\ca.crt");
    }

    flags
}
