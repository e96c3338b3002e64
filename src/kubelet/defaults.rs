//! Computed default kubelet flags for a cluster
//!
//! Defaults are the lowest-precedence layer: operator values at the cluster
//! or role level replace them, and static overrides replace both.

use tracing::warn;

use super::flags::*;
use crate::config::{ClusterContext, ComponentCatalog, NetworkPlugin, NetworkPolicy};

pub const DEFAULT_MAX_PODS: u32 = 110;
/// Pod ceiling when pods take addresses from the node's VNET
pub const DEFAULT_MAX_PODS_VNET_INTEGRATED: u32 = 30;
pub const DEFAULT_HARD_EVICTION_THRESHOLD: &str =
    "memory.available<750Mi,nodefs.available<10%,nodefs.inodesFree<5%";
pub const DEFAULT_IMAGE_GC_HIGH_THRESHOLD: u32 = 85;
pub const DEFAULT_IMAGE_GC_LOW_THRESHOLD: u32 = 80;
pub const DEFAULT_NON_MASQUERADE_CIDR: &str = "10.0.0.0/8";
pub const DEFAULT_EVENT_QPS: &str = "0";
pub const DEFAULT_CADVISOR_PORT: &str = "0";
pub const DEFAULT_POD_MAX_PIDS: i64 = 100;
pub const TLS_STRONG_CIPHER_SUITES: &str = "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,\
TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305,\
TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305,\
TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,TLS_RSA_WITH_AES_256_GCM_SHA384,\
TLS_RSA_WITH_AES_128_GCM_SHA256";

pub const MIN_VERSION_ROTATE_CERTIFICATES: &str = "1.11.9";
pub const MIN_VERSION_STRONG_CIPHERS: &str = "1.10.0";

/// Build the baseline flags for `ctx`. Pure: no input is modified.
pub fn build_defaults(ctx: &ClusterContext, catalog: &ComponentCatalog) -> FlagMap {
    let mut flags: FlagMap = [
        (CLUSTER_DOMAIN, "cluster.local"),
        (NETWORK_PLUGIN, "cni"),
        (EVICTION_HARD, DEFAULT_HARD_EVICTION_THRESHOLD),
        (NON_MASQUERADE_CIDR, DEFAULT_NON_MASQUERADE_CIDR),
        (CLOUD_PROVIDER, "azure"),
        (CLOUD_CONFIG, "/etc/kubernetes/azure.json"),
        (AZURE_CONTAINER_REGISTRY_CONFIG, "/etc/kubernetes/azure.json"),
        (EVENT_QPS, DEFAULT_EVENT_QPS),
        (CADVISOR_PORT, DEFAULT_CADVISOR_PORT),
        (IMAGE_PULL_PROGRESS_DEADLINE, "30m"),
        (ENFORCE_NODE_ALLOCATABLE, "pods"),
        (STREAMING_CONNECTION_IDLE_TIMEOUT, "5m"),
    ]
    .into_iter()
    .collect();

    flags.set(MAX_PODS, DEFAULT_MAX_PODS.to_string());
    flags.set(
        IMAGE_GC_HIGH_THRESHOLD,
        DEFAULT_IMAGE_GC_HIGH_THRESHOLD.to_string(),
    );
    flags.set(
        IMAGE_GC_LOW_THRESHOLD,
        DEFAULT_IMAGE_GC_LOW_THRESHOLD.to_string(),
    );
    flags.set(POD_MAX_PIDS, DEFAULT_POD_MAX_PIDS.to_string());

    match catalog.lookup(&ctx.orchestrator_version) {
        Some(components) => {
            flags.set(
                POD_INFRA_CONTAINER_IMAGE,
                format!("{}{}", ctx.image_base, components.pause),
            );
            flags.set(
                NODE_STATUS_UPDATE_FREQUENCY,
                components.node_status_frequency.as_str(),
            );
        }
        None => warn!(
            "No component versions known for {}; leaving {} and {} unset",
            ctx.orchestrator_version, POD_INFRA_CONTAINER_IMAGE, NODE_STATUS_UPDATE_FREQUENCY
        ),
    }

    if !ctx.ip_masq_agent {
        flags.set(NON_MASQUERADE_CIDR, ctx.cluster_subnet.as_str());
    }

    match ctx.network_plugin {
        NetworkPlugin::Azure => {
            flags.set(MAX_PODS, DEFAULT_MAX_PODS_VNET_INTEGRATED.to_string());
        }
        NetworkPlugin::Kubenet if ctx.network_policy != NetworkPolicy::Calico => {
            flags.set(NETWORK_PLUGIN, "kubenet");
        }
        _ => {}
    }

    let version = &ctx.orchestrator_version;
    if version.at_least(MIN_VERSION_ROTATE_CERTIFICATES) {
        flags.set(ROTATE_CERTIFICATES, "true");
    }
    if version.at_least(MIN_VERSION_STRONG_CIPHERS) {
        flags.set(TLS_CIPHER_SUITES, TLS_STRONG_CIPHER_SUITES);
    }

    flags
}
