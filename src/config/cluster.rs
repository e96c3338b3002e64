use serde::{Deserialize, Serialize};

use crate::kubelet::FlagMap;
use crate::version::OrchestratorVersion;

/// Default pod subnet used for `--non-masquerade-cidr` when the masquerade
/// agent is off and no subnet was given
pub const DEFAULT_CLUSTER_SUBNET: &str = "10.244.0.0/16";

/// Default in-cluster DNS service address
pub const DEFAULT_DNS_SERVICE_IP: &str = "10.0.0.10";

/// Default container image registry prefix
pub const DEFAULT_IMAGE_BASE: &str = "k8s.gcr.io/";

/// Network plugin variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPlugin {
    /// CNI plugin with VNET-integrated pod addressing
    Azure,
    #[default]
    Kubenet,
    Flannel,
    Cilium,
}

/// Network policy variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPolicy {
    #[default]
    None,
    Calico,
    Azure,
    Cilium,
}

/// How the cloud provider integration runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProviderMode {
    /// In-tree provider built into the kubelet
    #[default]
    Managed,
    /// Out-of-tree cloud controller manager
    External,
}

/// Node operating system family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    #[default]
    Linux,
    Windows,
}

/// Which node group a role describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    ControlPlane,
    WorkerPool,
}

/// Cluster-wide inputs, read-only during resolution
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterContext {
    pub orchestrator_version: OrchestratorVersion,

    #[serde(default = "default_dns_service_ip")]
    pub dns_service_ip: String,

    #[serde(default = "default_image_base")]
    pub image_base: String,

    #[serde(default)]
    pub network_plugin: NetworkPlugin,

    #[serde(default)]
    pub network_policy: NetworkPolicy,

    #[serde(default)]
    pub cloud_provider: CloudProviderMode,

    /// Whether the IP masquerade agent runs on nodes
    #[serde(default = "default_true")]
    pub ip_masq_agent: bool,

    #[serde(default = "default_cluster_subnet")]
    pub cluster_subnet: String,

    /// Require authenticated, CA-verified kubelet API access
    #[serde(default = "default_true")]
    pub secure_kubelet: bool,

    /// GPU device plugin handles accelerators instead of the kubelet gate
    #[serde(default)]
    pub gpu_device_plugin: bool,

    /// Re-resolving an existing cluster rather than provisioning a new one
    #[serde(default)]
    pub is_upgrade: bool,

    /// Operator overrides applied to every role
    #[serde(default)]
    pub kubelet_config: FlagMap,
}

impl ClusterContext {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            orchestrator_version: OrchestratorVersion::new(version),
            dns_service_ip: default_dns_service_ip(),
            image_base: default_image_base(),
            network_plugin: NetworkPlugin::default(),
            network_policy: NetworkPolicy::default(),
            cloud_provider: CloudProviderMode::default(),
            ip_masq_agent: true,
            cluster_subnet: default_cluster_subnet(),
            secure_kubelet: true,
            gpu_device_plugin: false,
            is_upgrade: false,
            kubelet_config: FlagMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        self.orchestrator_version.as_str()
    }
}

/// A node group: the control plane or one worker pool
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Role {
    pub name: String,

    #[serde(default)]
    pub os_family: OsFamily,

    /// Hardware size identifier, e.g. `Standard_NC6`
    #[serde(default)]
    pub vm_size: String,

    /// Operator overrides for this role; replaced by the resolved flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubelet_config: Option<FlagMap>,
}

impl Role {
    pub fn new(name: impl Into<String>, os_family: OsFamily) -> Self {
        Self {
            name: name.into(),
            os_family,
            vm_size: String::new(),
            kubelet_config: None,
        }
    }

    pub fn with_vm_size(mut self, vm_size: impl Into<String>) -> Self {
        self.vm_size = vm_size.into();
        self
    }

    pub fn with_kubelet_config(mut self, flags: FlagMap) -> Self {
        self.kubelet_config = Some(flags);
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_dns_service_ip() -> String {
    DEFAULT_DNS_SERVICE_IP.to_string()
}

fn default_image_base() -> String {
    DEFAULT_IMAGE_BASE.to_string()
}

fn default_cluster_subnet() -> String {
    DEFAULT_CLUSTER_SUBNET.to_string()
}
