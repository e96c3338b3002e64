//! Per-role kubelet flag resolution
//!
//! Every role runs the same ordered pipeline against its own flag map:
//!
//! 1. static overrides for the role's OS (unconditional overwrite)
//! 2. fill gaps from the shared defaults snapshot
//! 3. version-gated default feature gates
//! 4. GPU accelerator gate for GPU-class worker pools
//! 5. pod PID limit clamp on upgrade
//! 6. version filter and sentinel sweep
//!
//! The defaults snapshot is built once per pass and only ever read, so roles
//! are independent of each other. Running a pass over its own output yields
//! the same flags.

use tracing::{debug, info};

use super::defaults::build_defaults;
use super::feature_gates::{
    add_default_gates, add_gate, FeatureGateSet, ACCELERATORS, SUPPORT_POD_PIDS_LIMIT,
};
use super::filter::filter_flags;
use super::flags::{FlagMap, POD_MAX_PIDS};
use super::merge::fill_missing;
use super::statics::StaticOverrides;
use crate::config::{ClusterContext, ClusterDefinition, ComponentCatalog, Role, RoleKind};
use crate::version::at_least;

/// Hardware size identifiers of GPU-class machines
pub const GPU_VM_SIZE_MARKER: &str = "Standard_N";

/// Accelerator gate applies from this version...
pub const MIN_VERSION_ACCELERATORS: &str = "1.6.0";
/// ...until the device plugin takes over here
pub const MAX_VERSION_ACCELERATORS: &str = "1.11.0";

/// Upgrades from this version on clamp an implicitly inherited PID limit
pub const MIN_VERSION_POD_PIDS_CLAMP: &str = "1.14.0";

/// Value that disables `--pod-max-pids`
pub const POD_MAX_PIDS_DISABLED: &str = "-1";

pub fn is_gpu_vm_size(vm_size: &str) -> bool {
    vm_size.contains(GPU_VM_SIZE_MARKER)
}

/// Inputs shared by every role in one resolution pass
#[derive(Debug, Clone)]
pub struct ResolutionPlan<'a> {
    ctx: &'a ClusterContext,
    statics: StaticOverrides,
    defaults: FlagMap,
}

impl<'a> ResolutionPlan<'a> {
    /// Build the statics and the defaults snapshot for `ctx`.
    ///
    /// The snapshot is the cluster-wide operator config with computed
    /// defaults filled in and the default feature gates added.
    pub fn new(ctx: &'a ClusterContext, catalog: &ComponentCatalog) -> Self {
        let mut defaults = ctx.kubelet_config.clone();
        fill_missing(&mut defaults, &build_defaults(ctx, catalog));
        add_default_gates(&mut defaults, ctx.version());

        Self {
            ctx,
            statics: StaticOverrides::for_context(ctx),
            defaults,
        }
    }

    pub fn defaults(&self) -> &FlagMap {
        &self.defaults
    }

    /// Resolve `role` in place. A role without flags starts from an empty map.
    pub fn resolve_role(&self, role: &mut Role, kind: RoleKind) {
        let version = self.ctx.version();
        let os = role.os_family;
        let gpu = kind == RoleKind::WorkerPool && is_gpu_vm_size(&role.vm_size);
        let flags = role.kubelet_config.get_or_insert_with(FlagMap::new);

        self.statics.apply(flags, os);
        fill_missing(flags, &self.defaults);
        add_default_gates(flags, version);

        if gpu && !self.ctx.gpu_device_plugin && !at_least(version, MAX_VERSION_ACCELERATORS) {
            add_gate(flags, version, MIN_VERSION_ACCELERATORS, ACCELERATORS);
        }

        if self.ctx.is_upgrade && at_least(version, MIN_VERSION_POD_PIDS_CLAMP) {
            clamp_pod_max_pids(flags, &role.name);
        }

        filter_flags(flags, version);
        debug!("Resolved {} kubelet flags for role '{}'", flags.len(), role.name);
    }
}

/// Disable a positive `--pod-max-pids` that lacks its enabling feature gate.
///
/// Once clamped the value is `-1`, so a later pass leaves it alone.
fn clamp_pod_max_pids(flags: &mut FlagMap, role: &str) {
    let pids = flags
        .get(POD_MAX_PIDS)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);
    if pids <= 0 || FeatureGateSet::from_flags(flags).contains(SUPPORT_POD_PIDS_LIMIT) {
        return;
    }
    info!(
        "Role '{}': disabling {}={} without {}",
        role, POD_MAX_PIDS, pids, SUPPORT_POD_PIDS_LIMIT
    );
    flags.set(POD_MAX_PIDS, POD_MAX_PIDS_DISABLED);
}

/// Resolve the control plane and every worker pool of `cluster` in place.
///
/// The component catalog is the built-in table extended with the
/// definition's own entries.
pub fn resolve_cluster(cluster: &mut ClusterDefinition) {
    let mut catalog = ComponentCatalog::builtin();
    catalog.extend(&cluster.components);
    resolve_cluster_with(cluster, &catalog);
}

/// [`resolve_cluster`] against an explicit component catalog.
pub fn resolve_cluster_with(cluster: &mut ClusterDefinition, catalog: &ComponentCatalog) {
    let plan = ResolutionPlan::new(&cluster.context, catalog);
    info!(
        "Resolving kubelet flags for {} (upgrade: {})",
        cluster.context.orchestrator_version, cluster.context.is_upgrade
    );

    if let Some(control_plane) = cluster.control_plane.as_mut() {
        plan.resolve_role(control_plane, RoleKind::ControlPlane);
    }
    for pool in cluster.worker_pools.iter_mut() {
        plan.resolve_role(pool, RoleKind::WorkerPool);
    }
}
