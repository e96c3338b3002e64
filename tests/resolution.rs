//! Integration tests for end-to-end kubelet flag resolution
//!
//! Each test builds a cluster definition, resolves it through the public
//! API and inspects the finalized flags of its roles.

use kubeletconf::config::{
    ClusterContext, ClusterDefinition, ComponentCatalog, NetworkPlugin, OsFamily, Role,
};
use kubeletconf::kubelet::resolve_cluster;
use kubeletconf::{render_flags, FlagMap};

fn cluster(ctx: ClusterContext, pools: Vec<Role>) -> ClusterDefinition {
    ClusterDefinition {
        context: ctx,
        control_plane: Some(Role::new("master", OsFamily::Linux)),
        worker_pools: pools,
        components: ComponentCatalog::default(),
    }
}

fn flags<'a>(cluster: &'a ClusterDefinition, role: &str) -> &'a FlagMap {
    cluster
        .find_role(role)
        .and_then(|r| r.kubelet_config.as_ref())
        .expect("role resolved")
}

#[test]
fn test_vnet_integrated_max_pods() {
    let mut ctx = ClusterContext::new("1.9.0");
    ctx.network_plugin = NetworkPlugin::Azure;
    let mut c = cluster(ctx, vec![Role::new("pool", OsFamily::Linux)]);
    resolve_cluster(&mut c);

    assert_eq!(flags(&c, "pool").get("--max-pods"), Some("30"));
    assert_eq!(flags(&c, "master").get("--max-pods"), Some("30"));
}

#[test]
fn test_windows_pool_drops_linux_only_paths() {
    let mut c = cluster(
        ClusterContext::new("1.14.0"),
        vec![Role::new("winpool", OsFamily::Windows)],
    );
    resolve_cluster(&mut c);

    let win = flags(&c, "winpool");
    assert!(!win.contains("--pod-manifest-path"));
    assert!(!win.contains("--tls-cert-file"));
    assert!(!win.contains("--tls-private-key-file"));
    assert_eq!(win.get("--kubeconfig"), Some("c:\\k\\config"));
    assert_eq!(win.get("--pod-infra-container-image"), Some("kubletwin/pause"));
    assert_eq!(win.get("--eviction-hard"), Some("\"\"\"\""));

    let master = flags(&c, "master");
    assert_eq!(
        master.get("--pod-manifest-path"),
        Some("/etc/kubernetes/manifests")
    );
}

#[test]
fn test_insecure_kubelet_drops_auth_flags_everywhere() {
    let mut ctx = ClusterContext::new("1.14.0");
    ctx.secure_kubelet = false;
    let mut c = cluster(
        ctx,
        vec![
            Role::new("linuxpool", OsFamily::Linux),
            Role::new("winpool", OsFamily::Windows),
        ],
    );
    resolve_cluster(&mut c);

    for role in ["master", "linuxpool", "winpool"] {
        let f = flags(&c, role);
        assert!(!f.contains("--anonymous-auth"), "{}", role);
        assert!(!f.contains("--client-ca-file"), "{}", role);
    }
}

#[test]
fn test_upgrade_clamps_pod_max_pids() {
    let mut ctx = ClusterContext::new("1.14.0");
    ctx.is_upgrade = true;
    let existing: FlagMap = [("--pod-max-pids", "100"), ("--feature-gates", "PodPriority=true")]
        .into_iter()
        .collect();
    let mut c = cluster(
        ctx,
        vec![Role::new("pool", OsFamily::Linux).with_kubelet_config(existing)],
    );
    resolve_cluster(&mut c);

    assert_eq!(flags(&c, "pool").get("--pod-max-pids"), Some("-1"));
    assert_eq!(flags(&c, "master").get("--pod-max-pids"), Some("-1"));
}

#[test]
fn test_upgrade_before_clamp_version_keeps_limit() {
    let mut ctx = ClusterContext::new("1.13.5");
    ctx.is_upgrade = true;
    let mut c = cluster(ctx, vec![Role::new("pool", OsFamily::Linux)]);
    resolve_cluster(&mut c);
    assert_eq!(flags(&c, "pool").get("--pod-max-pids"), Some("100"));
}

#[test]
fn test_gpu_pool_accelerator_gate() {
    let gpu_pool = || Role::new("gpu", OsFamily::Linux).with_vm_size("Standard_NC6");

    let mut c = cluster(ClusterContext::new("1.9.0"), vec![gpu_pool()]);
    resolve_cluster(&mut c);
    let gates = flags(&c, "gpu").get("--feature-gates").unwrap_or("");
    assert!(gates.contains("Accelerators=true"), "{}", gates);

    let mut c = cluster(ClusterContext::new("1.11.0"), vec![gpu_pool()]);
    resolve_cluster(&mut c);
    let gates = flags(&c, "gpu").get("--feature-gates").unwrap_or("");
    assert!(!gates.contains("Accelerators=true"), "{}", gates);
}

#[test]
fn test_operator_values_versus_defaults_and_statics() {
    let existing: FlagMap = [
        ("--max-pods", "42"),
        ("--address", "127.0.0.1"),
        ("--cluster-domain", "corp.local"),
    ]
    .into_iter()
    .collect();
    let mut c = cluster(
        ClusterContext::new("1.12.8"),
        vec![Role::new("pool", OsFamily::Linux).with_kubelet_config(existing)],
    );
    resolve_cluster(&mut c);

    let pool = flags(&c, "pool");
    assert_eq!(pool.get("--max-pods"), Some("42"));
    assert_eq!(pool.get("--cluster-domain"), Some("corp.local"));
    assert_eq!(pool.get("--address"), Some("0.0.0.0"));
}

#[test]
fn test_pod_priority_once_after_two_passes() {
    let mut c = cluster(
        ClusterContext::new("1.12.8"),
        vec![Role::new("pool", OsFamily::Windows)],
    );
    resolve_cluster(&mut c);
    resolve_cluster(&mut c);

    for role in ["master", "pool"] {
        let gates = flags(&c, role).get("--feature-gates").unwrap_or("");
        assert_eq!(gates.matches("PodPriority=true").count(), 1, "{}", gates);
    }
}

#[test]
fn test_second_pass_is_identical() {
    let mut ctx = ClusterContext::new("1.14.0");
    ctx.is_upgrade = true;
    ctx.kubelet_config.set("--feature-gates", "CustomGate=true");
    let mut c = cluster(
        ctx,
        vec![
            Role::new("gpu", OsFamily::Linux).with_vm_size("Standard_NC6"),
            Role::new("win", OsFamily::Windows),
        ],
    );
    resolve_cluster(&mut c);
    let first = c.clone();
    resolve_cluster(&mut c);
    assert_eq!(c, first);
}

#[test]
fn test_external_cloud_provider() {
    let mut ctx = ClusterContext::new("1.14.0");
    ctx.cloud_provider = kubeletconf::config::CloudProviderMode::External;
    ctx.kubelet_config.set("--cloud-provider", "azure");
    let mut c = cluster(ctx, vec![Role::new("pool", OsFamily::Linux)]);
    resolve_cluster(&mut c);
    assert_eq!(flags(&c, "pool").get("--cloud-provider"), Some("external"));
}

#[test]
fn test_rendered_output_stable() {
    let mut a = cluster(
        ClusterContext::new("1.14.0"),
        vec![Role::new("pool", OsFamily::Linux)],
    );
    let mut b = a.clone();
    resolve_cluster(&mut a);
    resolve_cluster(&mut b);

    let rendered = render_flags(flags(&a, "pool"));
    assert_eq!(rendered, render_flags(flags(&b, "pool")));
    assert!(rendered.starts_with("--address=0.0.0.0 "));
}

#[test]
fn test_unparsable_version_fails_closed() {
    let mut ctx = ClusterContext::new("latest");
    ctx.is_upgrade = true;
    let mut c = cluster(
        ctx,
        vec![
            Role::new("gpu", OsFamily::Linux).with_vm_size("Standard_NC6"),
            Role::new("win", OsFamily::Windows),
        ],
    );
    resolve_cluster(&mut c);

    for role in ["master", "gpu", "win"] {
        let f = flags(&c, role);
        assert!(!f.contains("--pod-max-pids"), "{}", role);
        assert!(!f.contains("--feature-gates"), "{}", role);
        assert!(!f.contains("--rotate-certificates"), "{}", role);
        assert_eq!(f.get("--cadvisor-port"), Some("0"), "{}", role);
        assert!(f.iter().all(|(_, v)| !v.is_empty()), "{}", role);
    }
    assert_eq!(flags(&c, "gpu").get("--allow-privileged"), Some("true"));
}

#[test]
fn test_operator_gates_kept_as_written() {
    let existing: FlagMap = [("--feature-gates", "CustomGate=true,CustomGate=false,PodPriority=false")]
        .into_iter()
        .collect();
    let mut c = cluster(
        ClusterContext::new("1.12.8"),
        vec![Role::new("pool", OsFamily::Linux).with_kubelet_config(existing)],
    );
    resolve_cluster(&mut c);

    assert_eq!(
        flags(&c, "pool").get("--feature-gates"),
        Some(
            "CustomGate=true,CustomGate=false,PodPriority=false,\
PodPriority=true,RotateKubeletServerCertificate=true"
        )
    );
}
