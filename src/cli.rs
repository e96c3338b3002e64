use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kubeletconf")]
#[command(about = "Resolve kubelet command-line flags for every node role of a cluster")]
#[command(version)]
pub struct Args {
    /// Path to the cluster definition (YAML, JSON or JSONC)
    #[arg(required = true)]
    pub cluster_file: PathBuf,

    /// Enable verbose logging output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Treat this pass as an upgrade of an existing cluster
    #[arg(long)]
    pub upgrade: bool,

    /// Resolve against this orchestrator version instead of the file's
    #[arg(long = "target-version", value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Only print the role with this name
    #[arg(long, value_name = "NAME")]
    pub role: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Append a SHA256 fingerprint of each role's rendered flags
    #[arg(long)]
    pub fingerprint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// SBIO: Pure display logic (no I/O - returns formatted strings)
// ============================================================================

use crate::config::{ClusterDefinition, Role};
use crate::render::{fingerprint, render_flags};

#[derive(Debug, Serialize)]
struct RoleOutput<'a> {
    role: &'a str,
    flags: BTreeMap<&'a str, &'a str>,
    rendered: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

fn selected_roles<'a>(cluster: &'a ClusterDefinition, args: &'a Args) -> Vec<&'a Role> {
    cluster
        .roles()
        .filter(|r| args.role.as_deref().map_or(true, |name| r.name == name))
        .collect()
}

/// Format resolved roles for printing.
/// Pure function - returns a formatted string.
pub fn format_resolution(
    cluster: &ClusterDefinition,
    args: &Args,
) -> Result<String, serde_json::Error> {
    let roles = selected_roles(cluster, args);

    if args.format == OutputFormat::Json {
        let outputs: Vec<_> = roles
            .iter()
            .map(|role| {
                let flags = role.kubelet_config.clone().unwrap_or_default();
                RoleOutput {
                    role: &role.name,
                    flags: role
                        .kubelet_config
                        .as_ref()
                        .map(|f| f.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
                        .unwrap_or_default(),
                    rendered: render_flags(&flags),
                    fingerprint: args.fingerprint.then(|| fingerprint(&flags)),
                }
            })
            .collect();
        return serde_json::to_string_pretty(&outputs);
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Orchestrator version: {}{}\n",
        cluster.context.orchestrator_version,
        if cluster.context.is_upgrade {
            " (upgrade)"
        } else {
            ""
        }
    ));

    for role in roles {
        let flags = role.kubelet_config.clone().unwrap_or_default();
        output.push_str(&format!(
            "\n[{}] {:?} {}\n",
            role.name,
            role.os_family,
            if role.vm_size.is_empty() {
                "-"
            } else {
                role.vm_size.as_str()
            }
        ));
        output.push_str(&format!("  {}\n", render_flags(&flags)));
        if args.fingerprint {
            output.push_str(&format!("  sha256: {}\n", fingerprint(&flags)));
        }
    }

    Ok(output)
}
