use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use kubeletconf::cli::{format_resolution, Args};
use kubeletconf::config::load_cluster_file;
use kubeletconf::kubelet::resolve_cluster;
use kubeletconf::OrchestratorVersion;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut cluster = load_cluster_file(&args.cluster_file).with_context(|| {
        format!(
            "Failed to load cluster definition {}",
            args.cluster_file.display()
        )
    })?;

    if let Some(ref version) = args.target_version {
        info!(
            "Overriding orchestrator version {} with {}",
            cluster.context.orchestrator_version, version
        );
        cluster.context.orchestrator_version = OrchestratorVersion::new(version.as_str());
    }
    if args.upgrade {
        cluster.context.is_upgrade = true;
    }

    if let Some(ref name) = args.role {
        if cluster.find_role(name).is_none() {
            bail!("Role '{}' is not defined in the cluster definition", name);
        }
    }

    debug!("Loaded {} roles", cluster.roles().count());
    resolve_cluster(&mut cluster);

    let output = format_resolution(&cluster, &args).context("Failed to format output")?;
    println!("{}", output);
    Ok(())
}
