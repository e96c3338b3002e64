pub mod cli;
pub mod config;
pub mod kubelet;
pub mod render;
pub mod version;

pub use config::{load_cluster_file, ClusterContext, ClusterDefinition, Role};
pub use kubelet::{resolve_cluster, FlagMap};
pub use render::{fingerprint, render_flags};
pub use version::{at_least, OrchestratorVersion, VersionError};
