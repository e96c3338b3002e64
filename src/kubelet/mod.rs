//! # Kubelet flag resolution
//!
//! Four layers decide a role's final kubelet flags, strongest first:
//!
//! 1. **Static overrides** per OS family, never operator-configurable
//! 2. **Role config** set by the operator on the control plane or a pool
//! 3. **Cluster config** set by the operator for every role
//! 4. **Computed defaults** derived from the cluster context
//!
//! Version gates then add feature gates and remove flags the target
//! orchestrator version does not accept.

pub mod defaults;
pub mod feature_gates;
pub mod filter;
pub mod flags;
pub mod merge;
pub mod resolver;
pub mod statics;

pub use defaults::build_defaults;
pub use feature_gates::{add_default_gates, add_gate, FeatureGateSet};
pub use filter::filter_flags;
pub use flags::FlagMap;
pub use merge::fill_missing;
pub use resolver::{is_gpu_vm_size, resolve_cluster, resolve_cluster_with, ResolutionPlan};
pub use statics::StaticOverrides;
