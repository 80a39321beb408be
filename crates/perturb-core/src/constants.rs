//! Shared constants for the perturb sampler.

/// Sentinel parent name marking graph entry points. Never materialized as a node.
pub const ROOT: &str = "root";

/// Generation method that selects every node and edge of a spec verbatim.
pub const CUSTOM_DAG: &str = "CustomDAG";

/// Kind tag of the weighted-sum stochastic node.
pub const WEIGHTED_SUM_NODE: &str = "WeightedSumNode";

/// Kind tag of the deterministic override node.
pub const CONSTANT_NODE: &str = "ConstantNode";

/// Output key holding a node's severity.
pub const SEVERITY_KEY: &str = "severity";

/// Output key naming the parameter a node sampled.
pub const SAMPLED_KEY: &str = "sampled";

/// Upper bound (exclusive) for seeds drawn when none is supplied.
pub const MAX_GENERATED_SEED: u64 = 1_000_000;

/// Default extension for persisted graphs.
pub const DEFAULT_PERSIST_EXTENSION: &str = "yaml";

/// Default environment filter when `PERTURB_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "perturb=info";
