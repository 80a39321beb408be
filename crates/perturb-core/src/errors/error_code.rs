//! Stable error codes attached to structured log events.

/// Every error enum implements this to expose a machine-readable code.
pub trait PerturbErrorCode {
    /// Returns the error code string (e.g., "GRAPH_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";
pub const NODE_ERROR: &str = "NODE_ERROR";
pub const NUMERIC_ERROR: &str = "NUMERIC_ERROR";
pub const REGISTRY_MISS: &str = "REGISTRY_MISS";
pub const PERSIST_ERROR: &str = "PERSIST_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const INDEX_OUT_OF_RANGE: &str = "INDEX_OUT_OF_RANGE";
