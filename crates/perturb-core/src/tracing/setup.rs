//! Global subscriber installation.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::DEFAULT_LOG_FILTER;

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install the perturb subscriber as the global default.
///
/// Per-module levels come from `PERTURB_LOG`, for example
/// `PERTURB_LOG=perturb_causal::model=debug,perturb_core=warn`. A missing or
/// unparseable value falls back to `perturb=info`.
///
/// Only the first call does any work. Returns `true` when the perturb
/// subscriber is the active one and `false` when the host process had
/// already installed its own.
pub fn init_tracing() -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_env("PERTURB_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        match tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(filter)
            .try_init()
        {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "global subscriber already set, keeping the existing one");
                false
            }
        }
    })
}
