//! Topological sampling.

use perturb_core::errors::{PerturbErrorCode, PerturbResult};
use tracing::{debug, warn};

use super::{CausalModel, ModelState};
use crate::nodes::CausalMechanism;
use crate::output::{SampleOverrides, SampleResult};

impl CausalModel {
    /// Draw one sample of every node.
    pub fn sample(&mut self) -> PerturbResult<SampleResult> {
        self.sample_with(&SampleOverrides::new())
    }

    /// Draw one sample, then write `overrides` over each named node's output
    /// right after that node draws. The stream advances exactly as in an
    /// unmodified draw; children see the overridden values.
    pub fn sample_with(&mut self, overrides: &SampleOverrides) -> PerturbResult<SampleResult> {
        for name in overrides.nodes() {
            if !self.index.contains_key(name) {
                warn!(node = name, "override names a node that is not in the graph");
            }
        }

        let mut result = SampleResult::new();
        for node in &self.nodes {
            let mut output = node.causal_output(&result, &mut self.stream).inspect_err(|e| {
                warn!(node = node.name(), error_code = e.error_code(), error = %e, "sampling failed");
            })?;
            if let Some(entries) = overrides.for_node(node.name()) {
                output.apply(entries);
            }
            result.insert(node.name(), output);
        }

        self.samples_drawn += 1;
        self.state = ModelState::Sampled;
        debug!(draw = self.samples_drawn, nodes = result.len(), "sample drawn");
        Ok(result)
    }
}
