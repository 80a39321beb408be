//! Node samplers.
//!
//! The set of node kinds is closed: [`Node`] is a tagged union over the
//! concrete samplers, and [`CausalMechanism`] is the interface the model
//! drives them through.

pub mod beta;
pub mod constant;
mod fields;
pub mod severity;
pub mod weighted_sum;

use std::fmt;

use perturb_core::constants::{CONSTANT_NODE, WEIGHTED_SUM_NODE};
use perturb_core::errors::NodeError;
use serde_yaml::Mapping;

pub use constant::ConstantNode;
pub use severity::{Activation, CorruptionType, SeverityPolicy};
pub use weighted_sum::WeightedSumNode;

use crate::graph::{Intervention, NodeSpec};
use crate::output::{NodeOutput, SampleResult};
use crate::stream::RandomStream;

/// Node kind tag as written in a spec's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    WeightedSum,
    Constant,
}

impl NodeKind {
    pub fn parse(node: &str, tag: &str) -> Result<Self, NodeError> {
        match tag {
            WEIGHTED_SUM_NODE => Ok(Self::WeightedSum),
            CONSTANT_NODE => Ok(Self::Constant),
            other => Err(NodeError::UnknownKind {
                node: node.to_string(),
                kind: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedSum => WEIGHTED_SUM_NODE,
            Self::Constant => CONSTANT_NODE,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity shared by every node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHeader {
    pub name: String,
    pub parameter: String,
    pub corruption_func: Option<String>,
    pub defaults: Mapping,
    /// Parent node names in edge order. Never contains `root`.
    pub parents: Vec<String>,
}

impl NodeHeader {
    pub fn from_spec(spec: &NodeSpec, parents: Vec<String>) -> Result<Self, NodeError> {
        let parameter = spec
            .parameter
            .clone()
            .ok_or_else(|| NodeError::missing(&spec.name, "parameter"))?;
        Ok(Self {
            name: spec.name.clone(),
            parameter,
            corruption_func: spec.corruption_func.clone(),
            defaults: spec.defaults.clone(),
            parents,
        })
    }

    /// Persisted record with the header fields filled in.
    pub(crate) fn record(&self, kind: NodeKind) -> NodeSpec {
        let mut spec = NodeSpec::new(&self.name, kind.as_str()).parameter(&self.parameter);
        spec.corruption_func = self.corruption_func.clone();
        spec.defaults = self.defaults.clone();
        spec
    }
}

/// The interface every node kind implements.
pub trait CausalMechanism {
    fn header(&self) -> &NodeHeader;

    fn kind(&self) -> NodeKind;

    /// Draw `(render_value, severity)` given the outputs of this node's parents.
    fn sample(&self, parents: &SampleResult, stream: &mut RandomStream) -> Result<(f64, f64), NodeError>;

    fn severity_from_render(&self, render: f64) -> f64;

    /// Inverse of [`CausalMechanism::severity_from_render`]. May draw from the
    /// stream when the inverse is not unique.
    fn render_from_severity(&self, severity: f64, stream: &mut RandomStream) -> Result<f64, NodeError>;

    /// Record holding everything needed to rebuild this node without draws.
    fn to_persisted(&self) -> NodeSpec;

    /// Overwrite internal state from a persisted record.
    fn load(&mut self, record: &NodeSpec) -> Result<(), NodeError>;

    fn name(&self) -> &str {
        &self.header().name
    }

    fn causal_output(&self, parents: &SampleResult, stream: &mut RandomStream) -> Result<NodeOutput, NodeError> {
        let (render, severity) = self.sample(parents, stream)?;
        let header = self.header();
        Ok(NodeOutput::new(&header.parameter, render, severity, &header.defaults))
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Constant(ConstantNode),
    WeightedSum(WeightedSumNode),
}

impl Node {
    /// Build a fresh node from its spec, drawing construction randomness
    /// from `stream`.
    pub fn build(spec: &NodeSpec, parents: Vec<String>, stream: &mut RandomStream) -> Result<Self, NodeError> {
        match NodeKind::parse(&spec.name, &spec.kind)? {
            NodeKind::WeightedSum => WeightedSumNode::from_spec(spec, parents, stream).map(Self::WeightedSum),
            NodeKind::Constant => ConstantNode::from_spec(spec, parents).map(Self::Constant),
        }
    }

    /// Rebuild a node from a persisted record. Never draws.
    pub fn restore(record: &NodeSpec, parents: Vec<String>) -> Result<Self, NodeError> {
        match NodeKind::parse(&record.name, &record.kind)? {
            NodeKind::WeightedSum => WeightedSumNode::restore(record, parents).map(Self::WeightedSum),
            NodeKind::Constant => ConstantNode::from_spec(record, parents).map(Self::Constant),
        }
    }

    /// Replace this node with a constant pinned by `intervention`. A missing
    /// render value or severity is derived through this node's inverse.
    pub fn intervene(self, intervention: &Intervention, stream: &mut RandomStream) -> Result<Self, NodeError> {
        let (render, severity) = match (intervention.render_value, intervention.severity_value) {
            (Some(r), Some(s)) => (r, s),
            (None, Some(s)) => (self.render_from_severity(s, stream)?, s),
            (Some(r), None) => (r, self.severity_from_render(r)),
            (None, None) => {
                return Err(NodeError::EmptyIntervention {
                    node: self.name().to_string(),
                })
            }
        };
        ConstantNode::new(self.into_header(), render, severity).map(Self::Constant)
    }

    fn into_header(self) -> NodeHeader {
        match self {
            Self::Constant(n) => n.into_header(),
            Self::WeightedSum(n) => n.into_header(),
        }
    }

    fn inner(&self) -> &dyn CausalMechanism {
        match self {
            Self::Constant(n) => n,
            Self::WeightedSum(n) => n,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CausalMechanism {
        match self {
            Self::Constant(n) => n,
            Self::WeightedSum(n) => n,
        }
    }

    pub fn as_weighted_sum(&self) -> Option<&WeightedSumNode> {
        match self {
            Self::WeightedSum(n) => Some(n),
            Self::Constant(_) => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantNode> {
        match self {
            Self::Constant(n) => Some(n),
            Self::WeightedSum(_) => None,
        }
    }
}

impl CausalMechanism for Node {
    fn header(&self) -> &NodeHeader {
        self.inner().header()
    }

    fn kind(&self) -> NodeKind {
        self.inner().kind()
    }

    fn sample(&self, parents: &SampleResult, stream: &mut RandomStream) -> Result<(f64, f64), NodeError> {
        self.inner().sample(parents, stream)
    }

    fn severity_from_render(&self, render: f64) -> f64 {
        self.inner().severity_from_render(render)
    }

    fn render_from_severity(&self, severity: f64, stream: &mut RandomStream) -> Result<f64, NodeError> {
        self.inner().render_from_severity(severity, stream)
    }

    fn to_persisted(&self) -> NodeSpec {
        self.inner().to_persisted()
    }

    fn load(&mut self, record: &NodeSpec) -> Result<(), NodeError> {
        self.inner_mut().load(record)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        write!(
            f,
            "{} \"{}\" with parents [{}]",
            self.kind(),
            header.name,
            header.parents.join(", ")
        )
    }
}
