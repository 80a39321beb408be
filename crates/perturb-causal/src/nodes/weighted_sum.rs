//! Stochastic node: a noisy weighted sum of parent severities, squashed to a
//! quantile and pushed through a Beta quantile function onto
//! `[min_val, max_val]`.

use perturb_core::errors::{DistributionError, NodeError};
use serde_yaml::{Mapping, Value};

use super::beta::BetaShape;
use super::fields::{describe, optional_f64, required_f64, required_positive, required_str};
use super::severity::{Activation, CorruptionType, SeverityPolicy};
use super::{CausalMechanism, NodeHeader, NodeKind};
use crate::distributions::{Categorical, LogProbSampler, Normal, Uniform};
use crate::graph::NodeSpec;
use crate::output::SampleResult;
use crate::stream::RandomStream;

/// Shape parameters shared by fresh and restored nodes.
#[derive(Debug, Clone)]
struct Shape {
    policy: SeverityPolicy,
    extreme: f64,
    beta: BetaShape,
    std: f64,
    activation: Activation,
}

impl Shape {
    fn parse(node: &str, fields: &Mapping) -> Result<Self, NodeError> {
        let min_val = required_f64(fields, node, "min_val")?;
        let max_val = required_f64(fields, node, "max_val")?;
        if min_val >= max_val {
            return Err(NodeError::invalid(
                node,
                "max_val",
                format!("min_val ({min_val}) must be less than max_val ({max_val})"),
            ));
        }
        let corruption_type = CorruptionType::parse(node, required_str(fields, node, "corruption_type")?)?;

        let standard = match (optional_f64(fields, node, "standard")?, corruption_type) {
            (Some(v), _) => v,
            (None, CorruptionType::Increasing) => min_val,
            (None, CorruptionType::Decreasing) => max_val,
            (None, CorruptionType::Centered) => return Err(NodeError::missing(node, "standard")),
        };
        let extreme = match optional_f64(fields, node, "extreme")? {
            Some(v) => v,
            None => match corruption_type {
                CorruptionType::Increasing => max_val,
                CorruptionType::Decreasing => min_val,
                CorruptionType::Centered if max_val - standard >= standard - min_val => max_val,
                CorruptionType::Centered => min_val,
            },
        };

        let beta_a = required_positive(fields, node, "beta_a")?;
        let beta_b = required_positive(fields, node, "beta_b")?;
        let beta = BetaShape::new(beta_a, beta_b).map_err(|e| NodeError::invalid(node, "beta_a", e.to_string()))?;
        let std = required_positive(fields, node, "std")?;
        let activation = Activation::parse(node, required_str(fields, node, "activation_type")?)?;

        Ok(Self {
            policy: SeverityPolicy {
                corruption_type,
                min_val,
                max_val,
                standard,
            },
            extreme,
            beta,
            std,
            activation,
        })
    }
}

/// How a fresh node gets its bias.
enum BiasRequest {
    Fixed(f64),
    Random,
    Zero,
}

impl BiasRequest {
    fn parse(node: &str, fields: &Mapping) -> Result<Self, NodeError> {
        match fields.get("bias") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Self::Zero),
            Some(Value::Bool(true)) => Ok(Self::Random),
            Some(Value::String(s)) if s == "random" => Ok(Self::Random),
            Some(v) => match v.as_f64() {
                Some(x) if x.is_finite() => Ok(Self::Fixed(x)),
                _ => Err(NodeError::invalid(
                    node,
                    "bias",
                    format!("expected a number, true, or \"random\", got {}", describe(v)),
                )),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightedSumNode {
    header: NodeHeader,
    shape: Shape,
    bias: f64,
    edge_weights: Vec<(String, f64)>,
}

fn numeric(node: &str) -> impl Fn(DistributionError) -> NodeError + '_ {
    move |e| NodeError::Numeric {
        node: node.to_string(),
        message: e.to_string(),
    }
}

impl WeightedSumNode {
    /// Build a fresh node. Draws the bias (when requested) and then one edge
    /// weight per parent, in parent order.
    pub fn from_spec(spec: &NodeSpec, parents: Vec<String>, stream: &mut RandomStream) -> Result<Self, NodeError> {
        let header = NodeHeader::from_spec(spec, parents)?;
        let shape = Shape::parse(&header.name, &spec.fields)?;

        let bias = match BiasRequest::parse(&header.name, &spec.fields)? {
            BiasRequest::Fixed(v) => v,
            BiasRequest::Random => Normal::standard().sample(stream).value,
            BiasRequest::Zero => 0.0,
        };

        let weights = Uniform::new(-1.0, 1.0).map_err(numeric(&header.name))?;
        let edge_weights = header
            .parents
            .iter()
            .map(|p| (p.clone(), weights.sample(stream).value))
            .collect();

        Ok(Self {
            header,
            shape,
            bias,
            edge_weights,
        })
    }

    /// Rebuild a node from a persisted record without touching any stream.
    pub fn restore(record: &NodeSpec, parents: Vec<String>) -> Result<Self, NodeError> {
        let header = NodeHeader::from_spec(record, parents)?;
        let shape = Shape::parse(&header.name, &record.fields)?;
        let mut node = Self {
            header,
            shape,
            bias: 0.0,
            edge_weights: Vec::new(),
        };
        node.load(record)?;
        Ok(node)
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Edge weights in parent order.
    pub fn edge_weights(&self) -> &[(String, f64)] {
        &self.edge_weights
    }

    pub fn corruption_type(&self) -> CorruptionType {
        self.shape.policy.corruption_type
    }

    pub fn policy(&self) -> &SeverityPolicy {
        &self.shape.policy
    }

    pub(crate) fn into_header(self) -> NodeHeader {
        self.header
    }

    fn parse_edge_weights(&self, record: &NodeSpec) -> Result<Vec<(String, f64)>, NodeError> {
        let node = self.header.name.as_str();
        let map = match record.fields.get("edge_weights") {
            None | Some(Value::Null) if self.header.parents.is_empty() => return Ok(Vec::new()),
            None | Some(Value::Null) => return Err(NodeError::missing(node, "edge_weights")),
            Some(Value::Mapping(m)) => m,
            Some(v) => {
                return Err(NodeError::invalid(
                    node,
                    "edge_weights",
                    format!("expected a mapping, got {}", describe(v)),
                ))
            }
        };

        for key in map.keys() {
            let known = key.as_str().is_some_and(|k| self.header.parents.iter().any(|p| p == k));
            if !known {
                return Err(NodeError::invalid(
                    node,
                    "edge_weights",
                    format!("{} is not a parent of this node", describe(key)),
                ));
            }
        }

        self.header
            .parents
            .iter()
            .map(|p| {
                let field = format!("edge_weights.{p}");
                match map.get(p.as_str()) {
                    None => Err(NodeError::missing(node, &field)),
                    Some(v) => v
                        .as_f64()
                        .filter(|w| w.is_finite())
                        .map(|w| (p.clone(), w))
                        .ok_or_else(|| NodeError::invalid(node, &field, format!("expected a number, got {}", describe(v)))),
                }
            })
            .collect()
    }
}

impl CausalMechanism for WeightedSumNode {
    fn header(&self) -> &NodeHeader {
        &self.header
    }

    fn kind(&self) -> NodeKind {
        NodeKind::WeightedSum
    }

    fn sample(&self, parents: &SampleResult, stream: &mut RandomStream) -> Result<(f64, f64), NodeError> {
        let node = self.header.name.as_str();

        let mut total = 0.0;
        for (parent, weight) in &self.edge_weights {
            let output = parents.get(parent).ok_or_else(|| NodeError::MissingParentSample {
                node: node.to_string(),
                parent: parent.clone(),
            })?;
            let severity = output.severity().ok_or_else(|| NodeError::Numeric {
                node: node.to_string(),
                message: format!("parent \"{parent}\" has no numeric severity"),
            })?;
            total += weight * severity;
        }

        let noise = Normal::new(self.bias, self.shape.std).map_err(numeric(node))?;
        total += noise.sample(stream).value;

        let quantile = self.shape.activation.apply(total);
        if !quantile.is_finite() {
            return Err(NodeError::Numeric {
                node: node.to_string(),
                message: format!("activation produced non-finite quantile from {total}"),
            });
        }
        let x = self.shape.beta.quantile(quantile).map_err(numeric(node))?;

        let policy = &self.shape.policy;
        let render = policy.min_val + x * (policy.max_val - policy.min_val);
        Ok((render, policy.severity(render)))
    }

    fn severity_from_render(&self, render: f64) -> f64 {
        self.shape.policy.severity(render)
    }

    fn render_from_severity(&self, severity: f64, stream: &mut RandomStream) -> Result<f64, NodeError> {
        let upper_side = match self.shape.policy.corruption_type {
            CorruptionType::Centered => {
                let side = Categorical::uniform(2).map_err(numeric(&self.header.name))?;
                side.sample(stream).value * 2.0 - 1.0 > 0.0
            }
            _ => true,
        };
        Ok(self.shape.policy.render(severity, upper_side))
    }

    fn to_persisted(&self) -> NodeSpec {
        let policy = &self.shape.policy;
        let (beta_a, beta_b) = self.shape.beta.params();
        let mut weights = Mapping::new();
        for (parent, w) in &self.edge_weights {
            weights.insert(Value::from(parent.as_str()), Value::from(*w));
        }
        self.header
            .record(self.kind())
            .field("min_val", policy.min_val)
            .field("max_val", policy.max_val)
            .field("extreme", self.shape.extreme)
            .field("standard", policy.standard)
            .field("beta_a", beta_a)
            .field("beta_b", beta_b)
            .field("corruption_type", policy.corruption_type.as_str())
            .field("std", self.shape.std)
            .field("activation_type", self.shape.activation.as_str())
            .field("bias", self.bias)
            .field("edge_weights", Value::Mapping(weights))
    }

    fn load(&mut self, record: &NodeSpec) -> Result<(), NodeError> {
        let shape = Shape::parse(&self.header.name, &record.fields)?;
        let bias = required_f64(&record.fields, &self.header.name, "bias")?;
        let edge_weights = self.parse_edge_weights(record)?;
        self.shape = shape;
        self.bias = bias;
        self.edge_weights = edge_weights;
        Ok(())
    }
}
