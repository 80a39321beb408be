//! Deterministic node: always yields the same render value and severity.

use perturb_core::errors::NodeError;
use serde_yaml::Value;

use super::fields::required_f64;
use super::{CausalMechanism, NodeHeader, NodeKind};
use crate::graph::NodeSpec;
use crate::output::SampleResult;
use crate::stream::RandomStream;

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    header: NodeHeader,
    render_value: f64,
    severity_value: f64,
}

impl ConstantNode {
    pub fn new(header: NodeHeader, render_value: f64, severity_value: f64) -> Result<Self, NodeError> {
        check_severity(&header.name, severity_value)?;
        Ok(Self {
            header,
            render_value,
            severity_value,
        })
    }

    /// Build from a spec carrying `render_value` and `severity_value`.
    pub fn from_spec(spec: &NodeSpec, parents: Vec<String>) -> Result<Self, NodeError> {
        let header = NodeHeader::from_spec(spec, parents)?;
        let render_value = required_f64(&spec.fields, &header.name, "render_value")?;
        let severity_value = required_f64(&spec.fields, &header.name, "severity_value")?;
        Self::new(header, render_value, severity_value)
    }

    pub fn render_value(&self) -> f64 {
        self.render_value
    }

    pub fn severity_value(&self) -> f64 {
        self.severity_value
    }

    pub(crate) fn into_header(self) -> NodeHeader {
        self.header
    }
}

fn check_severity(node: &str, value: f64) -> Result<(), NodeError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NodeError::SeverityOutOfRange {
            node: node.to_string(),
            value,
        });
    }
    Ok(())
}

impl CausalMechanism for ConstantNode {
    fn header(&self) -> &NodeHeader {
        &self.header
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Constant
    }

    fn sample(&self, _parents: &SampleResult, _stream: &mut RandomStream) -> Result<(f64, f64), NodeError> {
        Ok((self.render_value, self.severity_value))
    }

    fn severity_from_render(&self, _render: f64) -> f64 {
        self.severity_value
    }

    fn render_from_severity(&self, _severity: f64, _stream: &mut RandomStream) -> Result<f64, NodeError> {
        Ok(self.render_value)
    }

    fn to_persisted(&self) -> NodeSpec {
        self.header
            .record(self.kind())
            .field("render_value", Value::from(self.render_value))
            .field("severity_value", Value::from(self.severity_value))
    }

    fn load(&mut self, record: &NodeSpec) -> Result<(), NodeError> {
        let render_value = required_f64(&record.fields, &self.header.name, "render_value")?;
        let severity_value = required_f64(&record.fields, &self.header.name, "severity_value")?;
        check_severity(&self.header.name, severity_value)?;
        self.render_value = render_value;
        self.severity_value = severity_value;
        Ok(())
    }
}
