//! Declarative graph spec: the YAML document a causal model is built from,
//! and the shape it is persisted back to.

use std::path::Path;

use perturb_core::constants::CUSTOM_DAG;
use perturb_core::errors::PersistError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A full graph spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagSpec {
    pub dag_generation_method: String,
    #[serde(default)]
    pub node_list: Vec<NodeSpec>,
    #[serde(default)]
    pub edge_list: Vec<Edge>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub loadable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// The spec a persisted graph was first built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_configuration: Option<Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl DagSpec {
    /// An empty `CustomDAG` spec.
    pub fn custom() -> Self {
        Self {
            dag_generation_method: CUSTOM_DAG.to_string(),
            node_list: Vec::new(),
            edge_list: Vec::new(),
            loadable: false,
            seed: None,
            original_configuration: None,
        }
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.node_list.push(node);
        self
    }

    pub fn with_edge(mut self, parent: &str, child: &str) -> Self {
        self.edge_list.push(Edge::new(parent, child));
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, PersistError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, PersistError> {
        let content = std::fs::read_to_string(path).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> Result<String, PersistError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn node(&self, name: &str) -> Option<&NodeSpec> {
        self.node_list.iter().find(|n| n.name == name)
    }
}

/// One node record. Kind-specific parameters live in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corruption_func: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub defaults: Mapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervene: Option<Intervention>,
    #[serde(flatten)]
    pub fields: Mapping,
}

impl NodeSpec {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            corruption_func: None,
            parameter: None,
            defaults: Mapping::new(),
            intervene: None,
            fields: Mapping::new(),
        }
    }

    pub fn parameter(mut self, parameter: &str) -> Self {
        self.parameter = Some(parameter.to_string());
        self
    }

    pub fn corruption_func(mut self, func: &str) -> Self {
        self.corruption_func = Some(func.to_string());
        self
    }

    pub fn default_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(Value::from(key), value.into());
        self
    }

    /// Set a kind-specific field.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(Value::from(key), value.into());
        self
    }

    pub fn intervene(mut self, intervention: Intervention) -> Self {
        self.intervene = Some(intervention);
        self
    }
}

/// A directed `[parent, child]` pair. `parent` may be the `root` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub String, pub String);

impl Edge {
    pub fn new(parent: &str, child: &str) -> Self {
        Self(parent.to_string(), child.to_string())
    }

    pub fn parent(&self) -> &str {
        &self.0
    }

    pub fn child(&self) -> &str {
        &self.1
    }

    /// Parents of `child`, deduplicated, in edge order.
    pub fn parents_of<'a>(child: &str, edges: &'a [Edge]) -> Vec<&'a str> {
        let mut parents: Vec<&str> = Vec::new();
        for edge in edges.iter().filter(|e| e.child() == child) {
            if !parents.contains(&edge.parent()) {
                parents.push(edge.parent());
            }
        }
        parents
    }
}

/// Pins a node to a fixed render value and/or severity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_value: Option<f64>,
}

impl Intervention {
    pub fn severity(value: f64) -> Self {
        Self {
            severity_value: Some(value),
            render_value: None,
        }
    }

    pub fn render(value: f64) -> Self {
        Self {
            severity_value: None,
            render_value: Some(value),
        }
    }

    pub fn both(render_value: f64, severity_value: f64) -> Self {
        Self {
            severity_value: Some(severity_value),
            render_value: Some(render_value),
        }
    }
}
