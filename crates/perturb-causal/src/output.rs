//! Sample outputs: one mapping per node, collected in sampling order.

use std::collections::HashMap;

use indexmap::IndexMap;
use perturb_core::constants::{SAMPLED_KEY, SEVERITY_KEY};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// What a node contributes to a sample:
/// `{<parameter>: render, severity: s, sampled: <parameter>, ...defaults}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeOutput(Mapping);

impl NodeOutput {
    pub fn new(parameter: &str, render_value: f64, severity: f64, defaults: &Mapping) -> Self {
        let mut map = Mapping::new();
        map.insert(Value::from(parameter), Value::from(render_value));
        map.insert(Value::from(SEVERITY_KEY), Value::from(severity));
        map.insert(Value::from(SAMPLED_KEY), Value::from(parameter));
        for (k, v) in defaults {
            map.insert(k.clone(), v.clone());
        }
        Self(map)
    }

    pub fn severity(&self) -> Option<f64> {
        self.0.get(SEVERITY_KEY).and_then(Value::as_f64)
    }

    /// Name of the parameter this node sampled.
    pub fn sampled_parameter(&self) -> Option<&str> {
        self.0.get(SAMPLED_KEY).and_then(Value::as_str)
    }

    pub fn render_value(&self) -> Option<f64> {
        self.sampled_parameter()
            .and_then(|p| self.0.get(p))
            .and_then(Value::as_f64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrite or add entries.
    pub fn apply(&mut self, overrides: &Mapping) {
        for (k, v) in overrides {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }
}

/// Node outputs keyed by node name, in the order nodes were sampled.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SampleResult(IndexMap<String, NodeOutput>);

impl SampleResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the output for `name`. Replacing keeps the position.
    pub fn insert(&mut self, name: impl Into<String>, output: NodeOutput) {
        self.0.insert(name.into(), output);
    }

    pub fn get(&self, name: &str) -> Option<&NodeOutput> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NodeOutput> {
        self.0.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeOutput)> {
        self.0.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Equal only when the same outputs appear in the same order.
impl PartialEq for SampleResult {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

/// Per-node entries written over a sample after every node has been drawn.
/// Overrides are applied in sampling order, so children see overridden parents.
#[derive(Debug, Clone, Default)]
pub struct SampleOverrides {
    entries: HashMap<String, Mapping>,
}

impl SampleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` in the output of `node`.
    pub fn set(mut self, node: &str, key: &str, value: impl Into<Value>) -> Self {
        self.entries
            .entry(node.to_string())
            .or_default()
            .insert(Value::from(key), value.into());
        self
    }

    pub fn for_node(&self, node: &str) -> Option<&Mapping> {
        self.entries.get(node)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of overridden nodes, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl From<HashMap<String, Mapping>> for SampleOverrides {
    fn from(entries: HashMap<String, Mapping>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_output_layout() {
        let mut defaults = Mapping::new();
        defaults.insert(Value::from("blur_type"), Value::from("gaussian"));
        let out = NodeOutput::new("sigma", 2.5, 0.4, &defaults);
        let keys: Vec<&str> = out.as_mapping().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["sigma", "severity", "sampled", "blur_type"]);
        assert_eq!(out.render_value(), Some(2.5));
        assert_eq!(out.severity(), Some(0.4));
        assert_eq!(out.sampled_parameter(), Some("sigma"));
    }

    #[test]
    fn apply_overwrites_in_place() {
        let mut out = NodeOutput::new("p", 1.0, 0.1, &Mapping::new());
        let mut over = Mapping::new();
        over.insert(Value::from("severity"), Value::from(0.9));
        over.insert(Value::from("extra"), Value::from(true));
        out.apply(&over);
        assert_eq!(out.severity(), Some(0.9));
        assert_eq!(out.get("extra"), Some(&Value::from(true)));
    }

    #[test]
    fn sample_result_keeps_insertion_order() {
        let mut result = SampleResult::new();
        result.insert("B", NodeOutput::new("b", 0.0, 0.0, &Mapping::new()));
        result.insert("A", NodeOutput::new("a", 0.0, 0.0, &Mapping::new()));
        result.insert("B", NodeOutput::new("b", 1.0, 1.0, &Mapping::new()));
        assert_eq!(result.names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(result.get("B").and_then(NodeOutput::severity), Some(1.0));
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut result = SampleResult::new();
        result.insert("Z", NodeOutput::new("z", 1.0, 0.5, &Mapping::new()));
        result.insert("A", NodeOutput::new("a", 2.0, 0.25, &Mapping::new()));
        let json = result.to_json_string().unwrap();
        assert!(json.find("\"Z\"").unwrap() < json.find("\"A\"").unwrap());
        assert!(json.contains("\"severity\":0.5"));
    }

    #[test]
    fn equality_depends_on_order() {
        let a = NodeOutput::new("a", 1.0, 0.1, &Mapping::new());
        let b = NodeOutput::new("b", 2.0, 0.2, &Mapping::new());
        let mut first = SampleResult::new();
        first.insert("A", a.clone());
        first.insert("B", b.clone());
        let mut same = SampleResult::new();
        same.insert("A", a.clone());
        same.insert("B", b.clone());
        let mut swapped = SampleResult::new();
        swapped.insert("B", b);
        swapped.insert("A", a);
        assert_eq!(first, same);
        assert_ne!(first, swapped);
    }
}
