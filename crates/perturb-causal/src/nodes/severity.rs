//! Severity policies and activation functions.
//!
//! A policy maps a render value in `[min_val, max_val]` to a severity in
//! `[0, 1]` and back. `increasing` and `decreasing` are exact inverses of
//! each other's render map; `centered` measures distance from a standard
//! value, so its inverse also needs a side.

use perturb_core::errors::NodeError;

/// How severity grows with the render value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionType {
    Increasing,
    Decreasing,
    Centered,
}

impl CorruptionType {
    pub fn parse(node: &str, value: &str) -> Result<Self, NodeError> {
        match value {
            "increasing" => Ok(Self::Increasing),
            "decreasing" => Ok(Self::Decreasing),
            "centered" => Ok(Self::Centered),
            other => Err(NodeError::invalid(
                node,
                "corruption_type",
                format!("\"{other}\" is not one of increasing, decreasing, centered"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Centered => "centered",
        }
    }
}

/// Squashes a weighted sum into a quantile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn parse(node: &str, value: &str) -> Result<Self, NodeError> {
        match value {
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            other => Err(NodeError::invalid(
                node,
                "activation_type",
                format!("\"{other}\" is not one of sigmoid, tanh"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
        }
    }

    /// Maps the real line onto `[0, 1]`.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => (x.tanh() + 1.0) / 2.0,
        }
    }
}

/// A policy bound to a node's render range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityPolicy {
    pub corruption_type: CorruptionType,
    pub min_val: f64,
    pub max_val: f64,
    /// Least-severe render value. Only consulted by `centered`.
    pub standard: f64,
}

impl SeverityPolicy {
    pub fn severity(&self, render: f64) -> f64 {
        let range = self.max_val - self.min_val;
        match self.corruption_type {
            CorruptionType::Increasing => (render - self.min_val) / range,
            CorruptionType::Decreasing => (self.max_val - render) / range,
            CorruptionType::Centered => (render - self.standard).abs() / self.max_distance(),
        }
    }

    /// Render value for `severity`. `upper_side` picks which side of the
    /// standard value a `centered` policy lands on; other policies ignore it.
    pub fn render(&self, severity: f64, upper_side: bool) -> f64 {
        let range = self.max_val - self.min_val;
        match self.corruption_type {
            CorruptionType::Increasing => self.min_val + severity * range,
            CorruptionType::Decreasing => self.min_val + (1.0 - severity) * range,
            CorruptionType::Centered => {
                let offset = severity * self.max_distance();
                if upper_side {
                    self.standard + offset
                } else {
                    self.standard - offset
                }
            }
        }
    }

    fn max_distance(&self) -> f64 {
        (self.max_val - self.standard)
            .abs()
            .max((self.min_val - self.standard).abs())
    }
}
