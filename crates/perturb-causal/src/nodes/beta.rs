//! Beta quantile function via `statrs`.

use perturb_core::errors::DistributionError;
use statrs::distribution::{Beta, ContinuousCDF};

/// The shape of a node's render distribution on `[0, 1]`.
#[derive(Debug, Clone)]
pub struct BetaShape {
    a: f64,
    b: f64,
    dist: Beta,
}

impl BetaShape {
    pub fn new(a: f64, b: f64) -> Result<Self, DistributionError> {
        if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
            return Err(DistributionError::InvalidParameters {
                distribution: "Beta",
                message: format!("shape parameters must be positive and finite, got ({a}, {b})"),
            });
        }
        let dist = Beta::new(a, b).map_err(|e| DistributionError::InvalidParameters {
            distribution: "Beta",
            message: e.to_string(),
        })?;
        Ok(Self { a, b, dist })
    }

    pub fn params(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Regularized incomplete beta `I_x(a, b)`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.dist.cdf(x.clamp(0.0, 1.0))
    }

    /// Inverse of [`BetaShape::cdf`]: the `x` with `I_x(a, b) = p`.
    ///
    /// `p` must lie in `[0, 1]`; the endpoints map to `0` and `1`.
    pub fn quantile(&self, p: f64) -> Result<f64, DistributionError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DistributionError::OutOfDomain {
                distribution: "Beta",
                value: p,
                domain: "[0, 1]",
            });
        }
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(1.0);
        }

        let x = self.dist.inverse_cdf(p);
        if !x.is_finite() {
            return Err(DistributionError::OutOfDomain {
                distribution: "Beta",
                value: p,
                domain: "(0, 1)",
            });
        }
        Ok(x.clamp(0.0, 1.0))
    }
}
