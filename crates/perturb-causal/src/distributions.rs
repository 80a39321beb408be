//! Distribution adapters over `statrs`, returning the drawn value together
//! with its log-probability. Every draw takes the model's stream explicitly.

use perturb_core::errors::DistributionError;
use rand::Rng;
use statrs::distribution::{
    Bernoulli as StatrsBernoulli, Categorical as StatrsCategorical, Continuous, Discrete,
    DiscreteUniform as StatrsDiscreteUniform, Normal as StatrsNormal, Uniform as StatrsUniform,
};

/// A single draw and its log-probability (or log-density).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    pub value: f64,
    pub log_prob: f64,
}

impl Draw {
    fn new(value: f64, log_prob: f64) -> Self {
        Self { value, log_prob }
    }
}

/// Common interface of the adapters.
pub trait LogProbSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw;
}

fn invalid(distribution: &'static str, message: impl Into<String>) -> DistributionError {
    DistributionError::InvalidParameters {
        distribution,
        message: message.into(),
    }
}

/// Continuous uniform on `[low, high]`.
#[derive(Debug, Clone)]
pub struct Uniform {
    inner: StatrsUniform,
}

impl Uniform {
    pub fn new(low: f64, high: f64) -> Result<Self, DistributionError> {
        let inner = StatrsUniform::new(low, high)
            .map_err(|e| invalid("Uniform", format!("need finite low < high, got [{low}, {high}]: {e}")))?;
        Ok(Self { inner })
    }
}

impl LogProbSampler for Uniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let value: f64 = rng.sample(&self.inner);
        Draw::new(value, self.inner.ln_pdf(value))
    }
}

/// Uniform over the bin fractions `k / n_bins` for `k` in `0..n_bins`.
#[derive(Debug, Clone)]
pub struct DiscreteUniform {
    n_bins: usize,
    inner: StatrsDiscreteUniform,
}

impl DiscreteUniform {
    pub fn new(n_bins: usize) -> Result<Self, DistributionError> {
        let max = i64::try_from(n_bins)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|max| *max >= 0)
            .ok_or_else(|| invalid("DiscreteUniform", format!("n_bins must be positive, got {n_bins}")))?;
        let inner = StatrsDiscreteUniform::new(0, max).map_err(|e| invalid("DiscreteUniform", e.to_string()))?;
        Ok(Self { n_bins, inner })
    }
}

impl LogProbSampler for DiscreteUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let k: i64 = rng.sample(&self.inner);
        Draw::new(k as f64 / self.n_bins as f64, self.inner.ln_pmf(k))
    }
}

/// Categorical over `0..k`. The value is the drawn index.
#[derive(Debug, Clone)]
pub struct Categorical {
    len: usize,
    inner: StatrsCategorical,
}

impl Categorical {
    /// Equal probability over `n_bins` categories.
    pub fn uniform(n_bins: usize) -> Result<Self, DistributionError> {
        if n_bins == 0 {
            return Err(invalid("Categorical", "n_bins must be positive"));
        }
        Self::from_probs(&vec![1.0; n_bins])
    }

    /// Unnormalized non-negative weights.
    pub fn from_probs(probs: &[f64]) -> Result<Self, DistributionError> {
        if probs.iter().any(|p| p.is_infinite()) {
            return Err(invalid("Categorical", "probs must be finite"));
        }
        let inner = StatrsCategorical::new(probs).map_err(|e| invalid("Categorical", e.to_string()))?;
        Ok(Self {
            len: probs.len(),
            inner,
        })
    }

    /// Log-weights, normalized with a softmax.
    pub fn from_logits(logits: &[f64]) -> Result<Self, DistributionError> {
        if logits.is_empty() || logits.iter().any(|l| l.is_nan() || *l == f64::INFINITY) {
            return Err(invalid("Categorical", "logits must be non-empty and below +inf"));
        }
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return Err(invalid("Categorical", "logits must not all be -inf"));
        }
        let weights: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        Self::from_probs(&weights)
    }

    /// Normalized probabilities by index.
    pub fn probs(&self) -> Vec<f64> {
        (0..self.len as u64).map(|k| self.inner.pmf(k)).collect()
    }
}

impl LogProbSampler for Categorical {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let k: usize = rng.sample(&self.inner);
        Draw::new(k as f64, self.inner.ln_pmf(k as u64))
    }
}

/// Gaussian with mean `loc` and standard deviation `scale`.
#[derive(Debug, Clone)]
pub struct Normal {
    inner: StatrsNormal,
}

impl Normal {
    pub fn new(loc: f64, scale: f64) -> Result<Self, DistributionError> {
        if !(scale > 0.0) {
            return Err(invalid("Normal", format!("scale must be positive, got {scale}")));
        }
        let inner = StatrsNormal::new(loc, scale).map_err(|e| invalid("Normal", e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn standard() -> Self {
        Self {
            inner: StatrsNormal::standard(),
        }
    }
}

impl LogProbSampler for Normal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let value: f64 = rng.sample(&self.inner);
        Draw::new(value, self.inner.ln_pdf(value))
    }
}

/// Absolute value of a zero-mean Gaussian.
#[derive(Debug, Clone)]
pub struct HalfNormal {
    inner: StatrsNormal,
}

impl HalfNormal {
    pub fn new(scale: f64) -> Result<Self, DistributionError> {
        if !(scale > 0.0) {
            return Err(invalid("HalfNormal", format!("scale must be positive, got {scale}")));
        }
        let inner = StatrsNormal::new(0.0, scale).map_err(|e| invalid("HalfNormal", e.to_string()))?;
        Ok(Self { inner })
    }
}

impl LogProbSampler for HalfNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let value = rng.sample::<f64, _>(&self.inner).abs();
        Draw::new(value, std::f64::consts::LN_2 + self.inner.ln_pdf(value))
    }
}

/// Bernoulli trial yielding `1.0` or `0.0`.
#[derive(Debug, Clone)]
pub struct Bernoulli {
    inner: StatrsBernoulli,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self, DistributionError> {
        let inner = StatrsBernoulli::new(p)
            .map_err(|e| invalid("Bernoulli", format!("p must be in [0, 1], got {p}: {e}")))?;
        Ok(Self { inner })
    }
}

impl LogProbSampler for Bernoulli {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Draw {
        let hit: bool = rng.sample(&self.inner);
        let k = u64::from(hit);
        Draw::new(k as f64, self.inner.ln_pmf(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_stays_in_range() {
        let d = Uniform::new(-1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let draw = d.sample(&mut rng);
            assert!((-1.0..=1.0).contains(&draw.value));
            assert!((draw.log_prob - (0.5f64).ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_rejects_empty_interval() {
        assert!(Uniform::new(1.0, 1.0).is_err());
        assert!(Uniform::new(2.0, 1.0).is_err());
        assert!(Uniform::new(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn discrete_uniform_yields_bin_fractions() {
        let d = DiscreteUniform::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let draw = d.sample(&mut rng);
            assert!([0.0, 0.25, 0.5, 0.75].contains(&draw.value));
            assert!((draw.log_prob - 0.25f64.ln()).abs() < 1e-12);
        }
        assert!(DiscreteUniform::new(0).is_err());
    }

    #[test]
    fn categorical_never_picks_zero_probability() {
        let d = Categorical::from_probs(&[0.0, 3.0, 0.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let draw = d.sample(&mut rng);
            assert!(draw.value == 1.0 || draw.value == 3.0);
            let expected = if draw.value == 1.0 { 0.75f64 } else { 0.25f64 };
            assert!((draw.log_prob - expected.ln()).abs() < 1e-12);
        }
        assert!((d.probs()[1] - 0.75).abs() < 1e-12);
        assert!(Categorical::from_probs(&[1.0, f64::INFINITY]).is_err());
        assert!(Categorical::from_probs(&[0.0, 0.0]).is_err());
        assert!(Categorical::from_probs(&[-1.0, 2.0]).is_err());
    }

    #[test]
    fn categorical_logits_match_softmax() {
        let d = Categorical::from_logits(&[0.0, 0.0]).unwrap();
        assert!((d.probs()[0] - 0.5).abs() < 1e-12);
        assert!(Categorical::from_logits(&[]).is_err());
    }

    #[test]
    fn half_normal_is_non_negative() {
        let d = HalfNormal::new(2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            assert!(d.sample(&mut rng).value >= 0.0);
        }
    }

    #[test]
    fn normal_rejects_non_positive_scale() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(0.0, -1.0).is_err());
        assert!(Normal::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn bernoulli_extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(5);
        let always = Bernoulli::new(1.0).unwrap();
        let never = Bernoulli::new(0.0).unwrap();
        for _ in 0..50 {
            assert_eq!(always.sample(&mut rng), Draw::new(1.0, 0.0));
            assert_eq!(never.sample(&mut rng), Draw::new(0.0, 0.0));
        }
        let fair = Bernoulli::new(0.5).unwrap();
        assert!((fair.sample(&mut rng).log_prob - 0.5f64.ln()).abs() < 1e-12);
        assert!(Bernoulli::new(1.5).is_err());
    }
}
