//! Property tests for sampling, severity inverses, and persistence.

use proptest::prelude::*;

use perturb_causal::nodes::beta::BetaShape;
use perturb_causal::nodes::{Activation, CorruptionType, SeverityPolicy};
use perturb_causal::{CausalModel, DagSpec, NodeSpec};

/// Range `[min, max]` with a standard value inside it.
fn policy_strategy(kinds: Vec<CorruptionType>) -> impl Strategy<Value = SeverityPolicy> {
    (prop::sample::select(kinds), -100.0_f64..100.0, 0.01_f64..50.0, 0.0_f64..=1.0).prop_map(
        |(kind, min, width, t)| SeverityPolicy {
            corruption_type: kind,
            min_val: min,
            max_val: min + width,
            standard: min + t * width,
        },
    )
}

fn monotone() -> impl Strategy<Value = SeverityPolicy> {
    policy_strategy(vec![CorruptionType::Increasing, CorruptionType::Decreasing])
}

fn centered() -> impl Strategy<Value = SeverityPolicy> {
    policy_strategy(vec![CorruptionType::Centered])
}

fn any_policy() -> impl Strategy<Value = SeverityPolicy> {
    policy_strategy(vec![
        CorruptionType::Increasing,
        CorruptionType::Decreasing,
        CorruptionType::Centered,
    ])
}

fn weighted(name: &str, kind: &str, activation: &str) -> NodeSpec {
    NodeSpec::new(name, "WeightedSumNode")
        .parameter("value")
        .field("min_val", 0.0)
        .field("max_val", 1.0)
        .field("standard", 0.5)
        .field("corruption_type", kind)
        .field("beta_a", 1.5)
        .field("beta_b", 2.5)
        .field("bias", true)
        .field("std", 1.0)
        .field("activation_type", activation)
}

/// A random DAG over `n` nodes: node `i` gets edges from any earlier node
/// picked by the mask, and from root when it has no other parent.
fn random_dag(n: usize, masks: &[u8], kinds: &[u8]) -> DagSpec {
    let kind_names = ["increasing", "decreasing", "centered"];
    let mut spec = DagSpec::custom();
    for i in 0..n {
        let activation = if i % 2 == 0 { "sigmoid" } else { "tanh" };
        spec = spec.with_node(weighted(&format!("N{i}"), kind_names[kinds[i] as usize % 3], activation));
    }
    for i in 0..n {
        let mut has_parent = false;
        for j in 0..i {
            if masks[i] & (1 << (j % 8)) != 0 {
                spec = spec.with_edge(&format!("N{j}"), &format!("N{i}"));
                has_parent = true;
            }
        }
        if !has_parent {
            spec = spec.with_edge("root", &format!("N{i}"));
        }
    }
    spec
}

// =============================================================================
// Severity inverses
// =============================================================================
proptest! {
    #[test]
    fn monotone_round_trip(policy in monotone(), t in 0.0_f64..=1.0) {
        let render = policy.min_val + t * (policy.max_val - policy.min_val);
        let back = policy.render(policy.severity(render), true);
        prop_assert!((back - render).abs() <= 1e-9 * render.abs().max(1.0));
    }

    #[test]
    fn centered_round_trip_keeps_distance(policy in centered(), t in 0.0_f64..=1.0, upper in any::<bool>()) {
        let render = policy.min_val + t * (policy.max_val - policy.min_val);
        let back = policy.render(policy.severity(render), upper);
        let d1 = (render - policy.standard).abs();
        let d2 = (back - policy.standard).abs();
        prop_assert!((d1 - d2).abs() <= 1e-9 * d1.max(1.0));
    }

    #[test]
    fn severity_is_unit_interval_on_range(policy in any_policy(), t in 0.0_f64..=1.0) {
        let render = policy.min_val + t * (policy.max_val - policy.min_val);
        let s = policy.severity(render);
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&s));
    }
}

// =============================================================================
// Numeric pipeline
// =============================================================================
proptest! {
    #[test]
    fn activation_output_is_a_quantile(x in -1.0e4_f64..1.0e4) {
        for a in [Activation::Sigmoid, Activation::Tanh] {
            let q = a.apply(x);
            prop_assert!((0.0..=1.0).contains(&q));
        }
    }

    #[test]
    fn beta_quantile_inverts_cdf(a in 0.2_f64..20.0, b in 0.2_f64..20.0, p in 0.001_f64..0.999) {
        let shape = BetaShape::new(a, b).unwrap();
        let x = shape.quantile(p).unwrap();
        prop_assert!((0.0..=1.0).contains(&x));
        prop_assert!((shape.cdf(x) - p).abs() < 1e-6);
    }
}

// =============================================================================
// Whole-graph sampling
// =============================================================================
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_dags_sample_in_range_and_in_order(
        n in 1usize..8,
        masks in prop::collection::vec(any::<u8>(), 8),
        kinds in prop::collection::vec(any::<u8>(), 8),
        seed in 0u64..1_000_000,
    ) {
        let spec = random_dag(n, &masks, &kinds);
        let mut model = CausalModel::new(spec.clone(), Some(seed)).unwrap();
        let result = model.sample().unwrap();
        prop_assert_eq!(result.len(), n);

        let order: Vec<&str> = result.names().collect();
        for edge in &spec.edge_list {
            if edge.parent() == "root" {
                continue;
            }
            let p = order.iter().position(|name| *name == edge.parent()).unwrap();
            let c = order.iter().position(|name| *name == edge.child()).unwrap();
            prop_assert!(p < c, "{} must precede {}", edge.parent(), edge.child());
        }

        for (_, out) in result.iter() {
            let r = out.render_value().unwrap();
            let s = out.severity().unwrap();
            prop_assert!((0.0..=1.0).contains(&r));
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn persisted_graphs_resample_identically(
        n in 1usize..6,
        masks in prop::collection::vec(any::<u8>(), 8),
        kinds in prop::collection::vec(any::<u8>(), 8),
        seed in 0u64..1_000_000,
    ) {
        let spec = random_dag(n, &masks, &kinds);
        let mut fresh = CausalModel::new(spec, Some(seed)).unwrap();
        let yaml = fresh.to_yaml_string().unwrap();
        let mut restored = CausalModel::from_persisted(DagSpec::from_yaml_str(&yaml).unwrap()).unwrap();
        for _ in 0..2 {
            prop_assert_eq!(fresh.sample().unwrap(), restored.sample().unwrap());
        }
    }
}
