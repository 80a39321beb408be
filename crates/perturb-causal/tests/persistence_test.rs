//! Persistence tests: the loadable form, file round-trips, and ensembles.

use perturb_causal::nodes::{CausalMechanism, NodeKind};
use perturb_causal::{CausalModel, DagSpec, Intervention, ModelEnsemble};
use perturb_core::config::{PersistenceConfig, PerturbConfig};
use perturb_core::errors::{NodeError, PersistError, PerturbError};
use serde_yaml::Value;
use tempfile::TempDir;
use test_fixtures::load_fixture;

fn fixture(name: &str) -> DagSpec {
    load_fixture(&format!("dags/{name}.yaml"))
}

fn reload(model: &CausalModel) -> CausalModel {
    let yaml = model.to_yaml_string().unwrap();
    CausalModel::from_persisted(DagSpec::from_yaml_str(&yaml).unwrap()).unwrap()
}

// =============================================================================
// Round-trip contract
// =============================================================================

#[test]
fn restored_model_reproduces_first_sample() {
    for name in ["chain", "diamond", "centered", "intervention"] {
        let mut fresh = CausalModel::new(fixture(name), Some(21)).unwrap();
        let mut restored = reload(&fresh);
        for _ in 0..3 {
            assert_eq!(fresh.sample().unwrap(), restored.sample().unwrap(), "{name}");
        }
    }
}

#[test]
fn restoring_after_sampling_restarts_the_sequence() {
    let mut fresh = CausalModel::new(fixture("chain"), Some(22)).unwrap();
    let first = fresh.sample().unwrap();
    fresh.sample().unwrap();
    let mut restored = reload(&fresh);
    assert_eq!(restored.sample().unwrap(), first);
}

#[test]
fn persisted_form_is_loadable_custom_dag() {
    let model = CausalModel::new(fixture("chain"), Some(23)).unwrap();
    let persisted = model.to_persisted().unwrap();
    assert!(persisted.loadable);
    assert_eq!(persisted.seed, Some(23));
    assert_eq!(persisted.dag_generation_method, "CustomDAG");
    assert_eq!(persisted.edge_list, model.edges());

    let original = serde_yaml::to_value(fixture("chain")).unwrap();
    assert_eq!(persisted.original_configuration, Some(original));
}

#[test]
fn persisted_records_carry_frozen_state() {
    let model = CausalModel::new(fixture("chain"), Some(24)).unwrap();
    let persisted = model.to_persisted().unwrap();

    let lighting = persisted.node("Lighting").unwrap();
    // `bias: random` is frozen to the drawn number.
    assert!(lighting.fields.get("bias").and_then(Value::as_f64).is_some());
    assert_eq!(lighting.fields.get("extreme").and_then(Value::as_f64), Some(-3.0));
    assert_eq!(lighting.fields.get("standard").and_then(Value::as_f64), Some(0.0));
    assert!(lighting.defaults.is_empty());

    let noise = persisted.node("Noise").unwrap();
    let weights = noise.fields.get("edge_weights").and_then(Value::as_mapping).unwrap();
    assert_eq!(weights.len(), 1);
    assert!(weights.get("Lighting").and_then(Value::as_f64).is_some());
    assert_eq!(noise.corruption_func.as_deref(), Some("sensor_noise"));
    assert_eq!(noise.defaults.get("noise_type").and_then(Value::as_str), Some("gaussian"));
}

#[test]
fn persisted_form_is_stable_across_restores() {
    let model = CausalModel::new(fixture("diamond"), Some(25)).unwrap();
    let once = model.to_yaml_string().unwrap();
    let twice = reload(&model).to_yaml_string().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn interventions_are_persisted_as_constants() {
    let model = CausalModel::new(fixture("intervention"), Some(26)).unwrap();
    let persisted = model.to_persisted().unwrap();
    let lighting = persisted.node("Lighting").unwrap();
    assert_eq!(lighting.kind, "ConstantNode");
    assert_eq!(lighting.fields.get("severity_value").and_then(Value::as_f64), Some(0.8));
    assert!(lighting.intervene.is_none());
}

#[test]
fn new_interventions_apply_on_restore() {
    let model = CausalModel::new(fixture("chain"), Some(27)).unwrap();
    let mut persisted = model.to_persisted().unwrap();
    for node in &mut persisted.node_list {
        if node.name == "Blur" {
            node.intervene = Some(Intervention::render(5.0));
        }
    }
    let mut restored = CausalModel::from_persisted(persisted).unwrap();
    assert_eq!(restored.node("Blur").unwrap().kind(), NodeKind::Constant);
    let out = restored.sample().unwrap();
    assert_eq!(out.get("Blur").unwrap().severity(), Some(0.5));
}

// =============================================================================
// Loadability checks
// =============================================================================

#[test]
fn fresh_specs_are_not_loadable() {
    let err = CausalModel::from_persisted(fixture("chain")).unwrap_err();
    assert!(matches!(err, PerturbError::Persist(PersistError::NotLoadable)));
}

#[test]
fn loadable_spec_needs_seed() {
    let model = CausalModel::new(fixture("chain"), Some(28)).unwrap();
    let mut persisted = model.to_persisted().unwrap();
    persisted.seed = None;
    let err = CausalModel::from_persisted(persisted).unwrap_err();
    assert!(matches!(err, PerturbError::Persist(PersistError::MissingSeed)));
}

#[test]
fn loadable_spec_needs_custom_dag() {
    let model = CausalModel::new(fixture("chain"), Some(29)).unwrap();
    let mut persisted = model.to_persisted().unwrap();
    persisted.dag_generation_method = "TreeDAG".to_string();
    let err = CausalModel::from_persisted(persisted).unwrap_err();
    assert!(matches!(
        err,
        PerturbError::Persist(PersistError::UnsupportedGenerator { ref actual, .. }) if actual == "TreeDAG"
    ));
}

#[test]
fn restore_rejects_missing_bias() {
    let model = CausalModel::new(fixture("chain"), Some(30)).unwrap();
    let mut persisted = model.to_persisted().unwrap();
    for node in &mut persisted.node_list {
        node.fields.remove("bias");
    }
    let err = CausalModel::from_persisted(persisted).unwrap_err();
    assert!(matches!(
        err,
        PerturbError::Node(NodeError::MissingField { ref field, .. }) if field == "bias"
    ));
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn save_and_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.yml");

    let mut model = CausalModel::new(fixture("diamond"), Some(31)).unwrap();
    model.save(&path).unwrap();
    let mut loaded = CausalModel::load(&path).unwrap();

    assert_eq!(loaded.seed(), 31);
    assert_eq!(loaded.topological_order(), model.topological_order());
    assert_eq!(model.sample().unwrap(), loaded.sample().unwrap());
}

#[test]
fn save_rejects_other_extensions() {
    let dir = TempDir::new().unwrap();
    let model = CausalModel::new(fixture("chain"), Some(32)).unwrap();
    let err = model.save(&dir.path().join("graph.json")).unwrap_err();
    assert!(matches!(err, PerturbError::Persist(PersistError::UnsupportedExtension { .. })));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = CausalModel::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, PerturbError::Persist(PersistError::Io { .. })));
}

// =============================================================================
// Ensembles
// =============================================================================

#[test]
fn ensemble_samples_by_index() {
    let mut ensemble = ModelEnsemble::from_specs(vec![fixture("chain"), fixture("diamond")], Some(33)).unwrap();
    assert_eq!(ensemble.len(), 2);
    assert!(ensemble.sample(0).unwrap().contains("Blur"));
    assert!(ensemble.sample(1).unwrap().contains("Focus"));
    let err = ensemble.sample(2).unwrap_err();
    assert!(matches!(err, PerturbError::IndexOutOfRange { index: 2, len: 2 }));
}

#[test]
fn ensemble_save_dir_and_load() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("dags");
    let mut ensemble = ModelEnsemble::from_specs(vec![fixture("chain"), fixture("centered")], Some(34)).unwrap();

    let paths = ensemble.save_dir(&out, &PersistenceConfig::default()).unwrap();
    assert_eq!(paths, vec![out.join("dag_0.yaml"), out.join("dag_1.yaml")]);

    let mut loaded = ModelEnsemble::load(&paths).unwrap();
    for i in 0..2 {
        assert_eq!(ensemble.sample(i).unwrap(), loaded.sample(i).unwrap());
    }
}

#[test]
fn ensemble_save_dir_honors_extension() {
    let dir = TempDir::new().unwrap();
    let ensemble = ModelEnsemble::from_specs(vec![fixture("chain")], Some(35)).unwrap();
    let config = PersistenceConfig {
        output_dir: None,
        extension: Some("yml".to_string()),
    };
    let paths = ensemble.save_dir(dir.path(), &config).unwrap();
    assert_eq!(paths, vec![dir.path().join("dag_0.yml")]);
}

#[test]
fn ensemble_save_dir_rejects_file_path() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("taken");
    std::fs::write(&file, "x").unwrap();
    let ensemble = ModelEnsemble::from_specs(vec![fixture("chain")], Some(36)).unwrap();
    assert!(ensemble.save_dir(&file, &PersistenceConfig::default()).is_err());
}

#[test]
fn ensemble_load_dir_orders_by_index() {
    let dir = TempDir::new().unwrap();
    let specs: Vec<DagSpec> = (0..11).map(|_| fixture("chain")).collect();
    let mut ensemble = ModelEnsemble::from_specs(specs, Some(37)).unwrap();
    ensemble.save_dir(dir.path(), &PersistenceConfig::default()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut loaded = ModelEnsemble::load_dir(dir.path()).unwrap();
    assert_eq!(loaded.len(), 11);
    for i in [0, 2, 10] {
        assert_eq!(ensemble.model(i).unwrap().seed(), loaded.model(i).unwrap().seed());
        assert_eq!(ensemble.sample(i).unwrap(), loaded.sample(i).unwrap());
    }
}

#[test]
fn ensemble_load_dir_missing_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ModelEnsemble::load_dir(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, PerturbError::Persist(PersistError::Io { .. })));
}

#[test]
fn ensemble_save_configured_uses_output_dir() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("configured");
    let config = PerturbConfig {
        persistence: PersistenceConfig {
            output_dir: Some(out.display().to_string()),
            extension: Some("yml".to_string()),
        },
        ..Default::default()
    };
    let ensemble = ModelEnsemble::from_specs(vec![fixture("centered")], Some(38)).unwrap();
    let paths = ensemble.save_configured(&config).unwrap();
    assert_eq!(paths, vec![out.join("dag_0.yml")]);
    assert!(paths[0].exists());
}
