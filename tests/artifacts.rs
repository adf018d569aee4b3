//! Artifact loading from disk.

use crop_recommendation::config::ArtifactsConfig;
use crop_recommendation::models::ArtifactPaths;
use crop_recommendation::{ArtifactLoadError, FeatureVector, InferenceContext};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn minmax_json() -> String {
    json!({
        "kind": "min_max",
        "data_min_": [0.0, 5.0, 5.0, 8.8, 14.3, 3.5, 20.2],
        "data_max_": [140.0, 145.0, 205.0, 43.7, 99.9, 9.9, 298.6]
    })
    .to_string()
}

fn standard_json() -> String {
    json!({
        "kind": "standard",
        "mean_": [0.36, 0.38, 0.23, 0.51, 0.67, 0.50, 0.29],
        "scale_": [0.26, 0.23, 0.25, 0.14, 0.26, 0.12, 0.20]
    })
    .to_string()
}

/// Three-class model keyed on nitrogen (high → Rice) and rainfall (high → Coffee).
fn classifier_json() -> String {
    json!({
        "kind": "linear",
        "classes_": [1, 2, 22],
        "coef_": [
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        ],
        "intercept_": [0.0, 0.5, 0.0]
    })
    .to_string()
}

fn fixture_dir() -> (TempDir, ArtifactPaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths {
        model: write(dir.path(), "model.json", &classifier_json()),
        minmax_scaler: write(dir.path(), "minmaxscaler.json", &minmax_json()),
        standard_scaler: write(dir.path(), "standscaler.json", &standard_json()),
    };
    (dir, paths)
}

#[test]
fn test_load_json_artifacts_and_predict() {
    let (_dir, paths) = fixture_dir();
    let context = InferenceContext::load(&paths, 1).unwrap();

    assert!(context.model_loaded());
    assert!(context.scalers_loaded());

    // nitrogen 140 → minmax 1.0 → standard ≈ 2.46, beats the other scores
    let rich = FeatureVector::new([140.0, 42.0, 43.0, 20.9, 82.0, 6.5, 60.0]);
    let prediction = context.predict(&rich).unwrap();
    assert_eq!(prediction.class_code, 1);
    assert_eq!(prediction.crop, "Rice");

    // low nitrogen, heavy rainfall
    let wet = FeatureVector::new([10.0, 42.0, 43.0, 20.9, 82.0, 6.5, 298.6]);
    let prediction = context.predict(&wet).unwrap();
    assert_eq!(prediction.class_code, 22);
    assert_eq!(prediction.crop, "Coffee");

    // neither feature high: the intercept-only class wins
    let dry = FeatureVector::new([10.0, 42.0, 43.0, 20.9, 82.0, 6.5, 40.0]);
    assert_eq!(context.predict(&dry).unwrap().crop, "Maize");
}

#[test]
fn test_missing_artifact_is_fatal() {
    let (dir, mut paths) = fixture_dir();
    paths.standard_scaler = dir.path().join("absent.json");

    match InferenceContext::load(&paths, 1) {
        Err(ArtifactLoadError::NotFound { path }) => assert_eq!(path, paths.standard_scaler),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should fail"),
    }
}

#[test]
fn test_corrupt_artifact_is_fatal() {
    let (dir, mut paths) = fixture_dir();
    paths.model = write(dir.path(), "broken.json", "{\"kind\": \"linear\", ");

    assert!(matches!(
        InferenceContext::load(&paths, 1),
        Err(ArtifactLoadError::Parse { .. })
    ));
}

#[test]
fn test_wrong_feature_count_is_fatal() {
    let (dir, mut paths) = fixture_dir();
    paths.minmax_scaler = write(
        dir.path(),
        "narrow.json",
        &json!({"kind": "min_max", "data_min": [0.0, 0.0], "data_max": [1.0, 1.0]}).to_string(),
    );

    match InferenceContext::load(&paths, 1) {
        Err(ArtifactLoadError::Invalid { reason, .. }) => {
            assert_eq!(reason, "fitted on 2 features, expected 7")
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should fail"),
    }
}

#[test]
fn test_swapped_scaler_files_are_fatal() {
    let (dir, mut paths) = fixture_dir();
    paths.minmax_scaler = write(dir.path(), "swapped_minmax.json", &standard_json());
    paths.standard_scaler = write(dir.path(), "swapped_standard.json", &minmax_json());

    match InferenceContext::load(&paths, 1) {
        Err(ArtifactLoadError::Invalid { path, reason }) => {
            assert_eq!(path, paths.minmax_scaler);
            assert_eq!(reason, "expected a min_max scaler, found standard");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should fail"),
    }

    // Either slot alone is caught as well
    let (dir, mut paths) = fixture_dir();
    paths.standard_scaler = write(dir.path(), "also_minmax.json", &minmax_json());
    assert!(matches!(
        InferenceContext::load(&paths, 1),
        Err(ArtifactLoadError::Invalid { .. })
    ));
}

#[test]
fn test_unknown_scaler_kind_is_fatal() {
    let (dir, mut paths) = fixture_dir();
    paths.standard_scaler = write(
        dir.path(),
        "robust.json",
        &json!({"kind": "robust", "center": [0.0]}).to_string(),
    );

    assert!(matches!(
        InferenceContext::load(&paths, 1),
        Err(ArtifactLoadError::Parse { .. })
    ));
}

#[test]
fn test_pickle_artifacts_are_unsupported() {
    let (dir, mut paths) = fixture_dir();
    paths.model = write(dir.path(), "model.pkl", "not a model");

    assert!(matches!(
        InferenceContext::load(&paths, 1),
        Err(ArtifactLoadError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_config_resolves_into_a_loadable_set() {
    let (dir, _) = fixture_dir();
    let artifacts = ArtifactsConfig {
        dir: Some(dir.path().to_path_buf()),
        model: PathBuf::from("model.json"),
        ..ArtifactsConfig::default()
    };

    let paths = artifacts.resolve_from(Path::new("/does/not/matter"));
    assert_eq!(paths.model, dir.path().join("model.json"));
    assert!(InferenceContext::load(&paths, 1).is_ok());
}
