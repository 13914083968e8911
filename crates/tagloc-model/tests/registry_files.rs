use std::sync::Arc;

use tagloc_core::{Mat3, Resolution};
use tagloc_model::blob::{encode_stored, save_record, CalibrationV1, StoredCalibration};
use tagloc_model::features::QUADRATIC_LEN;
use tagloc_model::{CalibrationRecord, DistanceModelComponent, ModelError, ModelRegistry};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn c270_record() -> CalibrationRecord {
    let mut z_model = DistanceModelComponent::constant(0.0);
    z_model.coefs[QUADRATIC_LEN] = 0.01;
    CalibrationRecord {
        resolution: Resolution::new(1280, 720),
        marker_size: 0.25,
        x_model: DistanceModelComponent::constant(0.0),
        z_model,
    }
}

fn model_dir_with(name: &str, record: &CalibrationRecord) -> TempDir {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::new(dir.path());
    save_record(&registry.model_path(name), record).unwrap();
    dir
}

#[test]
fn matching_resolution_loads_usable_components() {
    init_logging();
    let dir = model_dir_with("c270", &c270_record());
    let registry = ModelRegistry::new(dir.path());

    let model = registry.load("c270", Resolution::new(1280, 720)).unwrap();
    assert_eq!(model.name(), "c270");
    assert_eq!(model.record().marker_size, 0.25);

    let h = Mat3::new(100.0, 0.0, 640.0, 0.0, 100.0, 360.0, 0.0, 0.0, 1.0);
    let c = model.estimate_raw(&h);
    assert!((c.z - 1.0).abs() < 1e-12);
}

#[test]
fn mismatching_resolution_always_fails() {
    init_logging();
    let dir = model_dir_with("c270", &c270_record());
    let registry = ModelRegistry::new(dir.path());

    for requested in [Resolution::new(100, 100), Resolution::new(720, 1280)] {
        match registry.load("c270", requested) {
            Err(ModelError::ResolutionMismatch {
                name,
                calibrated,
                requested: got,
            }) => {
                assert_eq!(name, "c270");
                assert_eq!(calibrated, Resolution::new(1280, 720));
                assert_eq!(got, requested);
            }
            other => panic!("expected resolution mismatch, got {:?}", other),
        }
    }
    assert_eq!(registry.cached_len(), 0);

    // A good load afterwards still works and is cached.
    registry.load("c270", Resolution::new(1280, 720)).unwrap();
    assert_eq!(registry.cached_len(), 1);
}

#[test]
fn old_format_without_marker_size_is_rejected() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::new(dir.path());
    let r = c270_record();
    let bytes = encode_stored(&StoredCalibration::V1(CalibrationV1 {
        resolution: r.resolution,
        x_model: r.x_model,
        z_model: r.z_model,
    }))
    .unwrap();
    std::fs::write(registry.model_path("legacy"), bytes).unwrap();

    let err = registry
        .load("legacy", Resolution::new(1280, 720))
        .unwrap_err();
    assert!(matches!(err, ModelError::MissingMarkerSize { ref name, version: 1 } if name == "legacy"));
}

#[test]
fn records_are_cached_after_first_load() {
    init_logging();
    let dir = model_dir_with("c270", &c270_record());
    let registry = ModelRegistry::new(dir.path());
    let res = Resolution::new(1280, 720);

    let first = registry.load("c270", res).unwrap();
    std::fs::remove_file(registry.model_path("c270")).unwrap();
    let second = registry.load("c270", res).unwrap();
    assert!(Arc::ptr_eq(first.record(), second.record()));
}

#[test]
fn concurrent_first_loads_share_one_record() {
    init_logging();
    let dir = model_dir_with("c270", &c270_record());
    let registry = ModelRegistry::new(dir.path());
    let res = Resolution::new(1280, 720);

    let models: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.load("c270", res).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.cached_len(), 1);
    let cached = registry.load("c270", res).unwrap();
    for model in &models {
        assert!(Arc::ptr_eq(model.record(), cached.record()));
    }
}
