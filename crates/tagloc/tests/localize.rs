use std::collections::BTreeMap;

use tagloc::core::synthetic::{MarkerPlacement, PinholeCamera};
use tagloc::core::{MarkerSize, RawDetection, Real, Resolution};
use tagloc::fit::{fit_calibration, TrainingExample};
use tagloc::model::blob::save_record;
use tagloc::model::{CalibrationRecord, ModelError};
use tagloc::{Localizer, LocalizerConfig, Token, TokenError};
use tempfile::TempDir;

const MODEL: &str = "c270";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn camera() -> PinholeCamera {
    PinholeCamera::new(850.0, Resolution::new(1280, 720))
}

/// Fit on every placement in all four in-plane orientations.
fn fitted_record() -> CalibrationRecord {
    let cam = camera();
    let mut examples = Vec::new();
    for &z in &[0.6, 0.9, 1.3, 1.8, 2.4] {
        for &x in &[-0.35, -0.1, 0.15, 0.3] {
            for &yaw in &[-0.15, 0.1] {
                for k in 0..4 {
                    let p = MarkerPlacement::facing(x, z, 0.25)
                        .with_yaw(yaw)
                        .with_quarter_turns(k);
                    examples.push(TrainingExample::new(cam.marker_homography(&p), cam.resolution, z, x));
                }
            }
        }
    }
    fit_calibration(&examples, 0.25).unwrap().record
}

fn localizer_with(record: &CalibrationRecord, sizes: BTreeMap<u32, MarkerSize>) -> (TempDir, Localizer) {
    let dir = TempDir::new().unwrap();
    let config = LocalizerConfig {
        model_dir: dir.path().to_path_buf(),
        default_marker_size: MarkerSize::square(0.25),
        marker_sizes: sizes,
    };
    let localizer = Localizer::new(&config);
    save_record(&localizer.registry().model_path(MODEL), record).unwrap();
    (dir, localizer)
}

fn detection(id: u32, placement: &MarkerPlacement) -> RawDetection {
    RawDetection::new(id, 0.9, &camera().marker_homography(placement))
}

fn relative_gap(a: &Token, b: &Token) -> Real {
    let a = a.cartesian().unwrap().to_vec3();
    let b = b.cartesian().unwrap().to_vec3();
    (a - b).norm() / a.norm()
}

#[test]
fn unconfigured_id_with_default_size_reports_raw_model_output() {
    init_logging();
    let record = fitted_record();
    let (_dir, localizer) = localizer_with(&record, BTreeMap::new());
    let det = detection(23, &MarkerPlacement::facing(0.1, 1.5, 0.25));

    let token = localizer
        .build_token(&det, Resolution::new(1280, 720), Some(MODEL))
        .unwrap();
    let raw = record.predict_raw(&det.homography_matrix());
    let cartesian = token.cartesian().unwrap();
    assert!((cartesian.x - raw.x).abs() < 1e-12);
    assert!((cartesian.z - raw.z).abs() < 1e-12);
    assert_eq!(cartesian.y, 0.0);
    assert_eq!(token.to_string(), "Token: 23, certainty: 0.9");
}

#[test]
fn distance_scales_with_configured_marker_size() {
    let record = fitted_record();
    let mut sizes = BTreeMap::new();
    sizes.insert(5, MarkerSize::square(0.1));
    let (_dir, localizer) = localizer_with(&record, sizes);
    let placement = MarkerPlacement::facing(-0.2, 1.1, 0.25);

    let big = localizer
        .build_token(&detection(4, &placement), Resolution::new(1280, 720), Some(MODEL))
        .unwrap();
    let small = localizer
        .build_token(&detection(5, &placement), Resolution::new(1280, 720), Some(MODEL))
        .unwrap();
    let ratio = big.cartesian().unwrap().z / small.cartesian().unwrap().z;
    assert!((ratio - 2.5).abs() < 1e-5, "ratio {ratio}");
}

#[test]
fn quarter_turns_do_not_move_the_marker() {
    let record = fitted_record();
    let (_dir, localizer) = localizer_with(&record, BTreeMap::new());
    let resolution = Resolution::new(1280, 720);

    for placement in [
        MarkerPlacement::facing(0.2, 1.0, 0.25),
        MarkerPlacement::facing(-0.25, 2.0, 0.25).with_yaw(0.05),
    ] {
        let upright = localizer
            .build_token(&detection(1, &placement), resolution, Some(MODEL))
            .unwrap();
        for k in 1..4 {
            let turned = localizer
                .build_token(
                    &detection(1, &placement.with_quarter_turns(k)),
                    resolution,
                    Some(MODEL),
                )
                .unwrap();
            let gap = relative_gap(&upright, &turned);
            assert!(gap < 0.01, "{k} quarter turns moved the marker by {gap}");
            assert_eq!(turned.pixel_centre, upright.pixel_centre);
        }
    }
}

#[test]
fn frame_loads_model_once() {
    let record = fitted_record();
    let (_dir, localizer) = localizer_with(&record, BTreeMap::new());
    let dets: Vec<RawDetection> = (0..3)
        .map(|i| detection(i, &MarkerPlacement::facing(0.1 * i as Real, 1.2, 0.25)))
        .collect();

    let tokens = localizer
        .build_tokens(&dets, Resolution::new(1280, 720), Some(MODEL))
        .unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.localization().is_some()));
    assert_eq!(localizer.registry().cached_len(), 1);
}

#[test]
fn wrong_resolution_is_refused() {
    let record = fitted_record();
    let (_dir, localizer) = localizer_with(&record, BTreeMap::new());
    let det = detection(1, &MarkerPlacement::facing(0.0, 1.0, 0.25));

    let err = localizer
        .build_token(&det, Resolution::new(640, 480), Some(MODEL))
        .unwrap_err();
    assert!(matches!(
        err,
        TokenError::Model(ModelError::ResolutionMismatch { .. })
    ));
}

#[test]
fn unknown_model_is_reported_by_name() {
    let record = fitted_record();
    let (_dir, localizer) = localizer_with(&record, BTreeMap::new());
    let det = detection(1, &MarkerPlacement::facing(0.0, 1.0, 0.25));

    let err = localizer
        .build_token(&det, Resolution::new(1280, 720), Some("webcam"))
        .unwrap_err();
    match err {
        TokenError::Model(ModelError::UnknownModel { name, .. }) => assert_eq!(name, "webcam"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn no_model_means_no_localization() {
    let localizer = Localizer::new(&LocalizerConfig::default());
    let det = detection(3, &MarkerPlacement::facing(0.0, 1.0, 0.25));
    let token = localizer
        .build_token(&det, Resolution::new(1280, 720), None)
        .unwrap();
    assert!(token.localization().is_none());
    assert_eq!(localizer.registry().cached_len(), 0);
}
