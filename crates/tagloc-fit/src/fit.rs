use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tagloc_core::Real;
use tagloc_model::{
    homography_to_feature_vector, CalibrationRecord, DistanceModelComponent, FEATURE_LEN,
};

use crate::{
    fit_least_squares, mean_absolute_error, Axis, FitError, QuantileRange, RobustScaler,
    TrainingExample,
};

/// Options for [`fit_calibration_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Quantiles bounding the robust spread estimate.
    #[serde(default)]
    pub quantile_range: QuantileRange,
    /// Relative singular-value cutoff for the least-squares solve.
    #[serde(default = "default_rcond")]
    pub rcond: Real,
}

fn default_rcond() -> Real {
    1e-10
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            quantile_range: QuantileRange::default(),
            rcond: default_rcond(),
        }
    }
}

/// One fitted axis and its error on the training set.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisFit {
    pub component: DistanceModelComponent,
    pub mean_absolute_error: Real,
}

/// Fitted record plus training diagnostics. Only `record` is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub record: CalibrationRecord,
    pub x_mean_absolute_error: Real,
    pub z_mean_absolute_error: Real,
    pub examples_used: usize,
    /// Photographs rejected before fitting (zero or several markers).
    pub examples_skipped: usize,
}

/// Fit a calibration with default options.
///
/// `marker_size` is the side length (metres) of the reference marker that
/// appears in every training photograph.
pub fn fit_calibration(
    examples: &[TrainingExample],
    marker_size: Real,
) -> Result<FitReport, FitError> {
    fit_calibration_with(examples, marker_size, &FitConfig::default())
}

pub fn fit_calibration_with(
    examples: &[TrainingExample],
    marker_size: Real,
    config: &FitConfig,
) -> Result<FitReport, FitError> {
    let first = examples.first().ok_or(FitError::NoExamples)?;
    if !(marker_size.is_finite() && marker_size > 0.0) {
        return Err(FitError::InvalidMarkerSize(marker_size));
    }
    let resolution = first.resolution;
    if let Some((index, ex)) = examples
        .iter()
        .enumerate()
        .find(|(_, ex)| ex.resolution != resolution)
    {
        return Err(FitError::MixedResolution {
            index,
            expected: resolution,
            found: ex.resolution,
        });
    }

    let design = design_matrix(examples);
    let x_targets = DVector::from_iterator(examples.len(), examples.iter().map(|e| e.x_offset));
    let z_targets = DVector::from_iterator(examples.len(), examples.iter().map(|e| e.z_distance));

    let x_fit = fit_axis(&design, &x_targets, config, Axis::X)?;
    let z_fit = fit_axis(&design, &z_targets, config, Axis::Z)?;

    info!(
        "fitted distance model at {} from {} examples: x MAE {:.4} m, z MAE {:.4} m",
        resolution,
        examples.len(),
        x_fit.mean_absolute_error,
        z_fit.mean_absolute_error
    );

    Ok(FitReport {
        record: CalibrationRecord {
            resolution,
            marker_size,
            x_model: x_fit.component,
            z_model: z_fit.component,
        },
        x_mean_absolute_error: x_fit.mean_absolute_error,
        z_mean_absolute_error: z_fit.mean_absolute_error,
        examples_used: examples.len(),
        examples_skipped: 0,
    })
}

/// One feature row per example.
pub fn design_matrix(examples: &[TrainingExample]) -> DMatrix<Real> {
    let mut design = DMatrix::zeros(examples.len(), FEATURE_LEN);
    for (i, example) in examples.iter().enumerate() {
        let features = homography_to_feature_vector(&example.homography);
        design.row_mut(i).tr_copy_from(&features);
    }
    design
}

/// Fit one axis and fold the robust scaling into the component.
pub fn fit_axis(
    design: &DMatrix<Real>,
    targets: &DVector<Real>,
    config: &FitConfig,
    axis: Axis,
) -> Result<AxisFit, FitError> {
    let scaler = RobustScaler::fit(design, config.quantile_range);
    let scaled = scaler.transform(design);
    let linear = fit_least_squares(&scaled, targets, config.rcond, axis)?;

    let component = DistanceModelComponent {
        coefs: linear
            .coefs
            .iter()
            .zip(scaler.scale.iter())
            .map(|(c, s)| c / s)
            .collect(),
        biases: scaler.center.iter().map(|c| -c).collect(),
        intercept: linear.intercept,
    };

    // Score through the inference path so the reported error matches what
    // callers will see.
    let predicted = DVector::from_iterator(
        design.nrows(),
        design
            .row_iter()
            .map(|row| component.apply(&row.transpose())),
    );
    let mean_absolute_error = mean_absolute_error(&predicted, targets);

    Ok(AxisFit {
        component,
        mean_absolute_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagloc_core::synthetic::{MarkerPlacement, PinholeCamera};
    use tagloc_core::{Mat3, Resolution};

    fn camera() -> PinholeCamera {
        PinholeCamera::new(800.0, Resolution::new(1280, 720))
    }

    fn examples() -> Vec<TrainingExample> {
        let cam = camera();
        let mut out = Vec::new();
        for &z in &[0.6, 1.0, 1.5, 2.0, 2.5, 3.0] {
            for &x in &[-0.4, 0.0, 0.3] {
                let h = cam.marker_homography(&MarkerPlacement::facing(x, z, 0.25));
                out.push(TrainingExample::new(h, cam.resolution, z, x));
            }
        }
        out
    }

    #[test]
    fn zero_examples_is_an_error() {
        assert_eq!(fit_calibration(&[], 0.25), Err(FitError::NoExamples));
    }

    #[test]
    fn marker_size_must_be_positive() {
        assert_eq!(
            fit_calibration(&examples(), 0.0),
            Err(FitError::InvalidMarkerSize(0.0))
        );
    }

    #[test]
    fn mixed_resolutions_are_rejected() {
        let mut ex = examples();
        ex[4].resolution = Resolution::new(640, 480);
        assert_eq!(
            fit_calibration(&ex, 0.25),
            Err(FitError::MixedResolution {
                index: 4,
                expected: Resolution::new(1280, 720),
                found: Resolution::new(640, 480),
            })
        );
    }

    #[test]
    fn identical_examples_are_singular() {
        let h = Mat3::new(100.0, 0.0, 640.0, 0.0, 100.0, 360.0, 0.0, 0.0, 1.0);
        let ex = vec![TrainingExample::new(h, Resolution::new(1280, 720), 1.0, 0.0); 3];
        assert!(matches!(
            fit_calibration(&ex, 0.25),
            Err(FitError::SingularDesign { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn record_carries_resolution_and_marker_size() {
        let report = fit_calibration(&examples(), 0.25).unwrap();
        assert_eq!(report.record.resolution, Resolution::new(1280, 720));
        assert_eq!(report.record.marker_size, 0.25);
        assert_eq!(report.examples_used, 18);
        assert_eq!(report.record.x_model.coefs.len(), FEATURE_LEN);
        assert_eq!(report.record.z_model.biases.len(), FEATURE_LEN);
        assert!(report.record.validate("fit").is_ok());
    }

    #[test]
    fn reported_error_matches_inference_on_training_set() {
        let ex = examples();
        let report = fit_calibration(&ex, 0.25).unwrap();
        let n = ex.len() as Real;
        let z_mae = ex
            .iter()
            .map(|e| (report.record.z_model.apply_homography(&e.homography) - e.z_distance).abs())
            .sum::<Real>()
            / n;
        let x_mae = ex
            .iter()
            .map(|e| (report.record.x_model.apply_homography(&e.homography) - e.x_offset).abs())
            .sum::<Real>()
            / n;
        assert!((z_mae - report.z_mean_absolute_error).abs() < 1e-9);
        assert!((x_mae - report.x_mean_absolute_error).abs() < 1e-9);
    }
}
