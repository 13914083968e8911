use serde::{Deserialize, Serialize};
use tagloc_core::{Cartesian, HomographyMatrix, Real, Resolution};

use crate::{features::homography_to_feature_vector, DistanceModelComponent, ModelError};

/// Fitted distance model tied to one camera resolution and reference marker.
///
/// Produced once by the fitter and immutable afterwards; share it behind an
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Image size of the calibration photographs.
    pub resolution: Resolution,
    /// Side length (metres) of the reference marker used for calibration.
    pub marker_size: Real,
    /// Lateral offset model.
    pub x_model: DistanceModelComponent,
    /// Forward distance model.
    pub z_model: DistanceModelComponent,
}

impl CalibrationRecord {
    /// Position predicted for a marker of the calibrated size.
    ///
    /// The model has no vertical degree of freedom, so `y` is always zero.
    pub fn predict_raw(&self, h: &HomographyMatrix) -> Cartesian {
        let features = homography_to_feature_vector(h);
        Cartesian::new(
            self.x_model.apply(&features),
            0.0,
            self.z_model.apply(&features),
        )
    }

    /// Fail unless this record was calibrated at `requested`.
    pub fn ensure_resolution(&self, name: &str, requested: Resolution) -> Result<(), ModelError> {
        if self.resolution != requested {
            return Err(ModelError::ResolutionMismatch {
                name: name.to_string(),
                calibrated: self.resolution,
                requested,
            });
        }
        Ok(())
    }

    /// Check components and marker size against the current format.
    pub fn validate(&self, name: &str) -> Result<(), ModelError> {
        if let Some(reason) = self.x_model.layout_error() {
            return Err(ModelError::incompatible(name, format!("x model: {reason}")));
        }
        if let Some(reason) = self.z_model.layout_error() {
            return Err(ModelError::incompatible(name, format!("z model: {reason}")));
        }
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(ModelError::incompatible(
                name,
                format!("invalid marker_size {}", self.marker_size),
            ));
        }
        Ok(())
    }
}
