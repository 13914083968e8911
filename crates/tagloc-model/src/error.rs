use std::path::PathBuf;

use tagloc_core::{Real, Resolution};
use thiserror::Error;

/// Errors raised while loading or applying a distance model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The named model has no readable calibration file.
    #[error("unknown distance model '{name}': cannot read {}", path.display())]
    UnknownModel {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The model was calibrated for a different image size.
    #[error(
        "distance model '{name}' was calibrated at {calibrated} but the camera produces {requested} images"
    )]
    ResolutionMismatch {
        name: String,
        calibrated: Resolution,
        requested: Resolution,
    },
    /// Distance models only support square markers.
    #[error("marker {id} has non-square size {width} x {height} m; only square markers are supported")]
    NonSquareMarker { id: u32, width: Real, height: Real },
    /// The calibration predates the marker-size field.
    #[error(
        "calibration '{name}' (format version {version}) has no marker_size; re-run the calibration"
    )]
    MissingMarkerSize { name: String, version: u32 },
    /// The calibration blob is not a format this build understands.
    #[error("calibration '{name}' has an incompatible format: {reason}")]
    IncompatibleFormat { name: String, reason: String },
    /// The record could not be serialized.
    #[error("failed to encode calibration record: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ModelError {
    pub(crate) fn incompatible(name: &str, reason: impl Into<String>) -> Self {
        Self::IncompatibleFormat {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
