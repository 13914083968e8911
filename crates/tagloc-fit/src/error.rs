use std::fmt;

use tagloc_core::{Real, Resolution};
use thiserror::Error;

/// Axis of the distance model being fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// Errors that abort a calibration fit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("cannot fit a calibration from zero training examples")]
    NoExamples,
    #[error("training example {index} was taken at {found}, expected {expected} like the first example")]
    MixedResolution {
        index: usize,
        expected: Resolution,
        found: Resolution,
    },
    #[error("invalid reference marker size {0} m")]
    InvalidMarkerSize(Real),
    #[error("design matrix has {rows} rows but targets have {targets} entries")]
    DimensionMismatch { rows: usize, targets: usize },
    #[error("{axis} model: design matrix is singular after centring ({reason})")]
    SingularDesign { axis: Axis, reason: String },
}

/// Why a single calibration photograph was not usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("cannot detect a marker in {image}")]
    NoMarker { image: String },
    #[error("expected a single marker in {image}, found {count}")]
    MultipleMarkers { image: String, count: usize },
}
