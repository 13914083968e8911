//! Calibration fitting for `tagloc` distance models.
//!
//! Calibration photographs of one reference marker at known positions are
//! reduced to [`TrainingExample`]s (homography plus ground truth). For each
//! axis the fitter:
//!
//! 1. builds the 90-column design matrix with the shared feature transform,
//! 2. centres and scales each column robustly (median / inter-quartile range),
//! 3. solves ordinary least squares with an intercept,
//! 4. folds the scaling back into coefficients and biases so the result can
//!    be applied to raw features.
//!
//! Photographs that do not show exactly one marker are skipped with a
//! warning; everything else that goes wrong is an error.

mod error;
mod fit;
mod lstsq;
mod manifest;
mod robust;
mod training;

pub use error::*;
pub use fit::*;
pub use lstsq::*;
pub use manifest::*;
pub use robust::*;
pub use training::*;
