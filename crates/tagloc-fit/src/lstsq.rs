//! Ordinary least squares with an intercept.
//!
//! Columns and targets are mean-centred, the centred system is solved with a
//! truncated SVD (minimum-norm solution, so duplicated or constant feature
//! columns are harmless) and the intercept is recovered from the means.

use nalgebra::{DMatrix, DVector};
use tagloc_core::Real;

use crate::{Axis, FitError};

/// Coefficients and intercept of a linear fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub coefs: DVector<Real>,
    pub intercept: Real,
}

/// Fit `y ≈ x · coefs + intercept`.
///
/// Singular values below `rcond × σ_max` are treated as zero. Fails when no
/// singular value survives (e.g. a single example, or identical examples).
pub fn fit_least_squares(
    x: &DMatrix<Real>,
    y: &DVector<Real>,
    rcond: Real,
    axis: Axis,
) -> Result<LinearFit, FitError> {
    if x.nrows() != y.len() {
        return Err(FitError::DimensionMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    let singular = |reason: String| FitError::SingularDesign { axis, reason };
    if x.nrows() == 0 {
        return Err(singular("no rows".to_string()));
    }

    let col_means = DVector::from_iterator(x.ncols(), x.column_iter().map(|c| c.mean()));
    let y_mean = y.mean();

    let mut xc = x.clone();
    for (j, mut column) in xc.column_iter_mut().enumerate() {
        column.add_scalar_mut(-col_means[j]);
    }
    let yc = y.add_scalar(-y_mean);

    let svd = xc.svd(true, true);
    let sigma_max = svd.singular_values.max();
    if !(sigma_max.is_finite() && sigma_max > 0.0) {
        return Err(singular(format!("largest singular value is {sigma_max}")));
    }

    let coefs = svd
        .solve(&yc, rcond * sigma_max)
        .map_err(|e| singular(e.to_string()))?;
    if coefs.iter().any(|c| !c.is_finite()) {
        return Err(singular("non-finite coefficients".to_string()));
    }

    let intercept = y_mean - col_means.dot(&coefs);
    Ok(LinearFit { coefs, intercept })
}

/// Mean absolute difference between two equally long vectors.
pub fn mean_absolute_error(predicted: &DVector<Real>, actual: &DVector<Real>) -> Real {
    if actual.is_empty() {
        return 0.0;
    }
    (predicted - actual).abs().sum() / actual.len() as Real
}
