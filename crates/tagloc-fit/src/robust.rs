//! Outlier-resistant per-column centring and scaling.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tagloc_core::Real;

/// Quantile range used for the spread estimate, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileRange {
    pub low: Real,
    pub high: Real,
}

impl Default for QuantileRange {
    fn default() -> Self {
        Self {
            low: 25.0,
            high: 75.0,
        }
    }
}

/// Per-column median centre and quantile-range scale.
///
/// A single misplaced calibration photograph moves a median or an
/// inter-quartile range far less than a mean or a standard deviation.
/// Columns with zero spread keep a scale of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustScaler {
    pub center: DVector<Real>,
    pub scale: DVector<Real>,
}

impl RobustScaler {
    /// Estimate centre and scale for every column of `x`.
    pub fn fit(x: &DMatrix<Real>, range: QuantileRange) -> Self {
        let ncols = x.ncols();
        let mut center = DVector::zeros(ncols);
        let mut scale = DVector::from_element(ncols, 1.0);
        let mut sorted = Vec::with_capacity(x.nrows());

        for (j, column) in x.column_iter().enumerate() {
            sorted.clear();
            sorted.extend(column.iter().copied());
            sorted.sort_by(|a, b| a.total_cmp(b));
            if sorted.is_empty() {
                continue;
            }
            center[j] = quantile_sorted(&sorted, 50.0);
            let spread =
                quantile_sorted(&sorted, range.high) - quantile_sorted(&sorted, range.low);
            if spread > 0.0 && spread.is_finite() {
                scale[j] = spread;
            }
        }

        Self { center, scale }
    }

    /// `(x - center) / scale`, column by column.
    pub fn transform(&self, x: &DMatrix<Real>) -> DMatrix<Real> {
        let mut out = x.clone();
        for (j, mut column) in out.column_iter_mut().enumerate() {
            let (c, s) = (self.center[j], self.scale[j]);
            column.apply(|v| *v = (*v - c) / s);
        }
        out
    }
}

/// Quantile `q` (percent) of sorted data with linear interpolation.
pub fn quantile_sorted(sorted: &[Real], q: Real) -> Real {
    match sorted.len() {
        0 => Real::NAN,
        1 => sorted[0],
        n => {
            let pos = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as Real;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as Real;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
