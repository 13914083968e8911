//! Feature transform shared by the fitter and the inference engine.
//!
//! The homography is flattened row-major into `v` (9 values). The feature
//! vector is the outer product `v·vᵀ` flattened row-major (81 values)
//! followed by `v` itself:
//!
//! ```text
//! [ v0·v0, v0·v1, ..., v8·v8,  v0, v1, ..., v8 ]
//!   \------- quadratic -----/  \--- linear ---/
//! ```
//!
//! Fitted coefficients are positional, so this layout is part of the
//! persisted model format.

use nalgebra::DVector;
use tagloc_core::{HomographyMatrix, Real};

/// Number of homography entries.
pub const LINEAR_LEN: usize = 9;
/// Number of pairwise products of homography entries.
pub const QUADRATIC_LEN: usize = LINEAR_LEN * LINEAR_LEN;
/// Total feature count.
pub const FEATURE_LEN: usize = QUADRATIC_LEN + LINEAR_LEN;

/// Homography entries in row-major order.
pub fn flatten_row_major(h: &HomographyMatrix) -> [Real; LINEAR_LEN] {
    let mut v = [0.0; LINEAR_LEN];
    for r in 0..3 {
        for c in 0..3 {
            v[3 * r + c] = h[(r, c)];
        }
    }
    v
}

/// Quadratic-and-linear features of a homography.
pub fn homography_to_feature_vector(h: &HomographyMatrix) -> DVector<Real> {
    let v = flatten_row_major(h);
    let mut features = DVector::zeros(FEATURE_LEN);
    for i in 0..LINEAR_LEN {
        for j in 0..LINEAR_LEN {
            features[LINEAR_LEN * i + j] = v[i] * v[j];
        }
    }
    for (i, value) in v.iter().enumerate() {
        features[QUADRATIC_LEN + i] = *value;
    }
    features
}
