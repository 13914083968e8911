use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tagloc_core::{HomographyMatrix, Real};

use crate::features::{homography_to_feature_vector, FEATURE_LEN};

/// One axis of a fitted distance model.
///
/// Applied as `(biases + features) · coefs + intercept`, where `features` is
/// [`homography_to_feature_vector`]. `biases` undo the fitter's centring so
/// raw features can be used directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceModelComponent {
    pub coefs: Vec<Real>,
    pub biases: Vec<Real>,
    pub intercept: Real,
}

impl DistanceModelComponent {
    /// Component that always predicts `intercept`.
    pub fn constant(intercept: Real) -> Self {
        Self {
            coefs: vec![0.0; FEATURE_LEN],
            biases: vec![0.0; FEATURE_LEN],
            intercept,
        }
    }

    /// Evaluate on a precomputed feature vector.
    ///
    /// The vectors must have matching lengths; see [`Self::layout_error`].
    /// [`crate::DistanceModel`] only accepts records that pass that check.
    pub fn apply(&self, features: &DVector<Real>) -> Real {
        debug_assert_eq!(features.len(), self.coefs.len());
        debug_assert_eq!(features.len(), self.biases.len());
        let mut acc = self.intercept;
        for ((f, b), c) in features.iter().zip(&self.biases).zip(&self.coefs) {
            acc += (b + f) * c;
        }
        acc
    }

    /// Evaluate on a homography.
    pub fn apply_homography(&self, h: &HomographyMatrix) -> Real {
        self.apply(&homography_to_feature_vector(h))
    }

    /// Describe why this component does not match the current feature layout.
    pub fn layout_error(&self) -> Option<String> {
        if self.coefs.len() != FEATURE_LEN {
            return Some(format!(
                "expected {} coefficients, found {}",
                FEATURE_LEN,
                self.coefs.len()
            ));
        }
        if self.biases.len() != FEATURE_LEN {
            return Some(format!(
                "expected {} biases, found {}",
                FEATURE_LEN,
                self.biases.len()
            ));
        }
        if !self.intercept.is_finite()
            || self.coefs.iter().chain(&self.biases).any(|v| !v.is_finite())
        {
            return Some("non-finite model parameters".to_string());
        }
        None
    }
}
