//! Type aliases and small matrix helpers shared by every crate.

use nalgebra::{Matrix3, Point2, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;

/// Projective transform from the canonical marker square to image pixels.
pub type HomographyMatrix = Mat3;

/// Build a homography from row-major nested arrays.
pub fn homography_from_rows(rows: &[[Real; 3]; 3]) -> HomographyMatrix {
    Mat3::new(
        rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
        rows[2][1], rows[2][2],
    )
}

/// Row-major nested-array view of a homography.
pub fn homography_to_rows(h: &HomographyMatrix) -> [[Real; 3]; 3] {
    [
        [h[(0, 0)], h[(0, 1)], h[(0, 2)]],
        [h[(1, 0)], h[(1, 1)], h[(1, 2)]],
        [h[(2, 0)], h[(2, 1)], h[(2, 2)]],
    ]
}

/// Scale a homography so that `H[2,2] == 1`.
///
/// Homographies are only defined up to scale; a matrix whose bottom-right
/// entry is (numerically) zero is returned unchanged.
pub fn normalize_homography(h: &HomographyMatrix) -> HomographyMatrix {
    let scale = h[(2, 2)];
    if scale.abs() > Real::EPSILON {
        h / scale
    } else {
        *h
    }
}
