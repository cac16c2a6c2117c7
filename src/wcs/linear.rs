//! The linear pixel↔intermediate-world-coordinate transform (§4.2).

use crate::error::WcsError;
use crate::wcs::keywords::KeywordSource;

/// A 2×2 matrix and reference pixel offset implementing
/// `(x,y) = M · ((i,j) − CRPIX)`.
///
/// `M` is derived in priority order CD → PC·diag(CDELT) →
/// diag(CDELT)·Rot(CROTA2), per §3. Construction fails with
/// [`WcsError::Math`] if the resulting matrix is singular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    /// Row-major 2×2 matrix `[[m11, m12], [m21, m22]]`.
    matrix: [[f64; 2]; 2],
    /// Inverse of `matrix`, precomputed once at construction.
    inverse: [[f64; 2]; 2],
    /// Reference pixel `(CRPIX1, CRPIX2)`, 1-based.
    crpix: [f64; 2],
}

impl LinearTransform {
    /// Builds a [`LinearTransform`] from a keyword source, selecting CD, then
    /// PC+CDELT, then CDELT+CROTA2, in that priority order.
    pub fn from_keywords(keywords: &dyn KeywordSource) -> Result<Self, WcsError> {
        let crpix1 = keywords.get_double("CRPIX1").unwrap_or(0.0);
        let crpix2 = keywords.get_double("CRPIX2").unwrap_or(0.0);

        let has_cd = ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]
            .iter()
            .any(|k| keywords.has(k));
        let has_pc = ["PC1_1", "PC1_2", "PC2_1", "PC2_2"]
            .iter()
            .any(|k| keywords.has(k));

        let matrix = if has_cd {
            [
                [
                    keywords.get_double("CD1_1").unwrap_or(1.0),
                    keywords.get_double("CD1_2").unwrap_or(0.0),
                ],
                [
                    keywords.get_double("CD2_1").unwrap_or(0.0),
                    keywords.get_double("CD2_2").unwrap_or(1.0),
                ],
            ]
        } else if has_pc {
            let cdelt1 = keywords.get_double("CDELT1").unwrap_or(1.0);
            let cdelt2 = keywords.get_double("CDELT2").unwrap_or(1.0);
            let pc11 = keywords.get_double("PC1_1").unwrap_or(1.0);
            let pc12 = keywords.get_double("PC1_2").unwrap_or(0.0);
            let pc21 = keywords.get_double("PC2_1").unwrap_or(0.0);
            let pc22 = keywords.get_double("PC2_2").unwrap_or(1.0);
            [
                [pc11 * cdelt1, pc12 * cdelt1],
                [pc21 * cdelt2, pc22 * cdelt2],
            ]
        } else {
            let cdelt1 = keywords.get_double("CDELT1").unwrap_or(1.0);
            let cdelt2 = keywords.get_double("CDELT2").unwrap_or(1.0);
            let crota2 = keywords
                .get_double("CROTA2")
                .unwrap_or(0.0)
                .to_radians();
            let (sin_r, cos_r) = crota2.sin_cos();
            [
                [cdelt1 * cos_r, -cdelt2 * sin_r],
                [cdelt1 * sin_r, cdelt2 * cos_r],
            ]
        };

        Self::new(matrix, [crpix1, crpix2])
    }

    /// Builds a [`LinearTransform`] directly from a matrix and reference pixel.
    pub fn new(matrix: [[f64; 2]; 2], crpix: [f64; 2]) -> Result<Self, WcsError> {
        let det = matrix[0][0] * matrix[1][1] - matrix[0][1] * matrix[1][0];
        if det.abs() < 1e-300 {
            return Err(WcsError::Math {
                reason: "linear transform matrix is singular".to_string(),
            });
        }
        let inv_det = 1.0 / det;
        let inverse = [
            [matrix[1][1] * inv_det, -matrix[0][1] * inv_det],
            [-matrix[1][0] * inv_det, matrix[0][0] * inv_det],
        ];
        Ok(Self {
            matrix,
            inverse,
            crpix,
        })
    }

    /// Maps a 1-based pixel coordinate to intermediate world coordinates (degrees).
    pub fn pixel_to_intermediate(&self, i: f64, j: f64) -> (f64, f64) {
        let di = i - self.crpix[0];
        let dj = j - self.crpix[1];
        let x = self.matrix[0][0] * di + self.matrix[0][1] * dj;
        let y = self.matrix[1][0] * di + self.matrix[1][1] * dj;
        (x, y)
    }

    /// Maps intermediate world coordinates (degrees) back to a 1-based pixel coordinate.
    pub fn intermediate_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let i = self.inverse[0][0] * x + self.inverse[0][1] * y + self.crpix[0];
        let j = self.inverse[1][0] * x + self.inverse[1][1] * y + self.crpix[1];
        (i, j)
    }

    /// The reference pixel `(CRPIX1, CRPIX2)`.
    pub fn crpix(&self) -> (f64, f64) {
        (self.crpix[0], self.crpix[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wcs::keywords::WcsKeywords;

    #[test]
    fn roundtrip_identity() {
        let t = LinearTransform::new([[1.0, 0.0], [0.0, 1.0]], [0.0, 0.0]).unwrap();
        let (x, y) = t.pixel_to_intermediate(5.0, 7.0);
        assert_eq!((x, y), (5.0, 7.0));
        assert_eq!(t.intermediate_to_pixel(x, y), (5.0, 7.0));
    }

    #[test]
    fn singular_matrix_is_error() {
        let err = LinearTransform::new([[1.0, 2.0], [2.0, 4.0]], [0.0, 0.0]);
        assert!(err.is_err());
    }

    #[test]
    fn cd_takes_priority_over_pc_and_cdelt() {
        let mut kw = WcsKeywords::new();
        kw.set_double("CRPIX1", 1.0);
        kw.set_double("CRPIX2", 1.0);
        kw.set_double("CD1_1", 2.0);
        kw.set_double("CD1_2", 0.0);
        kw.set_double("CD2_1", 0.0);
        kw.set_double("CD2_2", 2.0);
        kw.set_double("CDELT1", -0.5);
        kw.set_double("CDELT2", 0.5);

        let t = LinearTransform::from_keywords(&kw).unwrap();
        assert_eq!(t.pixel_to_intermediate(2.0, 1.0), (2.0, 0.0));
    }

    #[test]
    fn cdelt_crota_builds_rotation() {
        let mut kw = WcsKeywords::new();
        kw.set_double("CRPIX1", 1.0);
        kw.set_double("CRPIX2", 1.0);
        kw.set_double("CDELT1", 1.0);
        kw.set_double("CDELT2", 1.0);
        kw.set_double("CROTA2", 0.0);

        let t = LinearTransform::from_keywords(&kw).unwrap();
        assert_eq!(t.pixel_to_intermediate(2.0, 1.0), (1.0, 0.0));
    }
}
