//! von Kries chromatic adaptation
//!
//! Scales cone-space responses by the ratio of destination to source white.
//! The cone space is selectable; CAT02 is the default.

use super::math::{self, Mat3};
use super::space::Illuminant;

/// Cone response matrices for the von Kries transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConeSpace {
    /// CIECAM02 transform.
    #[default]
    Cat02,
    /// Bradford transform (ICC profiles).
    Bradford,
    /// Hunt-Pointer-Estevez, the classic von Kries cone space.
    HuntPointerEstevez,
}

impl ConeSpace {
    fn matrix(self) -> Mat3 {
        match self {
            ConeSpace::Cat02 => [
                [0.7328, 0.4296, -0.1624],
                [-0.7036, 1.6975, 0.0061],
                [0.0030, 0.0136, 0.9834],
            ],
            ConeSpace::Bradford => [
                [0.8951, 0.2664, -0.1614],
                [-0.7502, 1.7135, 0.0367],
                [0.0389, -0.0685, 1.0296],
            ],
            ConeSpace::HuntPointerEstevez => [
                [0.40024, 0.70760, -0.08081],
                [-0.22630, 1.16532, 0.04570],
                [0.0, 0.0, 0.91822],
            ],
        }
    }
}

/// Precomputed XYZ→XYZ adaptation between two white points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptation {
    matrix: Mat3,
}

impl Adaptation {
    /// Build the transform from `source` white to `target` white.
    ///
    /// Identical whites produce the identity.
    pub fn new(source: Illuminant, target: Illuminant, cones: ConeSpace) -> Self {
        if source == target {
            return Self {
                matrix: math::diag([1.0, 1.0, 1.0]),
            };
        }
        let m = cones.matrix();
        // Every cone matrix above is invertible, so this only falls back
        // to the identity if a table entry is corrupted.
        let Some(m_inv) = math::invert(&m) else {
            return Self {
                matrix: math::diag([1.0, 1.0, 1.0]),
            };
        };
        let src = math::mul_vec(&m, source.white_xyz());
        let dst = math::mul_vec(&m, target.white_xyz());
        let gain = math::diag([dst[0] / src[0], dst[1] / src[1], dst[2] / src[2]]);
        Self {
            matrix: math::mul(&m_inv, &math::mul(&gain, &m)),
        }
    }

    /// Adapt one XYZ triple.
    #[inline]
    pub fn apply(&self, xyz: [f64; 3]) -> [f64; 3] {
        math::mul_vec(&self.matrix, xyz)
    }
}
