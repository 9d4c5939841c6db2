//! CIE XYZ, xyY and CIELAB
//!
//! Tristimulus values are normalized so that the reference white has Y = 1.
//! Lab values use the usual 0..100 lightness scale.

/// CIE 1976 L*a*b* color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, 0 (black) to 100 (reference white)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    /// Create a Lab color.
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Components narrowed to `f32`, the precision used for the bulk cube.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.l as f32, self.a as f32, self.b as f32]
    }

    /// True when no component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Chroma C*ab.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Build from lightness, chroma and hue angle in degrees.
    pub fn from_lch(l: f64, c: f64, h_deg: f64) -> Self {
        let h = h_deg.to_radians();
        Self::new(l, c * h.cos(), c * h.sin())
    }
}

// CIE constants in their exact rational form.
const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let t = f * f * f;
    if t > EPSILON {
        t
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}

/// XYZ → Lab relative to the given white.
pub fn xyz_to_lab(xyz: [f64; 3], white: [f64; 3]) -> Lab {
    let fx = lab_f(xyz[0] / white[0]);
    let fy = lab_f(xyz[1] / white[1]);
    let fz = lab_f(xyz[2] / white[2]);
    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Lab → XYZ relative to the given white.
pub fn lab_to_xyz(lab: Lab, white: [f64; 3]) -> [f64; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    [
        white[0] * lab_f_inv(fx),
        white[1] * lab_f_inv(fy),
        white[2] * lab_f_inv(fz),
    ]
}

/// xyY → XYZ. A zero `y` yields black.
pub fn xyy_to_xyz(xyy: [f64; 3]) -> [f64; 3] {
    let [x, y, big_y] = xyy;
    if y == 0.0 {
        return [0.0, 0.0, 0.0];
    }
    [x * big_y / y, big_y, (1.0 - x - y) * big_y / y]
}

/// XYZ → xyY. Black keeps the chromaticity of `white_xy`.
pub fn xyz_to_xyy(xyz: [f64; 3], white_xy: [f64; 2]) -> [f64; 3] {
    let sum = xyz[0] + xyz[1] + xyz[2];
    if sum == 0.0 {
        return [white_xy[0], white_xy[1], 0.0];
    }
    [xyz[0] / sum, xyz[1] / sum, xyz[1]]
}
