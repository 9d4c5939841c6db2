//! Perceptual color space adapter
//!
//! Pure functions that move tagged [`ColorCoordinate`]s between device RGB,
//! tristimulus space and CIELAB. Tristimulus coordinates carry the
//! illuminant they are relative to; when it differs from the working
//! space's white they are chromatically adapted first.

use super::adapt::{Adaptation, ConeSpace};
use super::lab::{self, Lab};
use super::math;
use super::rgb::Rgb8;
use super::space::{Illuminant, WorkingSpace};

/// Interpretation of a [`ColorCoordinate`]'s components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpace {
    /// Gamma-encoded RGB in the working space, unit range.
    DeviceRgb,
    /// CIE XYZ relative to the given illuminant (white Y = 1).
    Xyz(Illuminant),
    /// CIE xyY relative to the given illuminant.
    XyY(Illuminant),
    /// CIELAB relative to the working space's white.
    Lab,
}

/// A color triple together with the space it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCoordinate {
    space: ColorSpace,
    values: [f64; 3],
}

impl ColorCoordinate {
    /// Tag raw components with their space.
    #[inline]
    pub const fn new(space: ColorSpace, values: [f64; 3]) -> Self {
        Self { space, values }
    }

    /// A device cube color.
    pub fn device(rgb: Rgb8) -> Self {
        Self::new(ColorSpace::DeviceRgb, rgb.to_unit())
    }

    /// A Lab color relative to the working white.
    pub fn lab(lab: Lab) -> Self {
        Self::new(ColorSpace::Lab, lab.to_array())
    }

    /// Space tag.
    #[inline]
    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Raw components.
    #[inline]
    pub fn values(&self) -> [f64; 3] {
        self.values
    }
}

/// Tristimulus values relative to the working white, adapting if needed.
fn to_working_xyz(coord: &ColorCoordinate, space: &WorkingSpace, cones: ConeSpace) -> [f64; 3] {
    match coord.space {
        ColorSpace::DeviceRgb => {
            let curve = space.transfer();
            let linear = coord.values.map(|v| curve.decode(v));
            math::mul_vec(space.rgb_to_xyz(), linear)
        }
        ColorSpace::Xyz(white) => {
            Adaptation::new(white, space.white(), cones).apply(coord.values)
        }
        ColorSpace::XyY(white) => {
            Adaptation::new(white, space.white(), cones).apply(lab::xyy_to_xyz(coord.values))
        }
        ColorSpace::Lab => lab::lab_to_xyz(
            Lab::new(coord.values[0], coord.values[1], coord.values[2]),
            space.white().white_xyz(),
        ),
    }
}

/// Convert any tagged coordinate to Lab in the working space.
///
/// Uses CAT02 for chromatic adaptation; see [`to_perceptual_with`].
pub fn to_perceptual(coord: &ColorCoordinate, space: &WorkingSpace) -> Lab {
    to_perceptual_with(coord, space, ConeSpace::default())
}

/// Convert any tagged coordinate to Lab with an explicit adaptation cone space.
pub fn to_perceptual_with(coord: &ColorCoordinate, space: &WorkingSpace, cones: ConeSpace) -> Lab {
    if let ColorSpace::Lab = coord.space {
        let [l, a, b] = coord.values;
        return Lab::new(l, a, b);
    }
    lab::xyz_to_lab(
        to_working_xyz(coord, space, cones),
        space.white().white_xyz(),
    )
}

/// Lab of one device cube color.
///
/// ```
/// use color_terms::{from_device_cube, Rgb8, WorkingSpace};
///
/// let white = from_device_cube(Rgb8::new(255, 255, 255), &WorkingSpace::srgb());
/// assert!((white.l - 100.0).abs() < 1e-6);
/// ```
pub fn from_device_cube(rgb: Rgb8, space: &WorkingSpace) -> Lab {
    to_perceptual(&ColorCoordinate::device(rgb), space)
}

/// Encoded device RGB of a coordinate, not clipped.
///
/// Out-of-gamut colors produce channels below 0 or above 1; callers decide
/// whether that is acceptable.
pub fn to_device(coord: &ColorCoordinate, space: &WorkingSpace, cones: ConeSpace) -> [f64; 3] {
    if let ColorSpace::DeviceRgb = coord.space {
        return coord.values;
    }
    let xyz = to_working_xyz(coord, space, cones);
    let curve = space.transfer();
    math::mul_vec(space.xyz_to_rgb(), xyz).map(|v| curve.encode(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SpaceId;

    #[test]
    fn test_srgb_primaries_lab() {
        let space = WorkingSpace::srgb();
        let red = from_device_cube(Rgb8::new(255, 0, 0), &space);
        assert!((red.l - 53.24).abs() < 0.1, "red L = {}", red.l);
        assert!((red.a - 80.09).abs() < 0.2, "red a = {}", red.a);
        assert!((red.b - 67.20).abs() < 0.2, "red b = {}", red.b);

        let green = from_device_cube(Rgb8::new(0, 255, 0), &space);
        assert!((green.l - 87.73).abs() < 0.1, "green L = {}", green.l);
        assert!((green.a + 86.18).abs() < 0.2, "green a = {}", green.a);
    }

    #[test]
    fn test_matches_palette_crate() {
        use palette::{FromColor, Lab as PLab, Srgb};

        let space = WorkingSpace::srgb();
        for rgb in [
            Rgb8::new(12, 200, 99),
            Rgb8::new(128, 128, 128),
            Rgb8::new(250, 10, 180),
        ] {
            let ours = from_device_cube(rgb, &space);
            let theirs: PLab = PLab::from_color(Srgb::new(rgb.r, rgb.g, rgb.b).into_format::<f32>());
            // palette's Lab is D65 as well; agreement within matrix rounding.
            assert!((ours.l - theirs.l as f64).abs() < 0.1, "{rgb}: L {ours:?} vs {theirs:?}");
            assert!((ours.a - theirs.a as f64).abs() < 0.3, "{rgb}: a {ours:?} vs {theirs:?}");
            assert!((ours.b - theirs.b as f64).abs() < 0.3, "{rgb}: b {ours:?} vs {theirs:?}");
        }
    }

    #[test]
    fn test_device_round_trip_through_lab() {
        for id in SpaceId::ALL {
            let space = WorkingSpace::new(id).unwrap();
            let rgb = Rgb8::new(40, 150, 220);
            let lab = from_device_cube(rgb, &space);
            let back = to_device(&ColorCoordinate::lab(lab), &space, ConeSpace::Cat02);
            let unit = rgb.to_unit();
            for c in 0..3 {
                assert!((back[c] - unit[c]).abs() < 1e-9, "{id}: {back:?} vs {unit:?}");
            }
        }
    }

    #[test]
    fn test_illuminant_c_white_adapts_to_neutral() {
        let space = WorkingSpace::srgb();
        let c_white = ColorCoordinate::new(
            ColorSpace::XyY(Illuminant::C),
            [Illuminant::C.xy()[0], Illuminant::C.xy()[1], 1.0],
        );
        let lab = to_perceptual(&c_white, &space);
        assert!((lab.l - 100.0).abs() < 1e-6);
        assert!(lab.a.abs() < 1e-6 && lab.b.abs() < 1e-6, "{lab:?}");
    }
}
