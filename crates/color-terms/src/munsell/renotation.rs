//! Munsell notation → CIE xyY under illuminant C
//!
//! An analytic model of the renotation:
//!
//! - value → luminance via the ASTM D1535 fifth-order polynomial
//! - hue → CIELAB hue angle, piecewise linear between the 5-step anchors of
//!   each family
//! - chroma → CIELAB chroma, linear in Munsell chroma
//!
//! The Lab color is formed against the illuminant C white and converted to
//! xyY, still relative to C. The color space adapter takes it from there.
//!
//! [`MunsellModel`] chooses between this model and measured renotation
//! data loaded into a [`RenotationTable`].

use std::sync::Arc;

use super::notation::MunsellColor;
use super::renotation_table::RenotationTable;
use crate::error::ColorTermsError;
use crate::color::{lab_to_xyz, xyz_to_lab, xyz_to_xyy, ColorCoordinate, ColorSpace, Illuminant, Lab};

/// CIELAB chroma per unit of Munsell chroma.
pub const CHROMA_SCALE: f64 = 5.0;

/// Lab hue angle (degrees) at the 5-step of each family, R through RP.
const HUE_ANCHORS: [f64; 10] = [24.0, 60.0, 90.0, 115.0, 160.0, 195.0, 235.0, 280.0, 318.0, 352.0];

/// Relative luminance of a Munsell value (ASTM D1535), 1.0 at value 10.
pub fn luminance(value: f64) -> f64 {
    let v = value;
    let y = 1.1914 * v - 0.22533 * v.powi(2) + 0.23352 * v.powi(3) - 0.020484 * v.powi(4)
        + 0.000_819_39 * v.powi(5);
    y / 100.0
}

/// Lab hue angle in degrees for a position on the 0..=100 hue circle.
pub fn hue_angle(hue_number: f64) -> f64 {
    let h = hue_number.rem_euclid(100.0);
    // Anchors sit at 5, 15, .. 95; wrap once on either side.
    let segment = ((h - 5.0) / 10.0).floor();
    let lower_idx = segment as i64;
    let anchor = |i: i64| {
        let wrapped = i.rem_euclid(10) as usize;
        let turns = i.div_euclid(10) as f64;
        HUE_ANCHORS[wrapped] + 360.0 * turns
    };
    let lower = anchor(lower_idx);
    let mut upper = anchor(lower_idx + 1);
    if upper < lower {
        upper += 360.0;
    }
    let t = (h - (lower_idx as f64 * 10.0 + 5.0)) / 10.0;
    (lower + t * (upper - lower)).rem_euclid(360.0)
}

/// Lab relative to illuminant C for a notation.
pub fn to_lab_c(color: &MunsellColor) -> Lab {
    let y = luminance(color.value());
    let l = xyz_to_lab([y, y, y], [1.0, 1.0, 1.0]).l;
    match *color {
        MunsellColor::Neutral { .. } => Lab::new(l, 0.0, 0.0),
        MunsellColor::Chromatic { hue, chroma, .. } => {
            Lab::from_lch(l, chroma * CHROMA_SCALE, hue_angle(hue.hue_number()))
        }
    }
}

/// CIE xyY of a notation, relative to illuminant C.
pub fn to_xyy(color: &MunsellColor) -> [f64; 3] {
    let white = Illuminant::C;
    let xyz = lab_to_xyz(to_lab_c(color), white.white_xyz());
    xyz_to_xyy(xyz, white.xy())
}

/// Tagged coordinate ready for the color space adapter.
pub fn to_coordinate(color: &MunsellColor) -> ColorCoordinate {
    ColorCoordinate::new(ColorSpace::XyY(Illuminant::C), to_xyy(color))
}

/// Where Munsell coordinates come from.
#[derive(Debug, Clone, Default)]
pub enum MunsellModel {
    /// The closed-form model above; defined for every notation
    #[default]
    Analytic,
    /// Interpolated renotation data; undefined outside the table
    Renotation(Arc<RenotationTable>),
}

impl MunsellModel {
    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            MunsellModel::Analytic => "analytic",
            MunsellModel::Renotation(_) => "renotation",
        }
    }

    /// CIE xyY of a notation, relative to illuminant C.
    pub fn to_xyy(&self, color: &MunsellColor) -> Result<[f64; 3], ColorTermsError> {
        match self {
            MunsellModel::Analytic => Ok(to_xyy(color)),
            MunsellModel::Renotation(table) => table.to_xyy(color),
        }
    }

    /// Tagged coordinate ready for the color space adapter.
    ///
    /// # Errors
    ///
    /// [`ColorTermsError::UnresolvableNotation`] when a renotation table
    /// has no samples around the notation.
    pub fn to_coordinate(&self, color: &MunsellColor) -> Result<ColorCoordinate, ColorTermsError> {
        self.to_xyy(color)
            .map(|xyy| ColorCoordinate::new(ColorSpace::XyY(Illuminant::C), xyy))
    }
}

impl From<RenotationTable> for MunsellModel {
    fn from(table: RenotationTable) -> Self {
        MunsellModel::Renotation(Arc::new(table))
    }
}
