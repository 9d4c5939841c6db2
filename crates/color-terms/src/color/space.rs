//! RGB working space definitions
//!
//! A working space is defined by three primaries, a white point and a
//! transfer function. The RGB→XYZ matrix is derived from the chromaticities
//! rather than hard-coded so every space goes through the same path.

use std::fmt;
use std::str::FromStr;

use super::math::{self, Mat3};
use crate::error::ColorTermsError;

/// CIE 1931 2° standard illuminants used by the supported spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Illuminant {
    /// Illuminant C, the reference for the Munsell renotation data.
    C,
    /// D50, the reference for ProPhoto RGB.
    D50,
    /// D65, the reference for sRGB and most display spaces.
    D65,
}

impl Illuminant {
    /// Chromaticity coordinates (x, y).
    pub const fn xy(self) -> [f64; 2] {
        match self {
            Illuminant::C => [0.31006, 0.31616],
            Illuminant::D50 => [0.3457, 0.3585],
            Illuminant::D65 => [0.3127, 0.3290],
        }
    }

    /// Tristimulus values of the white point normalized to Y = 1.
    pub fn white_xyz(self) -> [f64; 3] {
        let [x, y] = self.xy();
        [x / y, 1.0, (1.0 - x - y) / y]
    }
}

/// Opto-electronic transfer functions of the supported spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    /// IEC 61966-2-1 piecewise curve (sRGB, Display P3).
    Srgb,
    /// Pure power law with the given exponent (Adobe RGB uses 563/256).
    Gamma(f64),
    /// ITU-R BT.2020 camera curve.
    Rec2020,
    /// ROMM RGB curve (ProPhoto).
    Romm,
}

const REC2020_ALPHA: f64 = 1.099_296_826_809_44;
const REC2020_BETA: f64 = 0.018_053_968_510_807;

impl TransferFunction {
    /// Encoded value → linear light.
    pub fn decode(self, v: f64) -> f64 {
        match self {
            TransferFunction::Srgb => {
                if v <= 0.04045 {
                    v / 12.92
                } else {
                    ((v + 0.055) / 1.055).powf(2.4)
                }
            }
            TransferFunction::Gamma(gamma) => v.signum() * v.abs().powf(gamma),
            TransferFunction::Rec2020 => {
                if v < 4.5 * REC2020_BETA {
                    v / 4.5
                } else {
                    ((v + REC2020_ALPHA - 1.0) / REC2020_ALPHA).powf(1.0 / 0.45)
                }
            }
            TransferFunction::Romm => {
                if v < 16.0 / 512.0 {
                    v / 16.0
                } else {
                    v.powf(1.8)
                }
            }
        }
    }

    /// Linear light → encoded value.
    ///
    /// Negative input stays on the linear segment (or is mirrored for the
    /// pure power law), so out-of-gamut colors remain finite.
    pub fn encode(self, l: f64) -> f64 {
        match self {
            TransferFunction::Srgb => {
                if l <= 0.003_130_8 {
                    l * 12.92
                } else {
                    1.055 * l.powf(1.0 / 2.4) - 0.055
                }
            }
            TransferFunction::Gamma(gamma) => l.signum() * l.abs().powf(1.0 / gamma),
            TransferFunction::Rec2020 => {
                if l < REC2020_BETA {
                    4.5 * l
                } else {
                    REC2020_ALPHA * l.powf(0.45) - (REC2020_ALPHA - 1.0)
                }
            }
            TransferFunction::Romm => {
                if l < 1.0 / 512.0 {
                    16.0 * l
                } else {
                    l.powf(1.0 / 1.8)
                }
            }
        }
    }
}

/// Identifier of a built-in working space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceId {
    /// IEC 61966-2-1 sRGB, the default device space.
    Srgb,
    /// Display P3 (DCI-P3 primaries, D65, sRGB curve).
    DisplayP3,
    /// Adobe RGB (1998).
    AdobeRgb,
    /// ITU-R BT.2020.
    Rec2020,
    /// ProPhoto RGB (ROMM).
    ProPhoto,
}

impl SpaceId {
    /// All built-in spaces, default first.
    pub const ALL: [SpaceId; 5] = [
        SpaceId::Srgb,
        SpaceId::DisplayP3,
        SpaceId::AdobeRgb,
        SpaceId::Rec2020,
        SpaceId::ProPhoto,
    ];

    /// Short stable key used in file names and cache headers.
    pub const fn key(self) -> &'static str {
        match self {
            SpaceId::Srgb => "srgb",
            SpaceId::DisplayP3 => "display-p3",
            SpaceId::AdobeRgb => "adobe-rgb",
            SpaceId::Rec2020 => "rec2020",
            SpaceId::ProPhoto => "prophoto",
        }
    }
}

impl FromStr for SpaceId {
    type Err = ColorTermsError;

    /// Names are matched case-insensitively, ignoring `-`, `_` and spaces,
    /// so `sRGB`, `Display P3` and `adobe_rgb` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "srgb" => Ok(SpaceId::Srgb),
            "displayp3" | "p3" => Ok(SpaceId::DisplayP3),
            "adobergb" | "adobergb1998" => Ok(SpaceId::AdobeRgb),
            "rec2020" | "bt2020" => Ok(SpaceId::Rec2020),
            "prophoto" | "prophotorgb" | "romm" => Ok(SpaceId::ProPhoto),
            _ => Err(ColorTermsError::UnsupportedColorSpace(s.to_string())),
        }
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A fully resolved RGB working space.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSpace {
    id: SpaceId,
    white: Illuminant,
    transfer: TransferFunction,
    rgb_to_xyz: Mat3,
    xyz_to_rgb: Mat3,
}

impl WorkingSpace {
    /// Resolve a working space by name.
    ///
    /// # Errors
    ///
    /// Returns [`ColorTermsError::UnsupportedColorSpace`] for unknown names.
    ///
    /// ```
    /// use color_terms::WorkingSpace;
    ///
    /// let space = WorkingSpace::from_name("sRGB").unwrap();
    /// assert_eq!(space.key(), "srgb");
    /// assert!(WorkingSpace::from_name("cmyk").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self, ColorTermsError> {
        Self::new(name.parse()?)
    }

    /// Build one of the built-in spaces.
    pub fn new(id: SpaceId) -> Result<Self, ColorTermsError> {
        let (primaries, white, transfer) = match id {
            SpaceId::Srgb => (
                [[0.64, 0.33], [0.30, 0.60], [0.15, 0.06]],
                Illuminant::D65,
                TransferFunction::Srgb,
            ),
            SpaceId::DisplayP3 => (
                [[0.680, 0.320], [0.265, 0.690], [0.150, 0.060]],
                Illuminant::D65,
                TransferFunction::Srgb,
            ),
            SpaceId::AdobeRgb => (
                [[0.64, 0.33], [0.21, 0.71], [0.15, 0.06]],
                Illuminant::D65,
                TransferFunction::Gamma(563.0 / 256.0),
            ),
            SpaceId::Rec2020 => (
                [[0.708, 0.292], [0.170, 0.797], [0.131, 0.046]],
                Illuminant::D65,
                TransferFunction::Rec2020,
            ),
            SpaceId::ProPhoto => (
                [[0.7347, 0.2653], [0.1596, 0.8404], [0.0366, 0.0001]],
                Illuminant::D50,
                TransferFunction::Romm,
            ),
        };

        let rgb_to_xyz = derive_rgb_to_xyz(primaries, white)
            .ok_or_else(|| ColorTermsError::UnsupportedColorSpace(id.key().to_string()))?;
        let xyz_to_rgb = math::invert(&rgb_to_xyz)
            .ok_or_else(|| ColorTermsError::UnsupportedColorSpace(id.key().to_string()))?;

        Ok(Self {
            id,
            white,
            transfer,
            rgb_to_xyz,
            xyz_to_rgb,
        })
    }

    /// The default device space.
    pub fn srgb() -> Self {
        // sRGB primaries are well-conditioned; derivation cannot fail.
        match Self::new(SpaceId::Srgb) {
            Ok(space) => space,
            Err(_) => unreachable!("sRGB matrix is invertible"),
        }
    }

    /// Identifier of this space.
    #[inline]
    pub fn id(&self) -> SpaceId {
        self.id
    }

    /// Stable key for file names and cache headers.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.id.key()
    }

    /// Reference white of the space (and of its Lab values).
    #[inline]
    pub fn white(&self) -> Illuminant {
        self.white
    }

    /// Transfer function of the space.
    #[inline]
    pub fn transfer(&self) -> TransferFunction {
        self.transfer
    }

    /// Linear RGB → XYZ matrix.
    #[inline]
    pub fn rgb_to_xyz(&self) -> &Mat3 {
        &self.rgb_to_xyz
    }

    /// XYZ → linear RGB matrix.
    #[inline]
    pub fn xyz_to_rgb(&self) -> &Mat3 {
        &self.xyz_to_rgb
    }

    /// Linear-light value of every 8-bit code, for bulk cube conversion.
    pub fn decode_table(&self) -> [f64; 256] {
        let mut table = [0.0; 256];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = self.transfer.decode(code as f64 / 255.0);
        }
        table
    }
}

/// Standard derivation: scale the primaries' XYZ columns so that RGB (1,1,1)
/// maps onto the white point.
fn derive_rgb_to_xyz(primaries: [[f64; 2]; 3], white: Illuminant) -> Option<Mat3> {
    let column = |[x, y]: [f64; 2]| [x / y, 1.0, (1.0 - x - y) / y];
    let [r, g, b] = primaries.map(column);
    let p = [[r[0], g[0], b[0]], [r[1], g[1], b[1]], [r[2], g[2], b[2]]];
    let s = math::mul_vec(&math::invert(&p)?, white.white_xyz());
    Some(math::mul(&p, &math::diag(s)))
}
