//! 8-bit device RGB colors
//!
//! Every cell of the device color cube is addressed by an [`Rgb8`]. The
//! channel values are gamma-encoded according to whatever working space the
//! cube is interpreted in.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// A gamma-encoded 8-bit device color, one cell of the RGB cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb8 {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb8 {
    /// Create a device color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a device color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize encoded unit-range channel values to 8 bits.
    ///
    /// Values are clipped to 0.0..=1.0 and then truncated, so 0.999 maps to
    /// 254 rather than 255. NaN channels become 0.
    ///
    /// # Example
    /// ```
    /// use color_terms::Rgb8;
    /// assert_eq!(Rgb8::quantize([1.0, 0.5, -0.2]), Rgb8::new(255, 127, 0));
    /// ```
    pub fn quantize(rgb: [f64; 3]) -> Self {
        let channel = |v: f64| {
            if v.is_nan() {
                0
            } else {
                (v.clamp(0.0, 1.0) * 255.0) as u8
            }
        };
        Self::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    /// Channels as encoded unit-range values.
    #[inline]
    pub fn to_unit(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Flat index of this color in a 256-level cube (`r * 65536 + g * 256 + b`).
    #[inline]
    pub fn cube_index(self) -> usize {
        (self.r as usize) << 16 | (self.g as usize) << 8 | self.b as usize
    }

    /// Uppercase six digit hex form without a leading hash, e.g. `FF8000`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = ParseColorError;

    /// Parse a device color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    ///
    /// ```
    /// use color_terms::Rgb8;
    ///
    /// let orange: Rgb8 = "#E87D53".parse().unwrap();
    /// assert_eq!(orange, Rgb8::new(0xE8, 0x7D, 0x53));
    /// let red: Rgb8 = "f00".parse().unwrap();
    /// assert_eq!(red, Rgb8::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
