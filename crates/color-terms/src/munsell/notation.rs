//! Munsell notation parsing and formatting
//!
//! Accepted forms: `N5.0/`, `N5/`, `5.0 R 6.0/8.0`, `5R 6/8`, `2.5YR 4/6`.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorTermsError;

/// The ten Munsell hue families, in hue-circle order starting at red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HueFamily {
    R,
    YR,
    Y,
    GY,
    G,
    BG,
    B,
    PB,
    P,
    RP,
}

impl HueFamily {
    /// All families in hue-circle order.
    pub const ALL: [HueFamily; 10] = [
        HueFamily::R,
        HueFamily::YR,
        HueFamily::Y,
        HueFamily::GY,
        HueFamily::G,
        HueFamily::BG,
        HueFamily::B,
        HueFamily::PB,
        HueFamily::P,
        HueFamily::RP,
    ];

    /// Position of the family on the hue circle (R = 0 .. RP = 9).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Notation letters.
    pub const fn letters(self) -> &'static str {
        match self {
            HueFamily::R => "R",
            HueFamily::YR => "YR",
            HueFamily::Y => "Y",
            HueFamily::GY => "GY",
            HueFamily::G => "G",
            HueFamily::BG => "BG",
            HueFamily::B => "B",
            HueFamily::PB => "PB",
            HueFamily::P => "P",
            HueFamily::RP => "RP",
        }
    }

    fn from_letters(letters: &str) -> Option<Self> {
        HueFamily::ALL
            .into_iter()
            .find(|family| family.letters().eq_ignore_ascii_case(letters))
    }
}

/// A chromatic Munsell hue, e.g. `7.5 YR`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MunsellHue {
    /// Step within the family, 0 < step <= 10
    pub step: f64,
    /// Hue family
    pub family: HueFamily,
}

impl MunsellHue {
    /// Create a hue.
    pub const fn new(step: f64, family: HueFamily) -> Self {
        Self { step, family }
    }

    /// Position on the 0..100 hue circle (10RP = 100, 2.5R = 2.5).
    pub fn hue_number(self) -> f64 {
        self.family.index() as f64 * 10.0 + self.step
    }
}

impl fmt::Display for MunsellHue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.step, self.family.letters())
    }
}

/// A parsed Munsell color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MunsellColor {
    /// Achromatic `N<value>/`.
    Neutral {
        /// Munsell value, 0..=10
        value: f64,
    },
    /// `<hue> <value>/<chroma>`.
    Chromatic {
        /// Hue
        hue: MunsellHue,
        /// Munsell value, 0..=10
        value: f64,
        /// Munsell chroma, >= 0
        chroma: f64,
    },
}

impl MunsellColor {
    /// Munsell value of either form.
    pub fn value(&self) -> f64 {
        match *self {
            MunsellColor::Neutral { value } | MunsellColor::Chromatic { value, .. } => value,
        }
    }

    /// Same hue and value at a different chroma. Neutrals are unchanged.
    pub fn with_chroma(self, chroma: f64) -> Self {
        match self {
            MunsellColor::Chromatic { hue, value, .. } => MunsellColor::Chromatic {
                hue,
                value,
                chroma,
            },
            neutral => neutral,
        }
    }
}

impl fmt::Display for MunsellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MunsellColor::Neutral { value } => write!(f, "N{:.1}/", value),
            MunsellColor::Chromatic { hue, value, chroma } => {
                write!(f, "{} {:.1}/{:.1}", hue, value, chroma)
            }
        }
    }
}

fn parse_number(s: &str, notation: &str) -> Result<f64, ColorTermsError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ColorTermsError::InvalidNotation(notation.to_string()))
}

impl FromStr for MunsellColor {
    type Err = ColorTermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorTermsError::InvalidNotation(s.to_string());
        let text = s.trim();

        if let Some(rest) = text.strip_prefix('N').or_else(|| text.strip_prefix('n')) {
            let value_part = rest.split('/').next().unwrap_or_default();
            let value = parse_number(value_part, s)?;
            if !(0.0..=10.0).contains(&value) {
                return Err(invalid());
            }
            return Ok(MunsellColor::Neutral { value });
        }

        let (hue, rest) = split_hue(text, s)?;
        let (value_part, chroma_part) = rest.split_once('/').ok_or_else(invalid)?;
        let value = parse_number(value_part, s)?;
        let chroma = parse_number(chroma_part, s)?;

        if !(0.0..=10.0).contains(&value) || chroma < 0.0 {
            return Err(invalid());
        }

        Ok(MunsellColor::Chromatic { hue, value, chroma })
    }
}

/// Leading `<step><family>` of `text` and whatever follows it.
fn split_hue<'a>(text: &'a str, notation: &str) -> Result<(MunsellHue, &'a str), ColorTermsError> {
    let invalid = || ColorTermsError::InvalidNotation(notation.to_string());

    let letters_start = text.find(|c: char| c.is_ascii_alphabetic()).ok_or_else(invalid)?;
    let step = parse_number(&text[..letters_start], notation)?;
    let after_step = &text[letters_start..];
    let letters_end = after_step
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(after_step.len());
    let family = HueFamily::from_letters(&after_step[..letters_end]).ok_or_else(invalid)?;
    if !(step > 0.0 && step <= 10.0) {
        return Err(invalid());
    }
    Ok((MunsellHue::new(step, family), &after_step[letters_end..]))
}

impl FromStr for MunsellHue {
    type Err = ColorTermsError;

    /// Parse a bare hue such as `2.5YR` or `10 RP`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hue, rest) = split_hue(s.trim(), s)?;
        if !rest.trim().is_empty() {
            return Err(ColorTermsError::InvalidNotation(s.to_string()));
        }
        Ok(hue)
    }
}
