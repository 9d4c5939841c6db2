//! The closed set of basic color terms

use std::fmt;
use std::str::FromStr;

use crate::color::Rgb8;
use crate::error::ColorTermsError;

/// A basic color term.
///
/// Parsing accepts the full English name in any case, `grey` for gray and
/// the two-letter codes `bk` and `gy` used in chart tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Black,
    White,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
    Teal,
    Maroon,
    Gold,
    Peach,
    Beige,
    Lavender,
    Magenta,
    Lime,
    Olive,
}

impl Term {
    /// Every term.
    pub const ALL: [Term; 20] = [
        Term::Black,
        Term::White,
        Term::Gray,
        Term::Red,
        Term::Orange,
        Term::Yellow,
        Term::Green,
        Term::Blue,
        Term::Purple,
        Term::Pink,
        Term::Brown,
        Term::Teal,
        Term::Maroon,
        Term::Gold,
        Term::Peach,
        Term::Beige,
        Term::Lavender,
        Term::Magenta,
        Term::Lime,
        Term::Olive,
    ];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Term::Black => "black",
            Term::White => "white",
            Term::Gray => "gray",
            Term::Red => "red",
            Term::Orange => "orange",
            Term::Yellow => "yellow",
            Term::Green => "green",
            Term::Blue => "blue",
            Term::Purple => "purple",
            Term::Pink => "pink",
            Term::Brown => "brown",
            Term::Teal => "teal",
            Term::Maroon => "maroon",
            Term::Gold => "gold",
            Term::Peach => "peach",
            Term::Beige => "beige",
            Term::Lavender => "lavender",
            Term::Magenta => "magenta",
            Term::Lime => "lime",
            Term::Olive => "olive",
        }
    }

    /// Name with an uppercase first letter, as used in reports.
    pub fn label(self) -> String {
        let name = self.name();
        let mut label = String::with_capacity(name.len());
        label.push_str(&name[..1].to_ascii_uppercase());
        label.push_str(&name[1..]);
        label
    }

    /// Color used to paint the term when a term set does not override it.
    pub const fn default_display(self) -> Rgb8 {
        let [r, g, b] = match self {
            Term::Black => [0x00, 0x00, 0x00],
            Term::White => [0xFF, 0xFF, 0xFF],
            Term::Gray => [0x80, 0x80, 0x80],
            Term::Red => [0xFF, 0x00, 0x00],
            Term::Orange => [0xE8, 0x7D, 0x53],
            Term::Yellow => [0xFF, 0xFF, 0x00],
            Term::Green => [0x00, 0xFF, 0x00],
            Term::Blue => [0x00, 0x00, 0xFF],
            Term::Purple => [0x42, 0x00, 0x63],
            Term::Pink => [0xFF, 0x7D, 0xA8],
            Term::Brown => [0x8F, 0x3E, 0x00],
            Term::Teal => [0x00, 0xFF, 0xFF],
            Term::Maroon => [0x66, 0x00, 0x29],
            Term::Gold => [0xA6, 0x77, 0x00],
            Term::Peach => [0xFF, 0xB5, 0x93],
            Term::Beige => [0xFF, 0xD9, 0xAA],
            Term::Lavender => [0xD5, 0xAB, 0xEA],
            Term::Magenta => [0xFF, 0x00, 0xFF],
            Term::Lime => [0xAC, 0xD4, 0x89],
            Term::Olive => [0x4D, 0x43, 0x00],
        };
        Rgb8::new(r, g, b)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Term {
    type Err = ColorTermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "bk" => return Ok(Term::Black),
            "gy" | "grey" => return Ok(Term::Gray),
            _ => {}
        }
        Term::ALL
            .into_iter()
            .find(|term| term.name() == key)
            .ok_or_else(|| ColorTermsError::UnknownCategory(s.to_string()))
    }
}
