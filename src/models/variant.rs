use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use color_terms::{SpaceId, TermSet};
use serde::{Deserialize, Serialize};

/// A term map to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 20 basic color terms (chart: Figure 9 of the lexicon study)
    Bct20,
    /// 11 basic color terms (chart: Figure 5)
    Bct11,
}

impl Variant {
    /// Generation order
    pub const ALL: [Variant; 2] = [Variant::Bct20, Variant::Bct11];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Bct20 => "bct20",
            Variant::Bct11 => "bct11",
        }
    }

    /// Term vocabulary with display colors and bootstrap samples
    pub fn term_set(self) -> TermSet {
        match self {
            Variant::Bct20 => TermSet::bct20(),
            Variant::Bct11 => TermSet::bct11(),
        }
    }

    /// Chart image looked up in the working directory when none is configured
    pub fn default_chart(self) -> PathBuf {
        PathBuf::from(match self {
            Variant::Bct20 => "i1534-7362-14-2-17-f09.jpeg",
            Variant::Bct11 => "m_i1534-7362-14-2-17-f05.jpeg",
        })
    }

    /// Output file stem; non-default working spaces get a suffix
    pub fn basename(self, space: SpaceId) -> String {
        match space {
            SpaceId::Srgb => format!("{}_en_us", self.name()),
            other => format!("{}_en_us_{}", self.name(), other.key()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bct20" | "20" => Ok(Variant::Bct20),
            "bct11" | "11" => Ok(Variant::Bct11),
            other => Err(format!("unknown term map variant: {other}")),
        }
    }
}
