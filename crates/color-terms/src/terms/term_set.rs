//! Term vocabularies
//!
//! A term set fixes which categories are displayed (and in which order they
//! are indexed), their display colors, and the bootstrap samples added at
//! the corners of the device cube.

use super::term::Term;
use crate::color::Rgb8;

/// A named vocabulary of basic color terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSet {
    name: &'static str,
    display: Vec<(Term, Rgb8)>,
    bootstrap: Vec<(Rgb8, Term)>,
}

const fn rgb(hex: u32) -> Rgb8 {
    Rgb8::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl TermSet {
    /// Build a custom term set.
    pub fn new(name: &'static str, display: Vec<(Term, Rgb8)>, bootstrap: Vec<(Rgb8, Term)>) -> Self {
        Self {
            name,
            display,
            bootstrap,
        }
    }

    /// The twenty-term vocabulary.
    pub fn bct20() -> Self {
        Self::new(
            "bct20",
            vec![
                (Term::Black, rgb(0x000000)),
                (Term::Red, rgb(0xFF0000)),
                (Term::Orange, rgb(0xE87D53)),
                (Term::Yellow, rgb(0xFFFF00)),
                (Term::Green, rgb(0x00FF00)),
                (Term::Teal, rgb(0x00FFFF)),
                (Term::Blue, rgb(0x0000FF)),
                (Term::Purple, rgb(0x420063)),
                (Term::Maroon, rgb(0x660029)),
                (Term::Pink, rgb(0xFF7DA8)),
                (Term::Gold, rgb(0xA67700)),
                (Term::Peach, rgb(0xFFB593)),
                (Term::Beige, rgb(0xFFD9AA)),
                (Term::Brown, rgb(0x8F3E00)),
                (Term::Olive, rgb(0x4D4300)),
                (Term::Gray, rgb(0x808080)),
                (Term::Lavender, rgb(0xD5ABEA)),
                (Term::Magenta, rgb(0xFF00FF)),
                (Term::Lime, rgb(0xACD489)),
                (Term::White, rgb(0xFFFFFF)),
            ],
            vec![
                (rgb(0xFFFFFF), Term::White),
                (rgb(0x000000), Term::Black),
                (rgb(0xFF0000), Term::Red),
                (rgb(0x00FF00), Term::Green),
                (rgb(0x0000FF), Term::Blue),
                (rgb(0x00FFFF), Term::Teal),
                (rgb(0xFF00FF), Term::Magenta),
                (rgb(0xFFFF00), Term::Yellow),
            ],
        )
    }

    /// The eleven-term vocabulary.
    pub fn bct11() -> Self {
        Self::new(
            "bct11",
            vec![
                (Term::Black, rgb(0x000000)),
                (Term::Red, rgb(0xFF0000)),
                (Term::Orange, rgb(0xE87D53)),
                (Term::Yellow, rgb(0xFFFF00)),
                (Term::Green, rgb(0x00FF00)),
                (Term::Blue, rgb(0x0000FF)),
                (Term::Purple, rgb(0x420063)),
                (Term::Pink, rgb(0xFF7DA8)),
                (Term::Brown, rgb(0x8F3E00)),
                (Term::Gray, rgb(0x808080)),
                (Term::White, rgb(0xFFFFFF)),
            ],
            vec![
                (rgb(0xFFFFFF), Term::White),
                (rgb(0x000000), Term::Black),
                (rgb(0xFF0000), Term::Red),
                (rgb(0x00FF00), Term::Green),
                (rgb(0x0000FF), Term::Blue),
                (rgb(0xFFFF00), Term::Yellow),
            ],
        )
    }

    /// Look up a built-in set by name (`bct11`, `bct20`).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bct20" => Some(Self::bct20()),
            "bct11" => Some(Self::bct11()),
            _ => None,
        }
    }

    /// Short name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Display terms and colors in index order.
    #[inline]
    pub fn display(&self) -> &[(Term, Rgb8)] {
        &self.display
    }

    /// Cube samples added ahead of the grid.
    #[inline]
    pub fn bootstrap(&self) -> &[(Rgb8, Term)] {
        &self.bootstrap
    }

    /// Display color for `term`, falling back to the term's default.
    pub fn display_color(&self, term: Term) -> Rgb8 {
        self.display
            .iter()
            .find(|(t, _)| *t == term)
            .map(|(_, color)| *color)
            .unwrap_or_else(|| term.default_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sizes() {
        assert_eq!(TermSet::bct20().display().len(), 20);
        assert_eq!(TermSet::bct11().display().len(), 11);
        assert_eq!(TermSet::bct20().bootstrap().len(), 8);
        assert_eq!(TermSet::bct11().bootstrap().len(), 6);
    }

    #[test]
    fn test_display_terms_unique() {
        for set in [TermSet::bct20(), TermSet::bct11()] {
            let mut terms: Vec<Term> = set.display().iter().map(|(t, _)| *t).collect();
            terms.sort();
            terms.dedup();
            assert_eq!(terms.len(), set.display().len(), "{}", set.name());
        }
    }

    #[test]
    fn test_display_color_fallback() {
        let set = TermSet::bct11();
        assert_eq!(set.display_color(Term::Orange), rgb(0xE87D53));
        assert_eq!(set.display_color(Term::Teal), Term::Teal.default_display());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(TermSet::by_name("BCT20").map(|s| s.name()), Some("bct20"));
        assert!(TermSet::by_name("bct3").is_none());
    }
}
