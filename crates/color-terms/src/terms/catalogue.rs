//! The category catalogue classified against
//!
//! Entries are Lab samples tagged with a category index. Categories are
//! indexed with the term set's display terms first, in declared order,
//! followed by any other term in the order it is first met among the
//! entries. Palette and report rely on this order.

use super::assign::CategoryAssignment;
use super::term::Term;
use super::term_set::TermSet;
use crate::color::{from_device_cube, Lab, Rgb8, WorkingSpace};
use crate::error::ColorTermsError;
use crate::munsell::{ReferenceGrid, GRID_COLUMNS, GRID_ROWS};

/// Largest number of categories a catalogue may hold.
pub const MAX_CATEGORIES: usize = 32;

/// A category with its display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    /// Basic color term
    pub term: Term,
    /// Color used to paint the category
    pub display: Rgb8,
}

/// One reference sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogueEntry {
    /// Perceptual coordinate in the working space
    pub lab: Lab,
    /// Index into the catalogue's categories
    pub category: u8,
    /// Device color the sample came from, if any
    pub rgb: Option<Rgb8>,
}

/// Reference samples plus the category table they index into.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCatalogue {
    categories: Vec<Category>,
    entries: Vec<CatalogueEntry>,
}

impl CategoryCatalogue {
    /// Catalogue from explicit categories and entries.
    ///
    /// Fails if there are no entries, more than [`MAX_CATEGORIES`]
    /// categories, an entry points past the category table, or a
    /// coordinate is not finite.
    pub fn new(
        categories: Vec<Category>,
        entries: Vec<CatalogueEntry>,
    ) -> Result<Self, ColorTermsError> {
        if entries.is_empty() || categories.is_empty() {
            return Err(ColorTermsError::EmptyCatalogue);
        }
        if categories.len() > MAX_CATEGORIES {
            return Err(ColorTermsError::TooManyCategories(categories.len()));
        }
        for (index, entry) in entries.iter().enumerate() {
            if !entry.lab.is_finite() {
                return Err(ColorTermsError::NonFiniteColor { index });
            }
            if entry.category as usize >= categories.len() {
                return Err(ColorTermsError::UnknownCategory(format!(
                    "category index {}",
                    entry.category
                )));
            }
        }
        Ok(Self {
            categories,
            entries,
        })
    }

    /// One entry per term at the given Lab coordinate, in order.
    ///
    /// Display colors are the terms' defaults.
    ///
    /// ```
    /// use color_terms::{CategoryCatalogue, Lab, Term};
    ///
    /// let catalogue = CategoryCatalogue::from_lab(&[
    ///     (Term::Red, Lab::new(53.0, 80.0, 67.0)),
    ///     (Term::Green, Lab::new(88.0, -86.0, 83.0)),
    /// ])
    /// .unwrap();
    /// assert_eq!(catalogue.categories().len(), 2);
    /// ```
    pub fn from_lab(samples: &[(Term, Lab)]) -> Result<Self, ColorTermsError> {
        let mut categories: Vec<Category> = Vec::new();
        let mut entries = Vec::with_capacity(samples.len());
        for &(term, lab) in samples {
            let category = index_of(&mut categories, term, || term.default_display())?;
            entries.push(CatalogueEntry {
                lab,
                category,
                rgb: None,
            });
        }
        Self::new(categories, entries)
    }

    /// Catalogue for a term set from an assigned reference grid.
    ///
    /// Samples are collected as bootstrap colors, then neutrals, then the
    /// chromatic grid row by row (gaps skipped). A device color that occurs
    /// more than once keeps its first position and takes the category of
    /// its last occurrence.
    pub fn build(
        terms: &TermSet,
        grid: &ReferenceGrid,
        assignment: &CategoryAssignment,
        space: &WorkingSpace,
    ) -> Result<Self, ColorTermsError> {
        let mut samples: Vec<(Rgb8, Term)> = Vec::new();
        let mut insert = |rgb: Rgb8, term: Term| {
            match samples.iter_mut().find(|(seen, _)| *seen == rgb) {
                Some(existing) => existing.1 = term,
                None => samples.push((rgb, term)),
            }
        };

        for &(rgb, term) in terms.bootstrap() {
            insert(rgb, term);
        }
        for (cell, &term) in grid.neutrals().iter().zip(assignment.neutrals()) {
            insert(cell.rgb, term);
        }
        for row in 0..GRID_ROWS {
            for column in 0..GRID_COLUMNS {
                if let Some(cell) = grid.cell(row, column) {
                    insert(cell.rgb, assignment.cell(row, column));
                }
            }
        }

        let mut categories: Vec<Category> = terms
            .display()
            .iter()
            .map(|&(term, display)| Category { term, display })
            .collect();
        let mut entries = Vec::with_capacity(samples.len());
        for (rgb, term) in samples {
            let category = index_of(&mut categories, term, || terms.display_color(term))?;
            entries.push(CatalogueEntry {
                lab: from_device_cube(rgb, space),
                category,
                rgb: Some(rgb),
            });
        }
        Self::new(categories, entries)
    }

    /// Categories in index order.
    #[inline]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Reference samples.
    #[inline]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    /// Index of `term`, if the catalogue has it.
    pub fn index_of(&self, term: Term) -> Option<u8> {
        self.categories
            .iter()
            .position(|c| c.term == term)
            .map(|i| i as u8)
    }

    /// Category at `index`.
    #[inline]
    pub fn category(&self, index: u8) -> Option<&Category> {
        self.categories.get(index as usize)
    }

    /// Display colors in index order, flattened to RGB bytes.
    pub fn palette(&self) -> Vec<u8> {
        self.categories
            .iter()
            .flat_map(|c| c.display.to_bytes())
            .collect()
    }
}

fn index_of(
    categories: &mut Vec<Category>,
    term: Term,
    display: impl FnOnce() -> Rgb8,
) -> Result<u8, ColorTermsError> {
    if let Some(index) = categories.iter().position(|c| c.term == term) {
        return Ok(index as u8);
    }
    if categories.len() >= MAX_CATEGORIES {
        return Err(ColorTermsError::TooManyCategories(categories.len() + 1));
    }
    categories.push(Category {
        term,
        display: display(),
    });
    Ok((categories.len() - 1) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::munsell::{ChromaPolicy, GridOptions};
    use crate::terms::{assign_categories, AssignmentOptions, ConfidenceGrid};

    fn srgb_grid() -> ReferenceGrid {
        ReferenceGrid::build(
            &WorkingSpace::srgb(),
            &GridOptions::new().chroma_policy(ChromaPolicy::Table),
        )
    }

    #[test]
    fn test_display_terms_indexed_first() {
        let grid = srgb_grid();
        let assignment = assign_categories(&[], &AssignmentOptions::new());
        let catalogue =
            CategoryCatalogue::build(&TermSet::bct11(), &grid, &assignment, &WorkingSpace::srgb())
                .unwrap();
        let terms: Vec<Term> = catalogue.categories().iter().map(|c| c.term).collect();
        assert_eq!(terms.len(), 11);
        assert_eq!(terms[0], Term::Black);
        assert_eq!(terms[10], Term::White);
        assert_eq!(catalogue.palette().len(), 33);
    }

    #[test]
    fn test_extra_terms_appended() {
        let grid = srgb_grid();
        let grids = [ConfidenceGrid::new(
            Term::Teal,
            [[0.9; GRID_COLUMNS]; GRID_ROWS],
        )];
        let assignment = assign_categories(&grids, &AssignmentOptions::new());
        let catalogue =
            CategoryCatalogue::build(&TermSet::bct11(), &grid, &assignment, &WorkingSpace::srgb())
                .unwrap();
        assert_eq!(catalogue.index_of(Term::Teal), Some(11));
        assert_eq!(
            catalogue.category(11).unwrap().display,
            Term::Teal.default_display()
        );
    }

    #[test]
    fn test_duplicate_device_color_last_category_wins() {
        let grid = srgb_grid();
        let assignment = assign_categories(&[], &AssignmentOptions::new());
        let catalogue =
            CategoryCatalogue::build(&TermSet::bct20(), &grid, &assignment, &WorkingSpace::srgb())
                .unwrap();
        let mut seen: Vec<Rgb8> = catalogue.entries().iter().filter_map(|e| e.rgb).collect();
        let total = seen.len();
        seen.sort_by_key(|rgb| rgb.cube_index());
        seen.dedup();
        assert_eq!(seen.len(), total, "device colors are unique");
        // The bootstrap white is first and stays white.
        let first = catalogue.entries()[0];
        assert_eq!(first.rgb, Some(Rgb8::new(255, 255, 255)));
        assert_eq!(catalogue.index_of(Term::White), Some(first.category));
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert_eq!(
            CategoryCatalogue::from_lab(&[]),
            Err(ColorTermsError::EmptyCatalogue)
        );
        let categories = vec![
            Category {
                term: Term::Red,
                display: Rgb8::new(255, 0, 0),
            };
            MAX_CATEGORIES + 1
        ];
        let entries = vec![CatalogueEntry {
            lab: Lab::new(50.0, 0.0, 0.0),
            category: 0,
            rgb: None,
        }];
        assert_eq!(
            CategoryCatalogue::new(categories, entries),
            Err(ColorTermsError::TooManyCategories(MAX_CATEGORIES + 1))
        );
    }

    #[test]
    fn test_rejects_non_finite_entry() {
        let result = CategoryCatalogue::from_lab(&[
            (Term::Red, Lab::new(53.0, 80.0, 67.0)),
            (Term::Blue, Lab::new(f64::NAN, 0.0, 0.0)),
        ]);
        assert_eq!(result, Err(ColorTermsError::NonFiniteColor { index: 1 }));
    }
}
