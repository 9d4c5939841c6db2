//! Majority-vote category assignment for the reference grid

use super::confidence::ConfidenceGrid;
use super::term::Term;
use crate::munsell::{GRID_COLUMNS, GRID_ROWS, NEUTRAL_COUNT};

/// Rows that carry neutral defaults at each end of the grid.
const EDGE_ROWS: usize = 2;

/// Options for [`assign_categories`].
///
/// # Example
///
/// ```
/// use color_terms::AssignmentOptions;
///
/// let options = AssignmentOptions::new().threshold(0.2).force_edge_rows(true);
/// assert!(options.force_edge_rows);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOptions {
    /// A cell's best confidence must exceed this to win the cell.
    ///
    /// Default: `0.1`
    pub threshold: f64,

    /// Category for a cell whose best confidence does not exceed the
    /// threshold, per row (row 0 = lightest).
    ///
    /// Default: white, gray x6, black
    pub row_defaults: [Term; GRID_ROWS],

    /// Categories of the neutral samples, darkest first.
    ///
    /// Default: black x2, gray x6, white x2
    pub neutral_defaults: [Term; NEUTRAL_COUNT],

    /// Force the two outermost rows at each end to their row default.
    ///
    /// With `true`, rows 0, 1, 6 and 7 take the row default whatever the
    /// confidence grids say. With `false` they are assigned like every
    /// other row.
    ///
    /// Default: `false`
    pub force_edge_rows: bool,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        use Term::{Black, Gray, White};
        Self {
            threshold: 0.1,
            row_defaults: [White, Gray, Gray, Gray, Gray, Gray, Gray, Black],
            neutral_defaults: [Black, Black, Gray, Gray, Gray, Gray, Gray, Gray, White, White],
            force_edge_rows: false,
        }
    }
}

impl AssignmentOptions {
    /// Options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    #[inline]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the per-row defaults.
    #[inline]
    pub fn row_defaults(mut self, defaults: [Term; GRID_ROWS]) -> Self {
        self.row_defaults = defaults;
        self
    }

    /// Set edge row forcing.
    #[inline]
    pub fn force_edge_rows(mut self, enabled: bool) -> Self {
        self.force_edge_rows = enabled;
        self
    }
}

/// A category for every reference sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAssignment {
    cells: [[Term; GRID_COLUMNS]; GRID_ROWS],
    neutrals: [Term; NEUTRAL_COUNT],
    defaulted: usize,
}

impl CategoryAssignment {
    /// Category of chromatic cell (`row`, `column`).
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Term {
        self.cells[row][column]
    }

    /// Chromatic cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[[Term; GRID_COLUMNS]; GRID_ROWS] {
        &self.cells
    }

    /// Categories of the neutral samples, darkest first.
    #[inline]
    pub fn neutrals(&self) -> &[Term; NEUTRAL_COUNT] {
        &self.neutrals
    }

    /// Number of chromatic cells that fell back to their row default.
    #[inline]
    pub fn defaulted(&self) -> usize {
        self.defaulted
    }
}

fn is_edge_row(row: usize) -> bool {
    row < EDGE_ROWS || row >= GRID_ROWS - EDGE_ROWS
}

/// Pick a category for every grid cell.
///
/// Each cell goes to the grid with the highest confidence there, provided
/// it is strictly above the threshold; on equal confidence the grid listed
/// first wins. Every other cell gets its row default.
pub fn assign_categories(grids: &[ConfidenceGrid], options: &AssignmentOptions) -> CategoryAssignment {
    let mut cells = [[Term::Gray; GRID_COLUMNS]; GRID_ROWS];
    let mut defaulted = 0;

    for (row, line) in cells.iter_mut().enumerate() {
        let fallback = options.row_defaults[row];
        let forced = options.force_edge_rows && is_edge_row(row);
        for (column, cell) in line.iter_mut().enumerate() {
            let mut best = options.threshold;
            let mut winner = None;
            if !forced {
                for grid in grids {
                    let confidence = grid.get(row, column);
                    if confidence > best {
                        best = confidence;
                        winner = Some(grid.term());
                    }
                }
            }
            *cell = winner.unwrap_or_else(|| {
                defaulted += 1;
                fallback
            });
        }
    }

    CategoryAssignment {
        cells,
        neutrals: options.neutral_defaults,
        defaulted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(term: Term, value: f64) -> ConfidenceGrid {
        ConfidenceGrid::new(term, [[value; GRID_COLUMNS]; GRID_ROWS])
    }

    #[test]
    fn test_highest_confidence_wins() {
        let grids = [flat(Term::Red, 0.3), flat(Term::Pink, 0.6)];
        let assignment = assign_categories(&grids, &AssignmentOptions::new());
        assert_eq!(assignment.cell(3, 10), Term::Pink);
        assert_eq!(assignment.defaulted(), 0);
    }

    #[test]
    fn test_equal_confidence_keeps_first_grid() {
        let grids = [flat(Term::Olive, 0.5), flat(Term::Gold, 0.5)];
        let assignment = assign_categories(&grids, &AssignmentOptions::new());
        assert_eq!(assignment.cell(4, 4), Term::Olive);
    }

    #[test]
    fn test_threshold_is_strict() {
        let grids = [flat(Term::Blue, 0.1)];
        let assignment = assign_categories(&grids, &AssignmentOptions::new());
        assert_eq!(assignment.cell(0, 0), Term::White);
        assert_eq!(assignment.cell(3, 0), Term::Gray);
        assert_eq!(assignment.cell(7, 0), Term::Black);
        assert_eq!(assignment.defaulted(), GRID_ROWS * GRID_COLUMNS);
    }

    #[test]
    fn test_forced_edge_rows() {
        let grids = [flat(Term::Blue, 0.9)];
        let options = AssignmentOptions::new().force_edge_rows(true);
        let assignment = assign_categories(&grids, &options);
        assert_eq!(assignment.cell(0, 5), Term::White);
        assert_eq!(assignment.cell(1, 5), Term::Gray);
        assert_eq!(assignment.cell(2, 5), Term::Blue);
        assert_eq!(assignment.cell(5, 5), Term::Blue);
        assert_eq!(assignment.cell(6, 5), Term::Gray);
        assert_eq!(assignment.cell(7, 5), Term::Black);

        // Unforced, the same confident edge cells keep their term.
        let assignment = assign_categories(&grids, &AssignmentOptions::new());
        for row in [0, 1, 6, 7] {
            assert_eq!(assignment.cell(row, 5), Term::Blue, "row {row}");
        }
    }

    #[test]
    fn test_neutral_defaults() {
        let assignment = assign_categories(&[], &AssignmentOptions::new());
        assert_eq!(assignment.neutrals()[0], Term::Black);
        assert_eq!(assignment.neutrals()[4], Term::Gray);
        assert_eq!(assignment.neutrals()[9], Term::White);
    }
}
