//! Per-term confidence grids aligned with the reference grid

use super::term::Term;
use crate::error::ColorTermsError;
use crate::munsell::{GRID_COLUMNS, GRID_ROWS};

/// Confidence values in 0..=1, one per chromatic grid cell.
pub type Cells = [[f64; GRID_COLUMNS]; GRID_ROWS];

/// How strongly each grid cell is named `term`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceGrid {
    term: Term,
    cells: Box<Cells>,
}

impl ConfidenceGrid {
    /// Grid from a fixed-shape array.
    pub fn new(term: Term, cells: Cells) -> Self {
        Self {
            term,
            cells: Box::new(cells),
        }
    }

    /// Grid from a string label and nested rows.
    ///
    /// The label must name a known term and the rows must be exactly 8x40.
    pub fn from_rows(label: &str, rows: &[Vec<f64>]) -> Result<Self, ColorTermsError> {
        let term: Term = label.parse()?;
        let shape_error = |columns| ColorTermsError::GridShape {
            label: label.to_string(),
            rows: rows.len(),
            columns,
        };
        if rows.len() != GRID_ROWS {
            return Err(shape_error(rows.first().map_or(0, Vec::len)));
        }
        let mut cells = [[0.0; GRID_COLUMNS]; GRID_ROWS];
        for (target, row) in cells.iter_mut().zip(rows) {
            if row.len() != GRID_COLUMNS {
                return Err(shape_error(row.len()));
            }
            target.copy_from_slice(row);
        }
        Ok(Self::new(term, cells))
    }

    /// Grids that are 1.0 where `labels` names the term and 0.0 elsewhere.
    ///
    /// Cells without a label contribute to no grid. Terms come out in order
    /// of first appearance (row-major).
    pub fn one_hot(labels: &[[Option<Term>; GRID_COLUMNS]; GRID_ROWS]) -> Vec<Self> {
        let mut grids: Vec<Self> = Vec::new();
        for (row, line) in labels.iter().enumerate() {
            for (column, label) in line.iter().enumerate() {
                let Some(term) = *label else { continue };
                let index = match grids.iter().position(|g| g.term == term) {
                    Some(index) => index,
                    None => {
                        grids.push(Self::new(term, [[0.0; GRID_COLUMNS]; GRID_ROWS]));
                        grids.len() - 1
                    }
                };
                grids[index].cells[row][column] = 1.0;
            }
        }
        grids
    }

    /// The term this grid measures.
    #[inline]
    pub fn term(&self) -> Term {
        self.term
    }

    /// Confidence at (`row`, `column`).
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[row][column]
    }

    /// All cells.
    #[inline]
    pub fn cells(&self) -> &Cells {
        &self.cells
    }
}
