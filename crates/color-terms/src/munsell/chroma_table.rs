//! Starting chroma for each reference grid cell
//!
//! One row per Munsell value (2 through 9), one column per hue in grid
//! order (2.5R, 5R, 7.5R, 10R, 2.5YR, .. 10RP). Entries approximate the
//! highest chroma that stays inside the sRGB gamut for the hue and value.

use super::grid::{GRID_COLUMNS, GRID_ROWS};

/// Gamut-edge chroma, indexed `[value - 2][column]`.
#[rustfmt::skip]
const GAMUT_EDGE: [[u8; GRID_COLUMNS]; GRID_ROWS] = [
    // value 2
    [
        6, 6, 6, 4, 4, 4, 4, 4, 2, 2,
        2, 2, 2, 2, 2, 4, 4, 4, 4, 4,
        4, 4, 4, 4, 6, 6, 8, 8, 8, 10,
        10, 10, 10, 10, 10, 8, 8, 8, 8, 8,
    ],
    // value 3
    [
        10, 10, 8, 8, 8, 6, 6, 4, 4, 4,
        4, 4, 4, 4, 4, 4, 6, 6, 6, 6,
        6, 6, 6, 8, 8, 8, 8, 10, 12, 12,
        12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    ],
    // value 4
    [
        14, 14, 12, 12, 10, 8, 8, 8, 6, 6,
        6, 6, 6, 6, 6, 8, 8, 8, 8, 8,
        8, 8, 8, 8, 8, 8, 8, 10, 12, 12,
        12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    ],
    // value 5
    [
        16, 16, 16, 14, 12, 12, 12, 10, 8, 8,
        8, 8, 8, 8, 8, 8, 10, 10, 10, 8,
        8, 8, 8, 8, 8, 8, 8, 10, 12, 12,
        12, 12, 12, 12, 12, 12, 12, 12, 12, 14,
    ],
    // value 6
    [
        14, 14, 14, 14, 14, 14, 12, 12, 12, 10,
        10, 10, 10, 10, 10, 10, 10, 10, 10, 8,
        8, 8, 8, 8, 8, 8, 8, 8, 10, 10,
        10, 10, 10, 10, 10, 12, 12, 12, 12, 12,
    ],
    // value 7
    [
        12, 12, 12, 12, 14, 14, 14, 12, 12, 12,
        12, 12, 12, 12, 12, 12, 10, 10, 10, 8,
        8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
        8, 8, 8, 8, 8, 8, 10, 10, 10, 12,
    ],
    // value 8
    [
        8, 8, 8, 8, 10, 10, 12, 12, 12, 14,
        14, 12, 12, 12, 12, 10, 8, 8, 8, 8,
        6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
        6, 6, 6, 6, 6, 8, 8, 8, 8, 8,
    ],
    // value 9
    [
        4, 4, 4, 4, 6, 6, 8, 8, 10, 12,
        12, 12, 10, 10, 8, 8, 8, 6, 6, 4,
        4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
        4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    ],
];

/// Starting chroma for every (value, hue) pair of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaTable {
    cells: [[f64; GRID_COLUMNS]; GRID_ROWS],
}

impl ChromaTable {
    /// The gamut-edge table.
    pub fn standard() -> Self {
        Self {
            cells: GAMUT_EDGE.map(|row| row.map(f64::from)),
        }
    }

    /// The same starting chroma for every cell.
    pub fn uniform(chroma: f64) -> Self {
        Self {
            cells: [[chroma; GRID_COLUMNS]; GRID_ROWS],
        }
    }

    /// Starting chroma for a value index (0 = value 2) and hue column.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the 8x40 grid.
    #[inline]
    pub fn get(&self, value_index: usize, column: usize) -> f64 {
        self.cells[value_index][column]
    }

    /// Highest entry in the table.
    pub fn max(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

impl Default for ChromaTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_bounds() {
        let table = ChromaTable::standard();
        for v in 0..GRID_ROWS {
            for c in 0..GRID_COLUMNS {
                let chroma = table.get(v, c);
                assert!((2.0..=16.0).contains(&chroma), "[{v}][{c}] = {chroma}");
            }
        }
        assert_eq!(table.max(), 16.0);
    }

    #[test]
    fn test_red_peaks_mid_value_yellow_peaks_light() {
        let table = ChromaTable::standard();
        // 5R is column 1, 5Y is column 9.
        assert!(table.get(3, 1) > table.get(7, 1));
        assert!(table.get(6, 9) > table.get(0, 9));
    }

    #[test]
    fn test_uniform() {
        let table = ChromaTable::uniform(6.0);
        assert_eq!(table.get(0, 0), 6.0);
        assert_eq!(table.get(7, 39), 6.0);
        assert_eq!(table.max(), 6.0);
    }
}
