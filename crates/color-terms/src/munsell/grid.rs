//! The Munsell reference grid
//!
//! Ten neutral samples plus an 8x40 matrix of chromatic samples. Row 0 is
//! the lightest value (9), row 7 the darkest (2). Columns walk the hue
//! circle from 2.5R to 10RP in steps of 2.5.

use super::chroma_table::ChromaTable;
use super::notation::{HueFamily, MunsellColor, MunsellHue};
use super::renotation::{self, MunsellModel};
use crate::color::{to_device, ColorCoordinate, ConeSpace, Rgb8, WorkingSpace};
use crate::error::ColorTermsError;

/// Rows in the chromatic matrix (one per value step).
pub const GRID_ROWS: usize = 8;
/// Columns in the chromatic matrix (ten families times four steps).
pub const GRID_COLUMNS: usize = 40;
/// Number of neutral samples.
pub const NEUTRAL_COUNT: usize = 10;

/// Neutral values, darkest first.
pub const NEUTRAL_VALUES: [f64; NEUTRAL_COUNT] = [1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 9.5];

/// Hue steps within a family.
const HUE_STEPS: [f64; 4] = [2.5, 5.0, 7.5, 10.0];

/// Allowed distance of an encoded channel from the unit range.
const DISPLAY_TOLERANCE: f64 = 0.2;

/// Munsell value of a grid row (row 0 = 9.0, row 7 = 2.0).
#[inline]
pub fn row_value(row: usize) -> f64 {
    (GRID_ROWS - 1 - row) as f64 + 2.0
}

/// Hue of a grid column.
pub fn column_hue(column: usize) -> MunsellHue {
    MunsellHue::new(
        HUE_STEPS[column % HUE_STEPS.len()],
        HueFamily::ALL[column / HUE_STEPS.len()],
    )
}

/// How a cell's chroma is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromaPolicy {
    /// Use the tabulated chroma as is and clip out-of-gamut channels.
    Table,
    /// Lower the chroma by one until the color is displayable.
    ///
    /// Chroma below `floor` is never tried; a cell that runs out is
    /// reported as unresolved.
    Retry {
        /// Lowest chroma to try
        floor: f64,
    },
}

impl Default for ChromaPolicy {
    fn default() -> Self {
        ChromaPolicy::Retry { floor: 1.0 }
    }
}

/// Options for [`ReferenceGrid::build`].
///
/// # Example
///
/// ```
/// use color_terms::{ChromaPolicy, ChromaTable, GridOptions};
///
/// let options = GridOptions::new()
///     .chroma_table(ChromaTable::uniform(6.0))
///     .chroma_policy(ChromaPolicy::Table);
/// assert_eq!(options.chroma_policy, ChromaPolicy::Table);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    /// Starting chroma per cell.
    ///
    /// Default: [`ChromaTable::standard`]
    pub chroma_table: ChromaTable,

    /// Chroma selection mode.
    ///
    /// Default: retry down to chroma 1
    pub chroma_policy: ChromaPolicy,

    /// Cone space for adapting illuminant C to the working white.
    ///
    /// Default: CAT02
    pub cones: ConeSpace,

    /// Source of chromatic coordinates. Neutrals always use the analytic
    /// model, which both models agree on.
    ///
    /// Default: [`MunsellModel::Analytic`]
    pub munsell_model: MunsellModel,
}

impl GridOptions {
    /// Options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting chroma table.
    #[inline]
    pub fn chroma_table(mut self, table: ChromaTable) -> Self {
        self.chroma_table = table;
        self
    }

    /// Set the chroma selection mode.
    #[inline]
    pub fn chroma_policy(mut self, policy: ChromaPolicy) -> Self {
        self.chroma_policy = policy;
        self
    }

    /// Set the adaptation cone space.
    #[inline]
    pub fn cones(mut self, cones: ConeSpace) -> Self {
        self.cones = cones;
        self
    }

    /// Set the Munsell coordinate model.
    #[inline]
    pub fn munsell_model(mut self, model: impl Into<MunsellModel>) -> Self {
        self.munsell_model = model.into();
        self
    }
}

/// One resolved reference sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Notation actually used (after any chroma reduction)
    pub notation: MunsellColor,
    /// Quantized device color in the working space
    pub rgb: Rgb8,
}

impl GridCell {
    /// The sample as a device coordinate.
    #[inline]
    pub fn coordinate(&self) -> ColorCoordinate {
        ColorCoordinate::device(self.rgb)
    }
}

/// A chromatic cell with no displayable color under the active policy.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedCell {
    /// Grid row
    pub row: usize,
    /// Grid column
    pub column: usize,
    /// Why the cell was left empty
    pub error: ColorTermsError,
}

fn is_displayable(encoded: [f64; 3]) -> bool {
    encoded.iter().all(|&v| {
        // Absolute tolerance plus a 1e-5 relative term.
        let clipped = v.clamp(0.0, 1.0);
        v.is_finite() && (v - clipped).abs() <= DISPLAY_TOLERANCE + 1e-5 * clipped.abs()
    })
}

fn chroma_of(color: &MunsellColor) -> f64 {
    match *color {
        MunsellColor::Chromatic { chroma, .. } => chroma,
        MunsellColor::Neutral { .. } => 0.0,
    }
}

fn clipped_cell(notation: MunsellColor, space: &WorkingSpace, cones: ConeSpace) -> GridCell {
    let encoded = to_device(&renotation::to_coordinate(&notation), space, cones);
    GridCell {
        notation,
        rgb: Rgb8::quantize(encoded),
    }
}

/// Resolve one notation to a device color under the options' policy and
/// model.
///
/// With [`ChromaPolicy::Retry`] the chroma steps down by one until the
/// encoded color is displayable; a notation the model has no data for is
/// not displayable. The error names the last notation tried.
///
/// With [`ChromaPolicy::Table`] the color is clipped into range, and only
/// a notation outside the model's data fails.
pub fn resolve_notation(
    notation: MunsellColor,
    space: &WorkingSpace,
    options: &GridOptions,
) -> Result<GridCell, ColorTermsError> {
    let encode = |color: &MunsellColor| {
        let coordinate = options.munsell_model.to_coordinate(color)?;
        Ok::<_, ColorTermsError>(to_device(&coordinate, space, options.cones))
    };

    match options.chroma_policy {
        ChromaPolicy::Table => Ok(GridCell {
            notation,
            rgb: Rgb8::quantize(encode(&notation)?),
        }),
        ChromaPolicy::Retry { floor } => {
            let mut candidate = notation;
            loop {
                if let Ok(encoded) = encode(&candidate) {
                    if is_displayable(encoded) {
                        return Ok(GridCell {
                            notation: candidate,
                            rgb: Rgb8::quantize(encoded),
                        });
                    }
                }
                let next = chroma_of(&candidate) - 1.0;
                if matches!(candidate, MunsellColor::Neutral { .. }) || next < floor {
                    return Err(ColorTermsError::UnresolvableNotation {
                        notation: candidate.to_string(),
                    });
                }
                candidate = candidate.with_chroma(next);
            }
        }
    }
}

/// Neutral and chromatic reference samples for one working space.
#[derive(Debug, Clone)]
pub struct ReferenceGrid {
    neutrals: Vec<GridCell>,
    cells: Vec<Option<GridCell>>,
    unresolved: Vec<UnresolvedCell>,
}

impl ReferenceGrid {
    /// Build the grid for `space`.
    ///
    /// Chromatic cells that cannot be resolved are left empty and listed in
    /// [`unresolved`](Self::unresolved). Neutrals are always clipped into
    /// range, whatever the policy.
    pub fn build(space: &WorkingSpace, options: &GridOptions) -> Self {
        let neutrals = NEUTRAL_VALUES
            .iter()
            .map(|&value| clipped_cell(MunsellColor::Neutral { value }, space, options.cones))
            .collect();

        let mut cells = Vec::with_capacity(GRID_ROWS * GRID_COLUMNS);
        let mut unresolved = Vec::new();
        for row in 0..GRID_ROWS {
            let value = row_value(row);
            let value_index = GRID_ROWS - 1 - row;
            for column in 0..GRID_COLUMNS {
                let notation = MunsellColor::Chromatic {
                    hue: column_hue(column),
                    value,
                    chroma: options.chroma_table.get(value_index, column),
                };
                match resolve_notation(notation, space, options) {
                    Ok(cell) => cells.push(Some(cell)),
                    Err(error) => {
                        cells.push(None);
                        unresolved.push(UnresolvedCell { row, column, error });
                    }
                }
            }
        }

        Self {
            neutrals,
            cells,
            unresolved,
        }
    }

    /// Neutral samples, darkest first.
    #[inline]
    pub fn neutrals(&self) -> &[GridCell] {
        &self.neutrals
    }

    /// Chromatic sample at (`row`, `column`), `None` for gaps and out of
    /// range positions.
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell> {
        if row >= GRID_ROWS || column >= GRID_COLUMNS {
            return None;
        }
        self.cells[row * GRID_COLUMNS + column].as_ref()
    }

    /// Cells that were left empty.
    #[inline]
    pub fn unresolved(&self) -> &[UnresolvedCell] {
        &self.unresolved
    }

    /// Number of populated chromatic cells.
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
