//! Munsell notation and the reference grid built from it
//!
//! [`ReferenceGrid::build`] turns ten neutral values and the 8x40 hue/value
//! matrix into device colors of a working space. Chroma for each cell comes
//! from a [`ChromaTable`]; [`ChromaPolicy`] decides what happens when that
//! chroma is outside the gamut. Coordinates come from a [`MunsellModel`]:
//! the analytic approximation, or renotation data read by
//! [`RenotationTable::parse`].

mod chroma_table;
mod grid;
mod notation;
pub mod renotation;
mod renotation_table;

pub use chroma_table::ChromaTable;
pub use grid::{
    column_hue, resolve_notation, row_value, ChromaPolicy, GridCell, GridOptions, ReferenceGrid,
    UnresolvedCell, GRID_COLUMNS, GRID_ROWS, NEUTRAL_COUNT, NEUTRAL_VALUES,
};
pub use notation::{HueFamily, MunsellColor, MunsellHue};
pub use renotation::MunsellModel;
pub use renotation_table::RenotationTable;
