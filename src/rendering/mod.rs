pub mod raster;
pub mod report;

pub use raster::{decode, encode_grey, encode_palette, flatten, unflatten, DecodedRaster, TileLayout};
pub use report::{hex_code, swatch, Legend, LegendEntry, MetricComparison, TermMapReport, TermSummary};
