//! Assertion helpers for tests.

use std::path::Path;

use color_terms::{ClassifiedCube, Rgb8, Term};
use pretty_assertions::assert_eq;
use termmap::rendering::{self, DecodedRaster, Legend};
use termmap::services::TermMap;

/// Assert the file exists and is a square term map PNG of `side` pixels
pub fn assert_term_map_png(path: &Path, side: usize) -> DecodedRaster {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected {} to exist: {e}", path.display()));
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG signature in {}",
        path.display()
    );
    let raster = rendering::decode(&bytes).expect("Failed to decode term map");
    assert_eq!(raster.side, side, "Unexpected raster side for {}", path.display());
    raster
}

/// Read and parse a legend file
pub fn read_legend(path: &Path) -> Legend {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Expected legend {}: {e}", path.display()));
    serde_json::from_str(&text).expect("Legend is not valid JSON")
}

/// Assert `rgb` is classified as `term` in a generated map
pub fn assert_classified_as(map: &TermMap, rgb: Rgb8, term: Term) {
    let index = map.cube.lookup(rgb);
    let actual = map.catalogue.category(index).map(|c| c.term);
    assert_eq!(actual, Some(term), "Classification of {rgb}");
}

/// Assert two classified cubes are identical cell for cell
pub fn assert_same_cube(a: &ClassifiedCube, b: &ClassifiedCube) {
    assert_eq!(a.levels(), b.levels());
    let differing = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .filter(|(x, y)| x != y)
        .count();
    assert_eq!(differing, 0, "Cubes differ in {differing} cells");
}
