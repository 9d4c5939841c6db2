//! Confidence grids from the naming charts of the lexicon study
//!
//! Two figures are supported. The 20-term figure shows one panel per
//! chromatic term where brightness is the naming rate over the 8x40 hue /
//! value grid. The 11-term figure is a single colored 8x40 map whose cells
//! are matched against key colors. Grids can also be supplied as JSON.

use std::path::Path;

use color_terms::{ConfidenceGrid, Rgb8, Term, GRID_COLUMNS, GRID_ROWS};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::TermMapError;
use crate::models::Variant;

/// Left edges of the panel columns of the 20-term figure
const PANEL_X: [u32; 4] = [18, 335, 652, 969];
/// Top edges of the panel rows
const PANEL_Y: [u32; 5] = [48, 208, 368, 528, 688];
const PANEL_WIDTH: u32 = 290;
const PANEL_HEIGHT: u32 = 106;

/// Panel terms, row-major over the figure
pub const PANEL_TERMS: [Term; 17] = [
    Term::Red,
    Term::Yellow,
    Term::Green,
    Term::Blue,
    Term::Orange,
    Term::Pink,
    Term::Brown,
    Term::Purple,
    Term::Peach,
    Term::Teal,
    Term::Lavender,
    Term::Maroon,
    Term::Gold,
    Term::Beige,
    Term::Magenta,
    Term::Lime,
    Term::Olive,
];

/// Map area of the 11-term figure: left, top, right, bottom
const MAP_AREA: [f64; 4] = [284.0, 40.0, 516.0, 87.0];

/// Key colors of the 11-term figure
pub const KEY_COLORS: [(Term, Rgb8); 8] = [
    (Term::Pink, Rgb8::new(0xFF, 0x95, 0xB2)),
    (Term::Red, Rgb8::new(0xFF, 0x00, 0x00)),
    (Term::Orange, Rgb8::new(0xFF, 0x79, 0x42)),
    (Term::Brown, Rgb8::new(0x7B, 0x69, 0x39)),
    (Term::Yellow, Rgb8::new(0xFF, 0xFF, 0x00)),
    (Term::Green, Rgb8::new(0x00, 0xFF, 0x00)),
    (Term::Blue, Rgb8::new(0x00, 0x00, 0xFF)),
    (Term::Purple, Rgb8::new(0x85, 0x00, 0xFF)),
];

/// Top-row columns of the 11-term map that take the term of the row below
const TOP_ROW_COPIES: [usize; 4] = [28, 29, 30, 35];

/// Confidence grids for `variant` from `path`.
///
/// `.json` files hold pre-sampled grids; anything else is decoded as the
/// variant's chart image.
pub fn load_confidence(variant: Variant, path: &Path) -> Result<Vec<ConfidenceGrid>, TermMapError> {
    if !path.is_file() {
        return Err(TermMapError::MissingChartResource {
            variant,
            path: path.to_path_buf(),
        });
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let grids = if is_json {
        parse_confidence_json(&std::fs::read_to_string(path)?)?
    } else {
        let chart = image::open(path)?.to_rgb8();
        tracing::debug!(
            %variant,
            width = chart.width(),
            height = chart.height(),
            "Decoded chart image"
        );
        match variant {
            Variant::Bct20 => sample_panels(&chart)?,
            Variant::Bct11 => sample_map(&chart)?,
        }
    };

    tracing::info!(%variant, path = %path.display(), grids = grids.len(), "Loaded confidence grids");
    Ok(grids)
}

fn ensure_fits(chart: &RgbImage, right: u32, bottom: u32) -> Result<(), TermMapError> {
    if right > chart.width() || bottom > chart.height() {
        return Err(TermMapError::Image(format!(
            "chart is {}x{}, needs at least {}x{}",
            chart.width(),
            chart.height(),
            right,
            bottom
        )));
    }
    Ok(())
}

/// Luma with ITU-R 601 weights in 16-bit fixed point.
#[inline]
fn luma(rgb: &image::Rgb<u8>) -> u8 {
    let [r, g, b] = rgb.0.map(u32::from);
    ((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u8
}

/// Stretch the darkest pixel to 0 and the brightest to 255.
fn autocontrast(image: &mut GrayImage) {
    let (lo, hi) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi <= lo {
        return;
    }
    let scale = 255.0 / f64::from(hi - lo);
    let offset = -f64::from(lo) * scale;
    for pixel in image.pixels_mut() {
        let v = f64::from(pixel[0]) * scale + offset;
        *pixel = Luma([v.clamp(0.0, 255.0) as u8]);
    }
}

/// Sample the 17 panels of the 20-term figure.
pub fn sample_panels(chart: &RgbImage) -> Result<Vec<ConfidenceGrid>, TermMapError> {
    let last_x = PANEL_X[PANEL_X.len() - 1];
    let last_y = PANEL_Y[(PANEL_TERMS.len() - 1) / PANEL_X.len()];
    ensure_fits(chart, last_x + PANEL_WIDTH - 2, last_y + PANEL_HEIGHT - 2)?;

    let grids = PANEL_TERMS
        .iter()
        .enumerate()
        .map(|(index, &term)| {
            let x = PANEL_X[index % PANEL_X.len()];
            let y = PANEL_Y[index / PANEL_X.len()];
            // Inset by one pixel to drop the panel frame.
            let panel =
                imageops::crop_imm(chart, x + 1, y + 1, PANEL_WIDTH - 3, PANEL_HEIGHT - 3).to_image();
            let mut gray = GrayImage::from_fn(panel.width(), panel.height(), |px, py| {
                Luma([luma(panel.get_pixel(px, py))])
            });
            autocontrast(&mut gray);
            let small = imageops::resize(
                &gray,
                GRID_COLUMNS as u32,
                GRID_ROWS as u32,
                FilterType::Lanczos3,
            );

            let mut cells = [[0.0; GRID_COLUMNS]; GRID_ROWS];
            for (row, line) in cells.iter_mut().enumerate() {
                for (column, cell) in line.iter_mut().enumerate() {
                    let v = f64::from(small.get_pixel(column as u32, row as u32)[0]);
                    *cell = (v / 255.0 * 1.2 - 0.1).clamp(0.0, 1.0);
                }
            }
            ConfidenceGrid::new(term, cells)
        })
        .collect();
    Ok(grids)
}

fn max_normalized(rgb: [f64; 3]) -> [f64; 3] {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    if max > 0.0 {
        rgb.map(|v| v / max)
    } else {
        rgb
    }
}

/// Key color nearest to `rgb` once both are scaled to a maximum channel of 1.
fn nearest_key(rgb: [f64; 3]) -> Term {
    let sample = max_normalized(rgb);
    let mut best = KEY_COLORS[0].0;
    let mut best_distance = f64::INFINITY;
    for (term, key) in KEY_COLORS {
        let key = max_normalized(key.to_bytes().map(f64::from));
        let distance: f64 = sample.iter().zip(key).map(|(a, b)| (a - b).powi(2)).sum();
        if distance < best_distance {
            best_distance = distance;
            best = term;
        }
    }
    best
}

/// Sample the cell centers of the 11-term figure.
///
/// The figure leaves the top row blank (white) outside columns 1..=27 and
/// 36..=39; columns 28-30 and 35 of that row repeat the row below. Orange in
/// the darkest row reads as brown.
pub fn sample_map(chart: &RgbImage) -> Result<Vec<ConfidenceGrid>, TermMapError> {
    let [left, top, right, bottom] = MAP_AREA;
    let x_stride = (right - left) / GRID_COLUMNS as f64;
    let y_stride = (bottom - top) / GRID_ROWS as f64;
    let x0 = left + x_stride / 2.0;
    let y0 = top + y_stride / 2.0;
    let sample_x = |column: usize| (x0 + x_stride * column as f64) as u32;
    let sample_y = |row: usize| (y0 + y_stride * row as f64) as u32;
    ensure_fits(
        chart,
        sample_x(GRID_COLUMNS - 1) + 1,
        sample_y(GRID_ROWS - 1) + 1,
    )?;

    let mut labels = [[None; GRID_COLUMNS]; GRID_ROWS];
    for (row, line) in labels.iter_mut().enumerate() {
        for (column, label) in line.iter_mut().enumerate() {
            let pixel = chart.get_pixel(sample_x(column), sample_y(row));
            let mut term = nearest_key(pixel.0.map(f64::from));
            if row == GRID_ROWS - 1 && term == Term::Orange {
                term = Term::Brown;
            }
            if row > 0 || (1..28).contains(&column) || column >= 36 {
                *label = Some(term);
            }
        }
    }
    for column in TOP_ROW_COPIES {
        labels[0][column] = labels[1][column];
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        for line in &labels {
            let codes: String = line
                .iter()
                .map(|label| label.map_or("--", |t: Term| &t.name()[..2]))
                .collect();
            tracing::debug!(row = %codes, "Sampled map row");
        }
    }
    Ok(ConfidenceGrid::one_hot(&labels))
}

/// One grid in the JSON exchange format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    pub term: String,
    /// 8 rows of 40 values in 0..=1
    pub cells: Vec<Vec<f64>>,
}

/// Parse grids from JSON: `[{"term": "red", "cells": [[...40...], ...8 rows]}]`
pub fn parse_confidence_json(text: &str) -> Result<Vec<ConfidenceGrid>, TermMapError> {
    let records: Vec<ConfidenceRecord> =
        serde_json::from_str(text).map_err(|e| TermMapError::ChartData(e.to_string()))?;

    let mut grids: Vec<ConfidenceGrid> = Vec::with_capacity(records.len());
    for record in &records {
        let grid = ConfidenceGrid::from_rows(&record.term, &record.cells)?;
        if grids.iter().any(|g| g.term() == grid.term()) {
            return Err(TermMapError::ChartData(format!(
                "duplicate grid for {}",
                grid.term()
            )));
        }
        let out_of_range = grid
            .cells()
            .iter()
            .flatten()
            .any(|v| !(0.0..=1.0).contains(v));
        if out_of_range {
            return Err(TermMapError::ChartData(format!(
                "confidence for {} outside 0..=1",
                grid.term()
            )));
        }
        grids.push(grid);
    }
    Ok(grids)
}

/// Serialize grids to the JSON exchange format
pub fn confidence_to_json(grids: &[ConfidenceGrid]) -> Result<String, TermMapError> {
    let records: Vec<ConfidenceRecord> = grids
        .iter()
        .map(|grid| ConfidenceRecord {
            term: grid.term().name().to_string(),
            cells: grid.cells().iter().map(|row| row.to_vec()).collect(),
        })
        .collect();
    serde_json::to_string_pretty(&records).map_err(|e| TermMapError::ChartData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn panel_chart() -> RgbImage {
        // Left half of the red panel is black, everything else white.
        RgbImage::from_fn(1260, 800, |x, y| {
            let in_red_panel = (18..18 + PANEL_WIDTH).contains(&x) && (48..48 + PANEL_HEIGHT).contains(&y);
            if in_red_panel && x < 18 + PANEL_WIDTH / 2 {
                Rgb([0, 0, 0])
            } else {
                WHITE
            }
        })
    }

    #[test]
    fn test_panels_follow_brightness() {
        let grids = sample_panels(&panel_chart()).unwrap();
        assert_eq!(grids.len(), 17);
        let red = &grids[0];
        assert_eq!(red.term(), Term::Red);
        for row in 0..GRID_ROWS {
            assert_eq!(red.get(row, 2), 0.0);
            assert_eq!(red.get(row, 37), 1.0);
        }
        // Flat panels keep their brightness: white reads as full confidence.
        assert_eq!(grids[16].term(), Term::Olive);
        assert_eq!(grids[16].get(4, 20), 1.0);
    }

    #[test]
    fn test_small_chart_rejected() {
        let chart = RgbImage::from_pixel(600, 400, WHITE);
        assert!(matches!(sample_panels(&chart), Err(TermMapError::Image(_))));
        assert!(matches!(
            sample_map(&RgbImage::from_pixel(300, 60, WHITE)),
            Err(TermMapError::Image(_))
        ));
    }

    #[test]
    fn test_nearest_key_ignores_brightness() {
        assert_eq!(nearest_key([128.0, 0.0, 0.0]), Term::Red);
        assert_eq!(nearest_key([0.0, 0.0, 90.0]), Term::Blue);
        assert_eq!(nearest_key([120.0, 102.0, 56.0]), Term::Brown);
        assert_eq!(nearest_key([255.0, 150.0, 178.0]), Term::Pink);
    }

    #[test]
    fn test_map_edges() {
        let orange = Rgb([0xFF, 0x79, 0x42]);
        let chart = RgbImage::from_pixel(520, 90, orange);
        let grids = sample_map(&chart).unwrap();
        let mut seen: Vec<Term> = grids.iter().map(|g| g.term()).collect();
        seen.sort_by_key(|t| t.name());
        assert_eq!(seen, vec![Term::Brown, Term::Orange]);

        let orange_grid = grids.iter().find(|g| g.term() == Term::Orange).unwrap();
        let brown_grid = grids.iter().find(|g| g.term() == Term::Brown).unwrap();
        // Darkest row turns brown.
        assert_eq!(brown_grid.get(7, 10), 1.0);
        assert_eq!(orange_grid.get(7, 10), 0.0);
        // Blank top-row cells carry no vote.
        for column in [0, 31, 32, 33, 34] {
            assert_eq!(orange_grid.get(0, column), 0.0, "column {column}");
        }
        // Copied and sampled top-row cells do.
        for column in [1, 27, 28, 29, 30, 35, 36, 39] {
            assert_eq!(orange_grid.get(0, column), 1.0, "column {column}");
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut cells = [[0.0; GRID_COLUMNS]; GRID_ROWS];
        cells[3][17] = 0.75;
        let grids = vec![ConfidenceGrid::new(Term::Teal, cells)];
        let json = confidence_to_json(&grids).unwrap();
        assert_eq!(parse_confidence_json(&json).unwrap(), grids);
    }

    #[test]
    fn test_json_rejects_bad_input() {
        let row = format!("[{}]", vec!["0.5"; GRID_COLUMNS].join(","));
        let rows = vec![row.as_str(); GRID_ROWS].join(",");

        let unknown = format!(r#"[{{"term": "chartreuse", "cells": [{rows}]}}]"#);
        assert!(matches!(
            parse_confidence_json(&unknown),
            Err(TermMapError::Core(_))
        ));

        let duplicate = format!(
            r#"[{{"term": "red", "cells": [{rows}]}}, {{"term": "Red", "cells": [{rows}]}}]"#
        );
        assert!(matches!(
            parse_confidence_json(&duplicate),
            Err(TermMapError::ChartData(_))
        ));

        let short = format!(r#"[{{"term": "red", "cells": [{row}]}}]"#);
        assert!(matches!(
            parse_confidence_json(&short),
            Err(TermMapError::Core(_))
        ));

        assert!(matches!(
            parse_confidence_json("{not json"),
            Err(TermMapError::ChartData(_))
        ));
    }

    #[test]
    fn test_missing_chart() {
        let result = load_confidence(Variant::Bct20, Path::new("/nonexistent/f09.jpeg"));
        assert!(matches!(
            result,
            Err(TermMapError::MissingChartResource {
                variant: Variant::Bct20,
                ..
            })
        ));
    }
}
