//! Test fixtures: scratch workspaces, confidence grids and synthetic charts.

use std::path::{Path, PathBuf};

use color_terms::munsell::{column_hue, renotation};
use color_terms::{ConfidenceGrid, MunsellColor, Term, GRID_COLUMNS, GRID_ROWS};
use image::{Rgb, RgbImage};
use tempfile::TempDir;
use termmap::models::{GeneratorConfig, Variant};
use termmap::services::chart_sampler;

/// Cube resolution used by integration tests (a 64x64 raster)
pub const TEST_LEVELS: usize = 16;

/// Side of a term map raster at [`TEST_LEVELS`]
pub const TEST_SIDE: usize = 64;

/// A scratch directory with `charts/`, `out/` and `cache/` below it
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for sub in ["charts", "out", "cache"] {
            std::fs::create_dir_all(dir.path().join(sub)).expect("Failed to create subdir");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn charts(&self) -> PathBuf {
        self.path().join("charts")
    }

    pub fn out(&self) -> PathBuf {
        self.path().join("out")
    }

    pub fn cache(&self) -> PathBuf {
        self.path().join("cache")
    }

    /// Small, fast configuration writing into this workspace
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            levels: TEST_LEVELS,
            output_dir: self.out(),
            cache_dir: self.cache(),
            optimize_png: false,
            ansi: false,
            ..Default::default()
        }
    }

    /// Write JSON grids for `variant` and point `config` at them
    pub fn with_json_grids(&self, config: &mut GeneratorConfig, variant: Variant) -> PathBuf {
        let path = self.charts().join(format!("{variant}.json"));
        let json = chart_sampler::confidence_to_json(&grids(variant)).expect("Failed to serialize");
        std::fs::write(&path, json).expect("Failed to write grids");
        match variant {
            Variant::Bct20 => config.charts.bct20 = Some(path.clone()),
            Variant::Bct11 => config.charts.bct11 = Some(path.clone()),
        }
        path
    }

    /// Write renotation data up to `max_chroma` and point `config` at it
    pub fn with_renotation(&self, config: &mut GeneratorConfig, max_chroma: u16) -> PathBuf {
        let path = self.path().join("real.dat");
        std::fs::write(&path, renotation_text(max_chroma)).expect("Failed to write renotation data");
        config.renotation = Some(path.clone());
        path
    }

    /// Write a synthetic 11-term chart image
    pub fn bct11_chart(&self) -> PathBuf {
        let path = self.charts().join("figure5.png");
        bct11_chart().save(&path).expect("Failed to write chart");
        path
    }
}

/// Renotation rows for every grid hue at values 1-9 and even chromas up to
/// `max_chroma`, sampled from the analytic model
pub fn renotation_text(max_chroma: u16) -> String {
    let mut text = String::from("h V C x y Y\n");
    for column in 0..GRID_COLUMNS {
        let hue = column_hue(column);
        for value in 1..=9 {
            for chroma in (2..=max_chroma).step_by(2) {
                let [x, y, big_y] = renotation::to_xyy(&MunsellColor::Chromatic {
                    hue,
                    value: value as f64,
                    chroma: chroma as f64,
                });
                text.push_str(&format!(
                    "{}{} {value} {chroma} {x:.6} {y:.6} {:.4}\n",
                    hue.step,
                    hue.family.letters(),
                    big_y * 100.0
                ));
            }
        }
    }
    text
}

/// Grid with `value` in rows `rows` and columns `columns`, zero elsewhere
pub fn block(
    term: Term,
    rows: std::ops::Range<usize>,
    columns: std::ops::Range<usize>,
    value: f64,
) -> ConfidenceGrid {
    let mut cells = [[0.0; GRID_COLUMNS]; GRID_ROWS];
    for row in rows {
        for column in columns.clone() {
            cells[row][column] = value;
        }
    }
    ConfidenceGrid::new(term, cells)
}

/// Plausible grids: each hue family block named by its usual term
pub fn grids(variant: Variant) -> Vec<ConfidenceGrid> {
    // Columns: 0-3 R, 4-7 YR, 8-11 Y, 12-15 GY, 16-19 G, 20-23 BG,
    // 24-27 B, 28-31 PB, 32-35 P, 36-39 RP.
    let mut grids = vec![
        block(Term::Red, 2..7, 0..4, 0.9),
        block(Term::Orange, 2..6, 4..8, 0.8),
        block(Term::Yellow, 0..4, 8..12, 0.9),
        block(Term::Green, 1..7, 12..22, 0.9),
        block(Term::Blue, 1..7, 22..30, 0.9),
        block(Term::Purple, 2..7, 30..36, 0.8),
        block(Term::Pink, 1..4, 36..40, 0.7),
    ];
    if variant == Variant::Bct20 {
        grids.push(block(Term::Maroon, 6..8, 0..4, 0.95));
        grids.push(block(Term::Olive, 5..8, 8..12, 0.95));
        grids.push(block(Term::Teal, 3..6, 20..24, 0.95));
    }
    grids
}

/// Map origin of the 11-term figure and the width of its cells
const MAP_LEFT: f64 = 284.0;
const MAP_TOP: f64 = 40.0;
const CELL_WIDTH: f64 = 232.0 / 40.0;

/// Key color painted in each hue-family band of the synthetic 11-term chart
fn band_color(column: usize) -> Rgb<u8> {
    match column / 4 {
        0 => Rgb([0xFF, 0x00, 0x00]),
        1 => Rgb([0xFF, 0x79, 0x42]),
        2 | 3 => Rgb([0xFF, 0xFF, 0x00]),
        4 | 5 => Rgb([0x00, 0xFF, 0x00]),
        6 | 7 => Rgb([0x00, 0x00, 0xFF]),
        8 => Rgb([0x85, 0x00, 0xFF]),
        _ => Rgb([0xFF, 0x95, 0xB2]),
    }
}

/// A 520x90 chart whose map cells carry one key color per hue band
pub fn bct11_chart() -> RgbImage {
    RgbImage::from_fn(520, 90, |x, y| {
        let x = f64::from(x);
        let y = f64::from(y);
        let inside = x >= MAP_LEFT && x < MAP_LEFT + 232.0 && y >= MAP_TOP && y < MAP_TOP + 47.0;
        if !inside {
            return Rgb([255, 255, 255]);
        }
        let column = (((x - MAP_LEFT) / CELL_WIDTH) as usize).min(GRID_COLUMNS - 1);
        band_color(column)
    })
}
