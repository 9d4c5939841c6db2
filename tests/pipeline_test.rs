//! End-to-end term map generation through `Generator::run`.

mod common;

use color_terms::{ColorTermsError, Metric, MunsellColor, Rgb8, Term, GRID_COLUMNS, GRID_ROWS};
use common::fixtures::{self, TEST_SIDE};
use common::{assert_classified_as, assert_term_map_png, read_legend, Workspace};
use pretty_assertions::assert_eq;
use termmap::error::TermMapError;
use termmap::models::Variant;
use termmap::services::{load_confidence, Generator, TermMapLookup};

#[test]
fn test_both_variants_from_json_grids() {
    let ws = Workspace::new();
    let mut config = ws.config();
    ws.with_json_grids(&mut config, Variant::Bct20);
    ws.with_json_grids(&mut config, Variant::Bct11);

    let summary = Generator::new(config).unwrap().run().unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.written.len(), 6);
    for base in ["bct20_en_us", "bct11_en_us"] {
        let grey = assert_term_map_png(&ws.out().join(format!("{base}.png")), TEST_SIDE);
        assert_eq!(grey.palette, None);
        let pal = assert_term_map_png(&ws.out().join(format!("{base}_pal.png")), TEST_SIDE);
        assert_eq!(grey.pixels, pal.pixels);
        assert!(ws.out().join(format!("{base}.json")).is_file());
    }

    let legend = read_legend(&ws.out().join("bct11_en_us.json"));
    assert_eq!(legend.variant, Variant::Bct11);
    assert_eq!(legend.levels, fixtures::TEST_LEVELS);
    let declared: Vec<String> = Variant::Bct11
        .term_set()
        .display()
        .iter()
        .map(|(t, _)| t.name().to_string())
        .collect();
    let listed: Vec<String> = legend.terms.iter().map(|e| e.term.clone()).collect();
    assert_eq!(&listed[..declared.len()], &declared[..]);
    let total: u64 = legend.terms.iter().map(|e| e.count).sum();
    assert_eq!(total, (fixtures::TEST_LEVELS as u64).pow(3));
}

#[test]
fn test_missing_chart_fails_only_its_variant() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.charts.bct20 = Some(ws.charts().join("absent.jpeg"));
    ws.with_json_grids(&mut config, Variant::Bct11);

    let summary = Generator::new(config).unwrap().run().unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.failures.len(), 1);
    let (variant, error) = &summary.failures[0];
    assert_eq!(*variant, Variant::Bct20);
    assert!(matches!(error, TermMapError::MissingChartResource { .. }));

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].variant, Variant::Bct11);
    assert!(ws.out().join("bct11_en_us.png").is_file());
    assert!(!ws.out().join("bct20_en_us.png").exists());
}

#[test]
fn test_no_charts_writes_nothing() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.charts.bct20 = Some(ws.charts().join("absent20.jpeg"));
    config.charts.bct11 = Some(ws.charts().join("absent11.jpeg"));

    let summary = Generator::new(config).unwrap().run().unwrap();

    assert_eq!(summary.failures.len(), 2);
    assert!(summary.written.is_empty());
    assert_eq!(std::fs::read_dir(ws.out()).unwrap().count(), 0);
    // The Lab cube is never needed.
    assert_eq!(std::fs::read_dir(ws.cache()).unwrap().count(), 0);
}

#[test]
fn test_bct11_chart_image() {
    let ws = Workspace::new();
    let chart = ws.bct11_chart();
    let mut config = ws.config();
    config.variants = vec![Variant::Bct11];
    config.charts.bct11 = Some(chart.clone());

    let grids = load_confidence(Variant::Bct11, &chart).unwrap();
    let sampled: Vec<Term> = grids.iter().map(|g| g.term()).collect();
    for term in [Term::Red, Term::Orange, Term::Yellow, Term::Green, Term::Blue, Term::Pink] {
        assert!(sampled.contains(&term), "{term} not sampled");
    }

    let generator = Generator::new(config).unwrap();
    let grid = generator.reference_grid().unwrap();
    let lab = generator.lab_cube().unwrap();
    let map = generator.generate(Variant::Bct11, &grids, &grid, &lab).unwrap();

    assert_classified_as(&map, Rgb8::new(0, 0, 0), Term::Black);
    assert_classified_as(&map, Rgb8::new(255, 255, 255), Term::White);
    for term in [Term::Red, Term::Yellow, Term::Green, Term::Blue] {
        let summary = map.report.terms.iter().find(|t| t.term == term).unwrap();
        assert!(summary.count > 0, "{term} has no colors");
    }

    let summary = generator.run().unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.reports[0].terms, map.report.terms);
}

#[test]
fn test_palette_matches_catalogue() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.variants = vec![Variant::Bct20];
    ws.with_json_grids(&mut config, Variant::Bct20);

    let generator = Generator::new(config).unwrap();
    let grids = fixtures::grids(Variant::Bct20);
    let grid = generator.reference_grid().unwrap();
    let lab = generator.lab_cube().unwrap();
    let map = generator.generate(Variant::Bct20, &grids, &grid, &lab).unwrap();
    generator.write(&map, &ws.out()).unwrap();

    let raster = assert_term_map_png(&ws.out().join("bct20_en_us_pal.png"), TEST_SIDE);
    assert_eq!(raster.palette, Some(map.catalogue.palette()));
    let categories = map.catalogue.categories().len();
    assert!(raster.pixels.iter().all(|&p| (p as usize) < categories));
}

#[test]
fn test_optimized_output_decodes_identically() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.variants = vec![Variant::Bct11];
    config.optimize_png = true;
    ws.with_json_grids(&mut config, Variant::Bct11);

    let generator = Generator::new(config).unwrap();
    let grid = generator.reference_grid().unwrap();
    let lab = generator.lab_cube().unwrap();
    let map = generator
        .generate(Variant::Bct11, &fixtures::grids(Variant::Bct11), &grid, &lab)
        .unwrap();
    generator.write(&map, &ws.out()).unwrap();

    let grey = assert_term_map_png(&ws.out().join("bct11_en_us.png"), TEST_SIDE);
    let pal = assert_term_map_png(&ws.out().join("bct11_en_us_pal.png"), TEST_SIDE);
    assert_eq!(grey.pixels, termmap::rendering::flatten(&map.cube).unwrap());
    assert_eq!(pal.pixels, grey.pixels);
    assert_eq!(pal.palette, Some(map.catalogue.palette()));
}

#[test]
fn test_ciede2000_metric() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.metric = "ciede2000".to_string();
    config.compare_metrics = true;
    config.variants = vec![Variant::Bct11];
    ws.with_json_grids(&mut config, Variant::Bct11);

    let summary = Generator::new(config.clone()).unwrap().run().unwrap();
    assert!(summary.is_success());
    let report = &summary.reports[0];
    assert_eq!(report.metric, Metric::Ciede2000);
    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.counterpart, Metric::Cie76);
    assert!(comparison.differences <= fixtures::TEST_LEVELS.pow(3));

    let legend = read_legend(&ws.out().join("bct11_en_us.json"));
    assert_eq!(legend.metric, "CIEDE2000");

    // Without comparison the primary classification is unchanged.
    config.compare_metrics = false;
    let generator = Generator::new(config).unwrap();
    let grid = generator.reference_grid().unwrap();
    let lab = generator.lab_cube().unwrap();
    let map = generator
        .generate(Variant::Bct11, &fixtures::grids(Variant::Bct11), &grid, &lab)
        .unwrap();
    assert!(map.report.comparison.is_none());
    let reread = TermMapLookup::open(&ws.out().join("bct11_en_us.png"), None).unwrap();
    for rgb in [Rgb8::new(200, 30, 40), Rgb8::new(30, 60, 200), Rgb8::new(120, 120, 120)] {
        assert_eq!(reread.index(rgb), map.cube.lookup(rgb));
    }
}

#[test]
fn test_non_srgb_space_basename() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.working_space = "display-p3".to_string();
    config.variants = vec![Variant::Bct11];
    config.compare_metrics = false;
    ws.with_json_grids(&mut config, Variant::Bct11);

    let summary = Generator::new(config).unwrap().run().unwrap();

    assert!(summary.is_success());
    let names: Vec<String> = summary
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| n.starts_with("bct11_en_us_")), "{names:?}");
    assert!(!ws.out().join("bct11_en_us.png").exists());
}

#[test]
fn test_comparison_is_off_by_default() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.variants = vec![Variant::Bct11];
    ws.with_json_grids(&mut config, Variant::Bct11);

    let summary = Generator::new(config).unwrap().run().unwrap();
    assert!(summary.reports[0].comparison.is_none());
}

#[test]
fn test_renotation_data_caps_grid_chroma() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.variants = vec![Variant::Bct11];
    ws.with_json_grids(&mut config, Variant::Bct11);
    ws.with_renotation(&mut config, 6);

    let generator = Generator::new(config).unwrap();
    let grid = generator.reference_grid().unwrap();
    assert!(grid.resolved_count() > 0);
    for row in 0..GRID_ROWS {
        for column in 0..GRID_COLUMNS {
            if let Some(cell) = grid.cell(row, column) {
                if let MunsellColor::Chromatic { chroma, .. } = cell.notation {
                    assert!(chroma <= 6.0, "{} beyond the data", cell.notation);
                }
            }
        }
    }

    let summary = generator.run().unwrap();
    assert!(summary.is_success());
    assert_term_map_png(&ws.out().join("bct11_en_us.png"), TEST_SIDE);
}

#[test]
fn test_bad_renotation_data_fails_before_work() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.renotation = Some(ws.path().join("absent.dat"));
    assert!(matches!(Generator::new(config), Err(TermMapError::Config(_))));

    let mut config = ws.config();
    let path = ws.with_renotation(&mut config, 4);
    let mut text = std::fs::read_to_string(&path).unwrap();
    text.push_str("5R 5 2 0.33\n");
    let lines = text.lines().count();
    std::fs::write(&path, text).unwrap();
    match Generator::new(config) {
        Err(TermMapError::Core(ColorTermsError::RenotationData { line, .. })) => {
            assert_eq!(line, lines)
        }
        other => panic!("expected a renotation error, got {other:?}"),
    }
    assert_eq!(std::fs::read_dir(ws.cache()).unwrap().count(), 0);
}

#[test]
fn test_levels_without_raster_layout_fail_before_work() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.levels = 24;
    ws.with_json_grids(&mut config, Variant::Bct11);

    assert!(matches!(
        Generator::new(config),
        Err(TermMapError::Core(ColorTermsError::InvalidCubeSize(24)))
    ));
    assert_eq!(std::fs::read_dir(ws.cache()).unwrap().count(), 0);
    assert_eq!(std::fs::read_dir(ws.out()).unwrap().count(), 0);
}
