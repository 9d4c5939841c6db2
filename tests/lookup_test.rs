//! Reading generated term maps back with `TermMapLookup`.

mod common;

use color_terms::{Rgb8, Term};
use common::fixtures;
use common::Workspace;
use pretty_assertions::assert_eq;
use termmap::error::TermMapError;
use termmap::models::Variant;
use termmap::rendering::encode_grey;
use termmap::services::{Generator, TermMap, TermMapLookup};

fn generate(ws: &Workspace, variant: Variant) -> TermMap {
    let mut config = ws.config();
    config.variants = vec![variant];
    ws.with_json_grids(&mut config, variant);
    let generator = Generator::new(config).unwrap();
    let grid = generator.reference_grid().unwrap();
    let lab = generator.lab_cube().unwrap();
    let map = generator
        .generate(variant, &fixtures::grids(variant), &grid, &lab)
        .unwrap();
    generator.write(&map, &ws.out()).unwrap();
    map
}

const SAMPLES: [Rgb8; 6] = [
    Rgb8::new(0, 0, 0),
    Rgb8::new(255, 255, 255),
    Rgb8::new(220, 20, 30),
    Rgb8::new(40, 200, 60),
    Rgb8::new(30, 50, 210),
    Rgb8::new(128, 128, 128),
];

#[test]
fn test_open_grey_and_palette_with_legend() {
    let ws = Workspace::new();
    let map = generate(&ws, Variant::Bct20);

    for file in ["bct20_en_us.png", "bct20_en_us_pal.png"] {
        let lookup = TermMapLookup::open(&ws.out().join(file), None).unwrap();
        assert_eq!(lookup.levels(), fixtures::TEST_LEVELS);
        for rgb in SAMPLES {
            let expected = map.catalogue.category(map.cube.lookup(rgb)).map(|c| c.term);
            assert_eq!(lookup.term(rgb), expected, "{file} at {rgb}");
        }
    }

    let lookup = TermMapLookup::open(&ws.out().join("bct20_en_us.png"), None).unwrap();
    assert_eq!(lookup.term(Rgb8::new(0, 0, 0)), Some(Term::Black));
    assert_eq!(lookup.term(Rgb8::new(255, 255, 255)), Some(Term::White));
}

#[test]
fn test_without_legend_needs_variant() {
    let ws = Workspace::new();
    let map = generate(&ws, Variant::Bct11);
    std::fs::remove_file(ws.out().join("bct11_en_us.json")).unwrap();
    let raster = ws.out().join("bct11_en_us.png");

    let result = TermMapLookup::open(&raster, None);
    assert!(matches!(result, Err(TermMapError::Config(_))));

    let lookup = TermMapLookup::open(&raster, Some(Variant::Bct11)).unwrap();
    // Display terms lead the catalogue, so their indices agree.
    for rgb in [Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)] {
        let expected = map.catalogue.category(map.cube.lookup(rgb)).map(|c| c.term);
        assert_eq!(lookup.term(rgb), expected);
    }
}

#[test]
fn test_non_cube_side_is_rejected() {
    let ws = Workspace::new();
    let path = ws.out().join("odd.png");
    std::fs::write(&path, encode_grey(&[0; 50 * 50], 50, false).unwrap()).unwrap();

    let result = TermMapLookup::open(&path, Some(Variant::Bct11));
    assert!(matches!(
        result,
        Err(TermMapError::UnsupportedDimensions {
            width: 50,
            height: 50
        })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let ws = Workspace::new();
    let result = TermMapLookup::open(&ws.out().join("absent.png"), Some(Variant::Bct20));
    assert!(matches!(result, Err(TermMapError::Io(_))));
}

#[test]
fn test_rgb_png_is_rejected() {
    let ws = Workspace::new();
    let path = ws.out().join("rgb.png");
    image::RgbImage::new(64, 64).save(&path).unwrap();

    let result = TermMapLookup::open(&path, Some(Variant::Bct20));
    assert!(matches!(result, Err(TermMapError::PngDecode(_))));
}

#[test]
fn test_corrupt_legend_is_legend_error() {
    let ws = Workspace::new();
    generate(&ws, Variant::Bct11);
    std::fs::write(ws.out().join("bct11_en_us.json"), "{\"variant\": ").unwrap();

    let result = TermMapLookup::open(&ws.out().join("bct11_en_us.png"), None);
    match result {
        Err(TermMapError::Legend(message)) => assert!(message.contains("bct11_en_us.json")),
        other => panic!("expected a legend error, got {other:?}"),
    }
}
