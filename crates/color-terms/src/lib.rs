#![allow(clippy::excessive_precision, clippy::needless_range_loop)]

//! color-terms: basic color term maps over the RGB cube
//!
//! This library assigns every color of a device RGB cube to a basic color
//! term ("red", "olive", "gray", ...) by nearest-neighbour search in CIELAB
//! against a catalogue of named reference colors, and finds a representative
//! color for each term's region.
//!
//! # Quick Start
//!
//! ```
//! use color_terms::{
//!     assign_categories, find_centers, AssignmentOptions, CategoryCatalogue, Classifier,
//!     GridOptions, LabCube, Metric, ReferenceGrid, Rgb8, Term, TermSet, WorkingSpace,
//! };
//!
//! let space = WorkingSpace::from_name("srgb").unwrap();
//! let grid = ReferenceGrid::build(&space, &GridOptions::new());
//! let assignment = assign_categories(&[], &AssignmentOptions::new());
//! let catalogue = CategoryCatalogue::build(&TermSet::bct11(), &grid, &assignment, &space).unwrap();
//!
//! // 256 levels in production; a coarse cube keeps the example fast.
//! let cube = LabCube::compute_levels(&space, 8).unwrap();
//! let classified = Classifier::new(&catalogue, Metric::Cie76).classify(&cube).unwrap();
//!
//! let red = catalogue.index_of(Term::Red).unwrap();
//! assert_eq!(classified.lookup(Rgb8::new(255, 0, 0)), red);
//! let centers = find_centers(&classified);
//! assert!(centers.get(red).is_some());
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Munsell notation ──> ReferenceGrid (10 neutrals + 8x40 hue/value cells)
//!                           |
//! ConfidenceGrid per term ──+──> CategoryAssignment ──> CategoryCatalogue
//!                                                             |
//! WorkingSpace ──> LabCube (levels³ Lab triples) ─────────────+──> Classifier
//!                                                                     |
//!                                          CenterIndex <── ClassifiedCube
//! ```
//!
//! # Color Science
//!
//! Device colors are decoded with the working space's transfer function,
//! converted to XYZ with a matrix derived from its primaries, and expressed
//! in CIELAB relative to its white point. Munsell samples are defined under
//! illuminant C and reach the working white through a von Kries adaptation
//! (CAT02 by default).
//!
//! Two difference formulas are available through [`Metric`]: CIE76, the
//! Euclidean distance in Lab, and CIEDE2000. Both pick the nearest catalogue
//! entry with ties going to the lower entry index, so classification is
//! deterministic for a given catalogue order.
//!
//! # Reference Grid
//!
//! Rows run from Munsell value 9 (row 0) down to value 2 (row 7); columns
//! walk the hue circle from 2.5R to 10RP. Each cell starts at the chroma of
//! a [`ChromaTable`] and, under [`ChromaPolicy::Retry`], steps down until
//! the color is displayable. Cells that never become displayable are gaps,
//! reported through [`ReferenceGrid::unresolved`].
//!
//! Notations become xyY through a [`MunsellModel`]. With renotation data
//! loaded into a [`RenotationTable`], a chroma beyond the measured samples
//! counts as not displayable and the retry walks down to the table.
//!
//! # Category Order
//!
//! A catalogue indexes its term set's display terms first, in declared
//! order, then any other term in order of first appearance. Rasters and
//! reports built from a [`ClassifiedCube`] use this order for their palettes.

pub mod classify;
pub mod color;
pub mod error;
pub mod munsell;
pub mod terms;


pub use classify::{
    classify, find_center, find_centers, CenterIndex, Classification, ClassifiedCube, Classifier,
    LabCube, CHUNK_SIZE, CUBE_LEVELS,
};
pub use color::{
    from_device_cube, to_device, to_perceptual, to_perceptual_with, ColorCoordinate, ColorSpace,
    ConeSpace, Illuminant, Lab, Metric, Rgb8, SpaceId, TransferFunction, WorkingSpace,
};
pub use error::{ColorTermsError, ParseColorError};
pub use munsell::{
    resolve_notation, ChromaPolicy, ChromaTable, GridCell, GridOptions, MunsellColor,
    MunsellModel, ReferenceGrid, RenotationTable, UnresolvedCell, GRID_COLUMNS, GRID_ROWS,
    NEUTRAL_COUNT,
};
pub use terms::{
    assign_categories, AssignmentOptions, CatalogueEntry, Category, CategoryAssignment,
    CategoryCatalogue, ConfidenceGrid, Term, TermSet,
};
