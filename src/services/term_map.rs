//! Reading a term map raster back
//!
//! Pixel values are category indices. Their names come from the legend
//! written next to the raster (`<base>.json`); without one, the display
//! order of the variant's term set is assumed.

use std::path::{Path, PathBuf};

use color_terms::{ClassifiedCube, Rgb8, Term};

use crate::error::TermMapError;
use crate::models::Variant;
use crate::rendering::{decode, unflatten, Legend, TileLayout};

/// A decoded term map that answers "what is this color called?"
#[derive(Debug, Clone)]
pub struct TermMapLookup {
    cube: ClassifiedCube,
    terms: Vec<Term>,
}

impl TermMapLookup {
    /// Wrap a classified cube with the terms of its category indices
    pub fn new(cube: ClassifiedCube, terms: Vec<Term>) -> Self {
        Self { cube, terms }
    }

    /// Open a grayscale or palette raster
    pub fn open(map: &Path, variant: Option<Variant>) -> Result<Self, TermMapError> {
        let raster = decode(&std::fs::read(map)?)?;
        let layout = TileLayout::from_side(raster.side).ok_or(TermMapError::UnsupportedDimensions {
            width: raster.side as u32,
            height: raster.side as u32,
        })?;
        let cube = unflatten(&raster.pixels, layout)?;

        let legend_path = legend_path(map);
        let terms = if legend_path.is_file() {
            let legend: Legend = serde_json::from_str(&std::fs::read_to_string(&legend_path)?)
                .map_err(|e| TermMapError::Legend(format!("{}: {e}", legend_path.display())))?;
            tracing::debug!(path = %legend_path.display(), "Using term map legend");
            legend_terms(&legend)?
        } else {
            let variant = variant.ok_or_else(|| {
                TermMapError::Config(format!(
                    "no legend at {}; name the variant to use its term order",
                    legend_path.display()
                ))
            })?;
            tracing::debug!(%variant, "No legend, using the variant's display order");
            variant.term_set().display().iter().map(|(t, _)| *t).collect()
        };

        tracing::info!(
            map = %map.display(),
            levels = cube.levels(),
            terms = terms.len(),
            "Opened term map"
        );
        Ok(Self::new(cube, terms))
    }

    pub fn levels(&self) -> usize {
        self.cube.levels()
    }

    /// Raw category index of `rgb`
    pub fn index(&self, rgb: Rgb8) -> u8 {
        self.cube.lookup(rgb)
    }

    /// Term of `rgb`, `None` if its index has no name
    pub fn term(&self, rgb: Rgb8) -> Option<Term> {
        self.terms.get(self.index(rgb) as usize).copied()
    }
}

/// Legend next to `map`: `foo_pal.png` and `foo.png` both use `foo.json`
pub fn legend_path(map: &Path) -> PathBuf {
    let stem = map
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem.strip_suffix("_pal").unwrap_or(&stem);
    map.with_file_name(format!("{base}.json"))
}

fn legend_terms(legend: &Legend) -> Result<Vec<Term>, TermMapError> {
    let mut terms = vec![None; legend.terms.len()];
    for entry in &legend.terms {
        let slot = terms.get_mut(entry.index as usize).ok_or_else(|| {
            TermMapError::Legend(format!("legend index {} out of range", entry.index))
        })?;
        *slot = Some(entry.term.parse::<Term>()?);
    }
    terms
        .into_iter()
        .enumerate()
        .map(|(index, term)| {
            term.ok_or_else(|| TermMapError::Legend(format!("legend has no term {index}")))
        })
        .collect()
}
