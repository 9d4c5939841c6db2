//! Nearest-category classification of a whole cube
//!
//! The cube is split into [`CHUNK_SIZE`] runs that rayon classifies
//! independently. Each run reads the shared catalogue and writes its own
//! slice of the output, so the only synchronization is the final join.

use rayon::prelude::*;

use super::cube::{ClassifiedCube, LabCube, CHUNK_SIZE};
use crate::color::{Lab, Metric};
use crate::error::ColorTermsError;
use crate::terms::CategoryCatalogue;

/// Result of [`Classifier::classify_compared`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Cube classified with the active metric
    pub cube: ClassifiedCube,
    /// Metric the cube was checked against
    pub counterpart: Metric,
    /// Cells where the counterpart metric picks a different category
    pub differences: usize,
}

/// Nearest-entry classifier over a catalogue.
///
/// # Example
///
/// ```
/// use color_terms::{CategoryCatalogue, Classifier, Lab, Metric, Term};
///
/// let catalogue = CategoryCatalogue::from_lab(&[
///     (Term::Black, Lab::new(0.0, 0.0, 0.0)),
///     (Term::White, Lab::new(100.0, 0.0, 0.0)),
/// ])
/// .unwrap();
/// let classifier = Classifier::new(&catalogue, Metric::Cie76);
/// assert_eq!(classifier.classify_point(Lab::new(80.0, 5.0, 5.0)), Ok(1));
/// ```
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    catalogue: &'a CategoryCatalogue,
    metric: Metric,
    points: Vec<[f32; 3]>,
    categories: Vec<u8>,
}

impl<'a> Classifier<'a> {
    /// Classifier using `metric` against `catalogue`.
    pub fn new(catalogue: &'a CategoryCatalogue, metric: Metric) -> Self {
        let entries = catalogue.entries();
        Self {
            catalogue,
            metric,
            points: entries.iter().map(|e| e.lab.to_f32()).collect(),
            categories: entries.iter().map(|e| e.category).collect(),
        }
    }

    /// The active metric.
    #[inline]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The catalogue classified against.
    #[inline]
    pub fn catalogue(&self) -> &'a CategoryCatalogue {
        self.catalogue
    }

    /// Category of the nearest entry. The lowest entry index wins ties.
    #[inline]
    fn nearest(&self, metric: Metric, lab: &[f32; 3]) -> u8 {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (index, point) in self.points.iter().enumerate() {
            let distance = metric.ordering_distance(lab, point);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        self.categories[best]
    }

    /// Category of a single Lab color.
    pub fn classify_point(&self, lab: Lab) -> Result<u8, ColorTermsError> {
        if !lab.is_finite() {
            return Err(ColorTermsError::NonFiniteColor { index: 0 });
        }
        Ok(self.nearest(self.metric, &lab.to_f32()))
    }

    fn run(&self, metric: Metric, cube: &LabCube) -> Result<Vec<u8>, ColorTermsError> {
        let mut out = vec![0u8; cube.len()];
        out.par_chunks_mut(CHUNK_SIZE)
            .zip(cube.as_slice().par_chunks(CHUNK_SIZE))
            .enumerate()
            .try_for_each(|(chunk, (dst, src))| {
                for (offset, (slot, lab)) in dst.iter_mut().zip(src).enumerate() {
                    if !lab.iter().all(|v| v.is_finite()) {
                        return Err(ColorTermsError::NonFiniteColor {
                            index: chunk * CHUNK_SIZE + offset,
                        });
                    }
                    *slot = self.nearest(metric, lab);
                }
                Ok(())
            })?;
        Ok(out)
    }

    /// Classify every cube entry with the active metric.
    ///
    /// Fails on the first non-finite coordinate; no partial cube is returned.
    pub fn classify(&self, cube: &LabCube) -> Result<ClassifiedCube, ColorTermsError> {
        ClassifiedCube::from_raw(cube.levels(), self.run(self.metric, cube)?)
    }

    /// Classify with the active metric and count disagreements with its
    /// counterpart.
    pub fn classify_compared(&self, cube: &LabCube) -> Result<Classification, ColorTermsError> {
        let counterpart = self.metric.counterpart();
        let active = self.run(self.metric, cube)?;
        let other = self.run(counterpart, cube)?;
        let differences = active
            .par_iter()
            .zip(other.par_iter())
            .filter(|(a, b)| a != b)
            .count();
        Ok(Classification {
            cube: ClassifiedCube::from_raw(cube.levels(), active)?,
            counterpart,
            differences,
        })
    }
}

/// Classify `cube` against `catalogue` with `metric`.
pub fn classify(
    cube: &LabCube,
    catalogue: &CategoryCatalogue,
    metric: Metric,
) -> Result<ClassifiedCube, ColorTermsError> {
    Classifier::new(catalogue, metric).classify(cube)
}
