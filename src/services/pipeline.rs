//! Term map generation
//!
//! ```text
//! chart ──> ConfidenceGrid[] ──> CategoryAssignment ─┐
//!                 ReferenceGrid (once per run) ──────┼──> CategoryCatalogue
//!                 LabCube (cached, once per run) ────┴──> ClassifiedCube ──> rasters, legend, report
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use color_terms::{
    assign_categories, find_centers, CategoryAssignment, CategoryCatalogue, ClassifiedCube,
    Classifier, ConfidenceGrid, LabCube, Metric, MunsellModel, ReferenceGrid, WorkingSpace,
};

use super::chart_sampler;
use super::cube_cache::CubeCache;
use crate::error::TermMapError;
use crate::models::{GeneratorConfig, Variant};
use crate::rendering::{
    encode_grey, encode_palette, flatten, MetricComparison, TermMapReport, TileLayout,
};

/// A generated term map and everything derived from it
#[derive(Debug, Clone)]
pub struct TermMap {
    pub variant: Variant,
    pub catalogue: CategoryCatalogue,
    pub cube: ClassifiedCube,
    pub report: TermMapReport,
}

/// Outcome of [`Generator::run`]
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<TermMapReport>,
    /// Files written, in order
    pub written: Vec<PathBuf>,
    /// Variants that could not be generated
    pub failures: Vec<(Variant, TermMapError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the term map pipeline for one configuration
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    space: WorkingSpace,
    metric: Metric,
    munsell_model: MunsellModel,
    cache: CubeCache,
}

impl Generator {
    /// Resolve the configuration. Unknown working spaces, metrics or cone
    /// spaces, cube sizes without a raster layout and unreadable
    /// renotation data fail here, before any computation.
    pub fn new(config: GeneratorConfig) -> Result<Self, TermMapError> {
        let space = config.space()?;
        let metric = config.metric()?;
        config.cones()?;
        TileLayout::new(config.levels)?;
        let munsell_model = config.munsell_model()?;
        let cache = if config.use_cache {
            CubeCache::new(&config.cache_dir)
        } else {
            CubeCache::disabled()
        };
        Ok(Self {
            config,
            space,
            metric,
            munsell_model,
            cache,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn space(&self) -> &WorkingSpace {
        &self.space
    }

    /// Reference grid under the configured chroma policy; gaps are logged
    pub fn reference_grid(&self) -> Result<ReferenceGrid, TermMapError> {
        let options = self
            .config
            .grid_options()?
            .munsell_model(self.munsell_model.clone());
        let grid = ReferenceGrid::build(&self.space, &options);
        for cell in grid.unresolved() {
            tracing::warn!(row = cell.row, column = cell.column, error = %cell.error, "Unresolved grid cell");
        }
        tracing::info!(
            resolved = grid.resolved_count(),
            unresolved = grid.unresolved().len(),
            model = self.munsell_model.name(),
            "Built reference grid"
        );
        Ok(grid)
    }

    pub fn lab_cube(&self) -> Result<LabCube, TermMapError> {
        let (cube, outcome) = self
            .cache
            .load_or_compute(&self.space, self.config.levels)?;
        tracing::debug!(?outcome, "Lab cube ready");
        Ok(cube)
    }

    /// Build one term map from confidence grids
    pub fn generate(
        &self,
        variant: Variant,
        grids: &[ConfidenceGrid],
        grid: &ReferenceGrid,
        lab: &LabCube,
    ) -> Result<TermMap, TermMapError> {
        let started = Instant::now();
        let assignment = assign_categories(grids, &self.config.assignment_options());
        log_assignment(variant, &assignment);

        let catalogue = CategoryCatalogue::build(&variant.term_set(), grid, &assignment, &self.space)?;
        tracing::info!(
            %variant,
            categories = catalogue.categories().len(),
            entries = catalogue.entries().len(),
            "Built category catalogue"
        );

        let classifier = Classifier::new(&catalogue, self.metric);
        let (cube, comparison) = if self.config.compare_metrics {
            let result = classifier.classify_compared(lab)?;
            let comparison = MetricComparison {
                counterpart: result.counterpart,
                differences: result.differences,
            };
            (result.cube, Some(comparison))
        } else {
            (classifier.classify(lab)?, None)
        };

        let centers = find_centers(&cube);
        let report = TermMapReport::build(
            variant,
            self.space.id(),
            self.metric,
            &catalogue,
            &cube,
            &centers,
        )
        .with_comparison(comparison)
        .with_unresolved(grid.unresolved().len());

        for summary in report.inconsistent() {
            tracing::info!(%variant, term = %summary.term, "Display color classifies as another term");
        }
        tracing::info!(
            %variant,
            metric = %self.metric,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Classified cube"
        );

        Ok(TermMap {
            variant,
            catalogue,
            cube,
            report,
        })
    }

    /// Write the grayscale raster, the palette raster and the legend
    pub fn write(&self, map: &TermMap, dir: &Path) -> Result<Vec<PathBuf>, TermMapError> {
        std::fs::create_dir_all(dir)?;
        let base = map.variant.basename(self.space.id());
        let pixels = flatten(&map.cube)?;
        let side = (pixels.len() as f64).sqrt() as usize;
        let optimize = self.config.optimize_png;

        let grey_path = dir.join(format!("{base}.png"));
        std::fs::write(&grey_path, encode_grey(&pixels, side, optimize)?)?;

        let palette_path = dir.join(format!("{base}_pal.png"));
        let palette = map.catalogue.palette();
        std::fs::write(
            &palette_path,
            encode_palette(&pixels, side, &palette, optimize)?,
        )?;

        let legend_path = dir.join(format!("{base}.json"));
        let legend = serde_json::to_string_pretty(&map.report.legend())
            .map_err(|e| TermMapError::Legend(format!("{}: {e}", legend_path.display())))?;
        std::fs::write(&legend_path, legend)?;

        tracing::info!(variant = %map.variant, dir = %dir.display(), side, "Wrote term map");
        Ok(vec![grey_path, palette_path, legend_path])
    }

    /// Generate and write every configured variant.
    ///
    /// A variant whose chart cannot be loaded is recorded as a failure and
    /// the remaining variants still run. Classification errors abort.
    pub fn run(&self) -> Result<RunSummary, TermMapError> {
        let mut summary = RunSummary::default();
        let mut inputs = Vec::new();
        for &variant in &self.config.variants {
            let path = self.config.chart_path(variant);
            match chart_sampler::load_confidence(variant, &path) {
                Ok(grids) => inputs.push((variant, grids)),
                Err(e) => {
                    tracing::warn!(%variant, %e, "Skipping term map");
                    summary.failures.push((variant, e));
                }
            }
        }
        if inputs.is_empty() {
            return Ok(summary);
        }

        let grid = self.reference_grid()?;
        let lab = self.lab_cube()?;
        for (variant, grids) in inputs {
            let map = self.generate(variant, &grids, &grid, &lab)?;
            summary
                .written
                .extend(self.write(&map, &self.config.output_dir)?);
            summary.reports.push(map.report);
        }
        Ok(summary)
    }
}

fn log_assignment(variant: Variant, assignment: &CategoryAssignment) {
    tracing::debug!(%variant, defaulted = assignment.defaulted(), "Assigned grid categories");
    if tracing::enabled!(tracing::Level::TRACE) {
        for line in assignment.cells() {
            let codes: String = line.iter().map(|term| &term.name()[..2]).collect();
            tracing::trace!(%variant, row = %codes, "Assignment row");
        }
    }
}
