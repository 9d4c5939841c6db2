use std::path::{Path, PathBuf};

use color_terms::{
    AssignmentOptions, ChromaPolicy, ChromaTable, ConeSpace, GridOptions, Metric, MunsellModel,
    RenotationTable, WorkingSpace, CUBE_LEVELS,
};
use serde::Deserialize;

use super::Variant;
use crate::error::TermMapError;

/// Generator configuration loaded from a YAML file
///
/// Every field has a default, so an empty file is a valid configuration.
/// Command-line flags override individual fields after loading.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// RGB working space of the device cube ("srgb", "display-p3", ...)
    #[serde(default = "default_working_space")]
    pub working_space: String,

    /// Color difference used for classification ("cie76" or "ciede2000")
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Also classify with the other metric and report how many colors differ
    #[serde(default)]
    pub compare_metrics: bool,

    /// How out-of-gamut grid cells are handled
    #[serde(default)]
    pub chroma_policy: ChromaMode,

    /// Lowest chroma tried by the retry policy
    #[serde(default = "default_chroma_floor")]
    pub chroma_floor: f64,

    /// Start every grid cell at this chroma instead of the gamut-edge table
    #[serde(default)]
    pub uniform_chroma: Option<f64>,

    /// Munsell renotation data (`h V C x y Y` rows, as in `real.dat`).
    /// Without it the analytic approximation is used.
    #[serde(default)]
    pub renotation: Option<PathBuf>,

    /// Cone space for adapting illuminant C samples ("cat02", "bradford",
    /// "hunt-pointer-estevez")
    #[serde(default = "default_adaptation")]
    pub adaptation: String,

    /// Confidence a chart cell must exceed to name a grid cell
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Always use the neutral defaults for the two outer rows at each end
    #[serde(default)]
    pub force_edge_rows: bool,

    /// Term maps to generate
    #[serde(default = "default_variants")]
    pub variants: Vec<Variant>,

    /// Directory for rasters and legends
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,

    /// Directory for the Lab cube cache
    #[serde(default = "default_dir")]
    pub cache_dir: PathBuf,

    /// Load and store the Lab cube cache
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// Re-compress rasters with oxipng
    #[serde(default = "default_true")]
    pub optimize_png: bool,

    /// Print ANSI true-color swatches in the report
    #[serde(default = "default_true")]
    pub ansi: bool,

    /// Steps per channel of the device cube
    #[serde(default = "default_levels")]
    pub levels: usize,

    /// Chart images (or pre-sampled JSON grids) per variant
    #[serde(default)]
    pub charts: ChartPaths,
}

/// Chroma selection for reference grid cells
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChromaMode {
    /// Accept the tabulated chroma and clip
    Table,
    /// Lower the chroma until displayable
    #[default]
    Retry,
}

/// Chart sources; unset entries fall back to [`Variant::default_chart`]
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ChartPaths {
    #[serde(default)]
    pub bct20: Option<PathBuf>,

    #[serde(default)]
    pub bct11: Option<PathBuf>,
}

fn default_working_space() -> String {
    "srgb".to_string()
}

fn default_metric() -> String {
    "cie76".to_string()
}

fn default_adaptation() -> String {
    "cat02".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chroma_floor() -> f64 {
    1.0
}

fn default_confidence_threshold() -> f64 {
    0.1
}

fn default_variants() -> Vec<Variant> {
    Variant::ALL.to_vec()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_levels() -> usize {
    CUBE_LEVELS
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            working_space: default_working_space(),
            metric: default_metric(),
            compare_metrics: false,
            chroma_policy: ChromaMode::default(),
            chroma_floor: default_chroma_floor(),
            uniform_chroma: None,
            renotation: None,
            adaptation: default_adaptation(),
            confidence_threshold: default_confidence_threshold(),
            force_edge_rows: false,
            variants: default_variants(),
            output_dir: default_dir(),
            cache_dir: default_dir(),
            use_cache: true,
            optimize_png: true,
            ansi: true,
            levels: default_levels(),
            charts: ChartPaths::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    ///
    /// The file was asked for explicitly, so unreadable or malformed
    /// content is an error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self, TermMapError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TermMapError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_yaml(&content)
            .map_err(|e| TermMapError::Config(format!("{}: {e}", path.display())))?;
        tracing::info!(
            path = %path.display(),
            space = %config.working_space,
            metric = %config.metric,
            variants = config.variants.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, TermMapError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from YAML text; blank text means defaults
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the working space name
    pub fn space(&self) -> Result<WorkingSpace, TermMapError> {
        Ok(WorkingSpace::from_name(&self.working_space)?)
    }

    pub fn metric(&self) -> Result<Metric, TermMapError> {
        self.metric.parse().map_err(TermMapError::Config)
    }

    pub fn cones(&self) -> Result<ConeSpace, TermMapError> {
        match self
            .adaptation
            .to_ascii_lowercase()
            .replace(['-', '_', ' '], "")
            .as_str()
        {
            "cat02" => Ok(ConeSpace::Cat02),
            "bradford" => Ok(ConeSpace::Bradford),
            "huntpointerestevez" | "hpe" | "vonkries" => Ok(ConeSpace::HuntPointerEstevez),
            other => Err(TermMapError::Config(format!(
                "unknown adaptation cone space: {other}"
            ))),
        }
    }

    /// Reference grid options derived from the chroma settings
    pub fn grid_options(&self) -> Result<GridOptions, TermMapError> {
        let table = match self.uniform_chroma {
            Some(chroma) => ChromaTable::uniform(chroma),
            None => ChromaTable::standard(),
        };
        let policy = match self.chroma_policy {
            ChromaMode::Table => ChromaPolicy::Table,
            ChromaMode::Retry => ChromaPolicy::Retry {
                floor: self.chroma_floor,
            },
        };
        Ok(GridOptions::new()
            .chroma_table(table)
            .chroma_policy(policy)
            .cones(self.cones()?))
    }

    /// Munsell coordinate source: the renotation file if configured.
    ///
    /// An unreadable file is a configuration error; malformed content
    /// reports the offending line.
    pub fn munsell_model(&self) -> Result<MunsellModel, TermMapError> {
        let Some(path) = &self.renotation else {
            tracing::warn!("No renotation data configured, using the analytic Munsell model");
            return Ok(MunsellModel::Analytic);
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| TermMapError::Config(format!("{}: {e}", path.display())))?;
        let table = RenotationTable::parse(&text)?;
        tracing::info!(path = %path.display(), samples = table.len(), "Loaded renotation data");
        Ok(MunsellModel::from(table))
    }

    pub fn assignment_options(&self) -> AssignmentOptions {
        AssignmentOptions::new()
            .threshold(self.confidence_threshold)
            .force_edge_rows(self.force_edge_rows)
    }

    /// Chart source for `variant`
    pub fn chart_path(&self, variant: Variant) -> PathBuf {
        let configured = match variant {
            Variant::Bct20 => self.charts.bct20.as_ref(),
            Variant::Bct11 => self.charts.bct11.as_ref(),
        };
        configured.cloned().unwrap_or_else(|| variant.default_chart())
    }
}
