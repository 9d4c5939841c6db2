use std::path::PathBuf;

use color_terms::ColorTermsError;
use thiserror::Error;

use crate::models::Variant;

#[derive(Debug, Error)]
pub enum TermMapError {
    #[error("Missing chart resource for {variant}: {}", path.display())]
    MissingChartResource { variant: Variant, path: PathBuf },

    #[error("Color terms error: {0}")]
    Core(#[from] ColorTermsError),

    #[error("Chart image error: {0}")]
    Image(String),

    #[error("Chart data error: {0}")]
    ChartData(String),

    #[error("Legend error: {0}")]
    Legend(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("Unsupported term map size: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for TermMapError {
    fn from(e: image::ImageError) -> Self {
        TermMapError::Image(e.to_string())
    }
}
