pub mod config;
pub mod variant;

pub use config::{ChartPaths, ChromaMode, GeneratorConfig};
pub use variant::Variant;
