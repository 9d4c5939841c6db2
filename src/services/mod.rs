pub mod chart_sampler;
pub mod cube_cache;
pub mod pipeline;
pub mod term_map;

pub use chart_sampler::{load_confidence, parse_confidence_json};
pub use cube_cache::{CacheOutcome, CubeCache};
pub use pipeline::{Generator, RunSummary, TermMap};
pub use term_map::TermMapLookup;
