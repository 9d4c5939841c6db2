//! Cube classification and region centers
//!
//! - [`LabCube`]: Lab coordinates of every device color
//! - [`Classifier`]: parallel nearest-entry search over a catalogue
//! - [`find_centers`]: one representative color per occupied category

mod centers;
mod classifier;
mod cube;
mod edt;

pub use centers::{find_center, find_centers, CenterIndex};
pub use classifier::{classify, Classification, Classifier};
pub use cube::{
    index_rgb, level_value, value_level, ClassifiedCube, LabCube, CHUNK_SIZE, CUBE_LEVELS,
};
