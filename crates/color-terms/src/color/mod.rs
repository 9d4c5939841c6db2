//! Color types and conversion utilities
//!
//! This module is the perceptual color space adapter of the crate: device
//! RGB in a named working space, CIE tristimulus values, CIELAB and the two
//! supported difference formulas.
//!
//! # Example
//!
//! ```
//! use color_terms::{from_device_cube, Metric, Rgb8, WorkingSpace};
//!
//! let space = WorkingSpace::from_name("srgb").unwrap();
//! let red = from_device_cube(Rgb8::new(255, 0, 0), &space);
//! let orange = from_device_cube(Rgb8::new(255, 128, 0), &space);
//! assert!(Metric::Ciede2000.delta_e(red, orange) > 10.0);
//! ```

mod adapt;
mod adapter;
mod difference;
mod lab;
pub(crate) mod math;
mod rgb;
mod space;

pub use adapt::{Adaptation, ConeSpace};
pub use adapter::{
    from_device_cube, to_device, to_perceptual, to_perceptual_with, ColorCoordinate, ColorSpace,
};
pub use difference::{delta_e_2000, delta_e_76, Metric};
pub use lab::{lab_to_xyz, xyy_to_xyz, xyz_to_lab, xyz_to_xyy, Lab};
pub use rgb::Rgb8;
pub use space::{Illuminant, SpaceId, TransferFunction, WorkingSpace};
