//! termmap - basic color term maps
//!
//! Turns the naming charts of a color lexicon study into term maps: every
//! 8-bit RGB color labelled with its nearest basic color term. The heavy
//! lifting lives in the `color-terms` crate; this crate adds configuration,
//! chart sampling, the Lab cube cache, raster output and the report.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
