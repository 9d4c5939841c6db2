//! Basic color terms and the catalogue built from them
//!
//! The flow is: per-term [`ConfidenceGrid`]s → [`assign_categories`] →
//! [`CategoryCatalogue::build`] together with the reference grid.

mod assign;
mod catalogue;
mod confidence;
mod term;
mod term_set;

pub use assign::{assign_categories, AssignmentOptions, CategoryAssignment};
pub use catalogue::{CatalogueEntry, Category, CategoryCatalogue, MAX_CATEGORIES};
pub use confidence::{Cells, ConfidenceGrid};
pub use term::Term;
pub use term_set::TermSet;
