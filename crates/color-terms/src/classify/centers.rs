//! Representative colors of classified regions
//!
//! The center of a category is the cube cell deepest inside its region:
//! the maximum of the distance transform of the category's mask. Equal
//! depths resolve to the lowest flat index.

use rayon::prelude::*;

use super::cube::{index_rgb, ClassifiedCube};
use super::edt;
use crate::color::Rgb8;

/// One representative device color per occupied category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CenterIndex {
    centers: Vec<(u8, Rgb8)>,
}

impl CenterIndex {
    /// Center of `category`, `None` if the category is not in the cube.
    pub fn get(&self, category: u8) -> Option<Rgb8> {
        self.centers
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rgb)| *rgb)
    }

    /// Occupied categories and their centers, by ascending category.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Rgb8)> + '_ {
        self.centers.iter().copied()
    }

    /// Number of occupied categories.
    #[inline]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Whether no category is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Center of one category, `None` if it occupies no cell.
pub fn find_center(cube: &ClassifiedCube, category: u8) -> Option<Rgb8> {
    let n = cube.levels();
    let mask: Vec<bool> = cube.as_slice().par_iter().map(|&c| c == category).collect();
    if !mask.par_iter().any(|&inside| inside) {
        return None;
    }

    let distances = edt::squared_distances(&mask, n);
    let (_, index) = distances
        .par_iter()
        .zip(mask.par_iter())
        .enumerate()
        .filter(|(_, (_, &inside))| inside)
        .map(|(index, (&distance, _))| (distance, index))
        .reduce(
            || (0, usize::MAX),
            |a, b| {
                if b.0 > a.0 || (b.0 == a.0 && b.1 < a.1) {
                    b
                } else {
                    a
                }
            },
        );
    Some(index_rgb(index, n))
}

/// Centers of every category present in `cube`.
pub fn find_centers(cube: &ClassifiedCube) -> CenterIndex {
    let counts = cube.counts(256);
    let centers = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .filter_map(|(category, _)| {
            let category = category as u8;
            find_center(cube, category).map(|rgb| (category, rgb))
        })
        .collect();
    CenterIndex { centers }
}
