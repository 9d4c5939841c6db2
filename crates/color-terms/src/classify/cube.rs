//! Dense device cubes: Lab coordinates in, category indices out
//!
//! Both cubes are flat arrays in `r, g, b` order (b varies fastest). A cube
//! with `levels` steps per channel samples device values
//! `round(i * 255 / (levels - 1))`; production cubes use all 256 levels.

use rayon::prelude::*;

use crate::color::{math, xyz_to_lab, Rgb8, WorkingSpace};
use crate::error::ColorTermsError;

/// Steps per channel of the full device cube.
pub const CUBE_LEVELS: usize = 256;

/// Entries handled by one parallel work item.
pub const CHUNK_SIZE: usize = 65_536;

/// Device value of cube level `level`.
#[inline]
pub fn level_value(level: usize, levels: usize) -> u8 {
    if levels <= 1 {
        return 0;
    }
    ((level * 255 + (levels - 1) / 2) / (levels - 1)) as u8
}

/// Nearest cube level for device value `value`.
#[inline]
pub fn value_level(value: u8, levels: usize) -> usize {
    if levels <= 1 {
        return 0;
    }
    (value as usize * (levels - 1) + 127) / 255
}

fn check_levels(levels: usize) -> Result<(), ColorTermsError> {
    if (2..=CUBE_LEVELS).contains(&levels) {
        Ok(())
    } else {
        Err(ColorTermsError::InvalidCubeSize(levels))
    }
}

/// Device color of flat index `index` in a cube of `levels` steps.
#[inline]
pub fn index_rgb(index: usize, levels: usize) -> Rgb8 {
    let b = index % levels;
    let g = (index / levels) % levels;
    let r = index / (levels * levels);
    Rgb8::new(
        level_value(r, levels),
        level_value(g, levels),
        level_value(b, levels),
    )
}

/// Lab coordinates of every color of a device cube.
#[derive(Debug, Clone, PartialEq)]
pub struct LabCube {
    levels: usize,
    lab: Vec<[f32; 3]>,
}

impl LabCube {
    /// The full 256-level cube for `space`.
    pub fn compute(space: &WorkingSpace) -> Self {
        Self::compute_levels(space, CUBE_LEVELS).unwrap_or_else(|_| unreachable!())
    }

    /// A cube with `levels` steps per channel (2..=256).
    pub fn compute_levels(space: &WorkingSpace, levels: usize) -> Result<Self, ColorTermsError> {
        check_levels(levels)?;
        let decode = space.decode_table();
        let linear: Vec<f64> = (0..levels)
            .map(|i| decode[level_value(i, levels) as usize])
            .collect();
        let matrix = *space.rgb_to_xyz();
        let white = space.white().white_xyz();

        let mut lab = vec![[0.0f32; 3]; levels * levels * levels];
        lab.par_chunks_mut(CHUNK_SIZE)
            .enumerate()
            .for_each(|(chunk, out)| {
                let start = chunk * CHUNK_SIZE;
                for (offset, slot) in out.iter_mut().enumerate() {
                    let index = start + offset;
                    let b = index % levels;
                    let g = (index / levels) % levels;
                    let r = index / (levels * levels);
                    let xyz = math::mul_vec(&matrix, [linear[r], linear[g], linear[b]]);
                    *slot = xyz_to_lab(xyz, white).to_f32();
                }
            });

        Ok(Self { levels, lab })
    }

    /// Wrap precomputed coordinates.
    ///
    /// `lab` must hold exactly `levels³` triples.
    pub fn from_raw(levels: usize, lab: Vec<[f32; 3]>) -> Result<Self, ColorTermsError> {
        check_levels(levels)?;
        if lab.len() != levels * levels * levels {
            return Err(ColorTermsError::InvalidCubeSize(levels));
        }
        Ok(Self { levels, lab })
    }

    /// Steps per channel.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.lab.len()
    }

    /// Whether the cube has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lab.is_empty()
    }

    /// All coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[[f32; 3]] {
        &self.lab
    }
}

/// Category index of every color of a device cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCube {
    levels: usize,
    indices: Vec<u8>,
}

impl ClassifiedCube {
    /// Wrap category indices.
    ///
    /// `indices` must hold exactly `levels³` entries.
    pub fn from_raw(levels: usize, indices: Vec<u8>) -> Result<Self, ColorTermsError> {
        check_levels(levels)?;
        if indices.len() != levels * levels * levels {
            return Err(ColorTermsError::InvalidCubeSize(levels));
        }
        Ok(Self { levels, indices })
    }

    /// Steps per channel.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the cube has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// All category indices.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.indices
    }

    /// Category at cube levels (`r`, `g`, `b`).
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> u8 {
        self.indices[(r * self.levels + g) * self.levels + b]
    }

    /// Category of a device color, using the nearest cube level per channel.
    pub fn lookup(&self, rgb: Rgb8) -> u8 {
        let level = |v| value_level(v, self.levels);
        self.get(level(rgb.r), level(rgb.g), level(rgb.b))
    }

    /// Occupied cells per category index, `len` entries long.
    ///
    /// Indices at or past `len` are not counted.
    pub fn counts(&self, len: usize) -> Vec<u64> {
        self.indices
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| {
                let mut counts = vec![0u64; len];
                for &index in chunk {
                    if let Some(slot) = counts.get_mut(index as usize) {
                        *slot += 1;
                    }
                }
                counts
            })
            .reduce(
                || vec![0u64; len],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                    a
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_value(0, 256), 0);
        assert_eq!(level_value(200, 256), 200);
        assert_eq!(level_value(15, 16), 255);
        assert_eq!(level_value(1, 16), 17);
        assert_eq!(value_level(17, 16), 1);
        assert_eq!(value_level(255, 16), 15);
        assert_eq!(value_level(123, 256), 123);
        for level in 0..16 {
            assert_eq!(value_level(level_value(level, 16), 16), level);
        }
    }

    #[test]
    fn test_index_rgb() {
        assert_eq!(index_rgb(0, 256), Rgb8::new(0, 0, 0));
        assert_eq!(
            index_rgb(Rgb8::new(1, 2, 3).cube_index(), 256),
            Rgb8::new(1, 2, 3)
        );
        assert_eq!(index_rgb(15, 16), Rgb8::new(0, 0, 255));
    }

    #[test]
    fn test_small_cube_corners() {
        let cube = LabCube::compute_levels(&WorkingSpace::srgb(), 8).unwrap();
        assert_eq!(cube.len(), 512);
        let black = cube.as_slice()[0];
        let white = cube.as_slice()[511];
        assert!(black[0].abs() < 1e-4);
        assert!((white[0] - 100.0).abs() < 1e-3);
        assert!(white[1].abs() < 1e-3 && white[2].abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_levels() {
        assert_eq!(
            LabCube::compute_levels(&WorkingSpace::srgb(), 1),
            Err(ColorTermsError::InvalidCubeSize(1))
        );
        assert_eq!(
            ClassifiedCube::from_raw(4, vec![0; 63]),
            Err(ColorTermsError::InvalidCubeSize(4))
        );
    }

    #[test]
    fn test_counts_and_lookup() {
        let mut indices = vec![0u8; 8];
        indices[7] = 1;
        indices[3] = 1;
        let cube = ClassifiedCube::from_raw(2, indices).unwrap();
        assert_eq!(cube.counts(3), vec![6, 2, 0]);
        assert_eq!(cube.lookup(Rgb8::new(255, 255, 255)), 1);
        assert_eq!(cube.lookup(Rgb8::new(10, 10, 10)), 0);
    }
}
