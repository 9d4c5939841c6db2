//! On-disk cache of the device cube's Lab coordinates
//!
//! Converting all 16.7M device colors takes long enough to keep the result
//! around between runs. The cache is advisory: anything unreadable, stale
//! or corrupt is recomputed and rewritten.
//!
//! File layout (little endian): magic `LABCUBE1`, format version `u32`,
//! levels `u32`, space key length `u8` and bytes, then one `f32` L, a, b
//! triple per cube entry in `r, g, b` order.

use std::path::{Path, PathBuf};
use std::time::Instant;

use color_terms::{LabCube, WorkingSpace, CUBE_LEVELS};
use rayon::prelude::*;

use crate::error::TermMapError;

const MAGIC: &[u8; 8] = b"LABCUBE1";
const FORMAT_VERSION: u32 = 1;
const ENTRY_BYTES: usize = 12;

/// Where a Lab cube came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Read from the cache file
    Loaded,
    /// Computed and written to the cache
    Computed,
    /// Computed; caching is off or the file could not be written
    Uncached,
}

/// Lab cube cache rooted in a directory
#[derive(Debug, Clone)]
pub struct CubeCache {
    dir: PathBuf,
    enabled: bool,
}

impl CubeCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// A cache that never reads or writes
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Cache file for `space` at `levels` steps per channel
    pub fn path(&self, space: &WorkingSpace, levels: usize) -> PathBuf {
        let name = if levels == CUBE_LEVELS {
            format!("labcube_{}.bin", space.key())
        } else {
            format!("labcube_{}_{}.bin", space.key(), levels)
        };
        self.dir.join(name)
    }

    /// Load the cube for `space`, computing (and storing) it when needed
    pub fn load_or_compute(
        &self,
        space: &WorkingSpace,
        levels: usize,
    ) -> Result<(LabCube, CacheOutcome), TermMapError> {
        if !self.enabled {
            return Ok((compute(space, levels)?, CacheOutcome::Uncached));
        }

        let path = self.path(space, levels);
        if path.exists() {
            match load(&path, space, levels) {
                Ok(cube) => {
                    tracing::info!(path = %path.display(), space = space.key(), "Loaded Lab cube cache");
                    return Ok((cube, CacheOutcome::Loaded));
                }
                Err(e) => tracing::warn!(%e, path = %path.display(), "Ignoring Lab cube cache"),
            }
        } else {
            tracing::debug!(path = %path.display(), "No Lab cube cache");
        }

        let cube = compute(space, levels)?;
        match store(&path, &cube, space) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Wrote Lab cube cache");
                Ok((cube, CacheOutcome::Computed))
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to write Lab cube cache");
                Ok((cube, CacheOutcome::Uncached))
            }
        }
    }
}

fn compute(space: &WorkingSpace, levels: usize) -> Result<LabCube, TermMapError> {
    let started = Instant::now();
    let cube = LabCube::compute_levels(space, levels)?;
    tracing::info!(
        space = space.key(),
        levels,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Computed Lab cube"
    );
    Ok(cube)
}

/// Serialize a cube with its space key
pub fn encode(cube: &LabCube, space: &WorkingSpace) -> Vec<u8> {
    let key = space.key().as_bytes();
    let mut bytes = Vec::with_capacity(MAGIC.len() + 9 + key.len() + cube.len() * ENTRY_BYTES);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(cube.levels() as u32).to_le_bytes());
    bytes.push(key.len() as u8);
    bytes.extend_from_slice(key);

    let body: Vec<u8> = cube
        .as_slice()
        .par_iter()
        .flat_map_iter(|lab| lab.iter().flat_map(|v| v.to_le_bytes()))
        .collect();
    bytes.extend_from_slice(&body);
    bytes
}

fn stale(reason: impl Into<String>) -> TermMapError {
    TermMapError::Cache(reason.into())
}

/// Parse a cache file, checking it was written for `space` and `levels`
pub fn decode(bytes: &[u8], space: &WorkingSpace, levels: usize) -> Result<LabCube, TermMapError> {
    let read_u32 = |at: usize| -> Result<u32, TermMapError> {
        bytes
            .get(at..at + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .ok_or_else(|| stale("truncated header"))
    };

    if bytes.get(..MAGIC.len()) != Some(MAGIC.as_slice()) {
        return Err(stale("not a Lab cube cache"));
    }
    let version = read_u32(8)?;
    if version != FORMAT_VERSION {
        return Err(stale(format!("format version {version}, expected {FORMAT_VERSION}")));
    }
    let stored_levels = read_u32(12)? as usize;
    if stored_levels != levels {
        return Err(stale(format!("{stored_levels} levels, expected {levels}")));
    }
    let key_len = *bytes.get(16).ok_or_else(|| stale("truncated header"))? as usize;
    let key = bytes
        .get(17..17 + key_len)
        .ok_or_else(|| stale("truncated header"))?;
    if key != space.key().as_bytes() {
        return Err(stale(format!(
            "written for {}, expected {}",
            String::from_utf8_lossy(key),
            space.key()
        )));
    }

    let body = &bytes[17 + key_len..];
    let expected = levels * levels * levels * ENTRY_BYTES;
    if body.len() != expected {
        return Err(stale(format!("{} data bytes, expected {expected}", body.len())));
    }

    let lab: Vec<[f32; 3]> = body
        .par_chunks_exact(ENTRY_BYTES)
        .map(|c| {
            let value = |i: usize| f32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]]);
            [value(0), value(4), value(8)]
        })
        .collect();
    if lab.par_iter().any(|entry| entry.iter().any(|v| !v.is_finite())) {
        return Err(stale("non-finite coordinate"));
    }
    Ok(LabCube::from_raw(levels, lab)?)
}

pub fn load(path: &Path, space: &WorkingSpace, levels: usize) -> Result<LabCube, TermMapError> {
    decode(&std::fs::read(path)?, space, levels)
}

/// Write via a temporary file so readers never see a partial cache
pub fn store(path: &Path, cube: &LabCube, space: &WorkingSpace) -> Result<(), TermMapError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("bin.tmp");
    std::fs::write(&tmp, encode(cube, space))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
