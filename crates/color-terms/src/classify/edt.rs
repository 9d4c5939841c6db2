//! Exact squared Euclidean distance transform on a cube
//!
//! Felzenszwalb & Huttenlocher's lower envelope of parabolas, applied once
//! per axis. Every cell ends up with the squared distance to the nearest
//! background cell; cells outside the cube are not background. A cube with
//! no background at all is [`UNREACHABLE`] everywhere.

use rayon::prelude::*;

/// Distance of a cell with no background cell anywhere.
pub const UNREACHABLE: u32 = u32::MAX;

/// Reusable buffers for [`transform_line`].
#[derive(Debug, Default)]
struct Envelope {
    sites: Vec<usize>,
    bounds: Vec<f64>,
    line: Vec<u32>,
}

/// One-dimensional pass over `f`, written to `out`.
fn transform_line(f: &[u32], out: &mut [u32], env: &mut Envelope) {
    let Envelope { sites, bounds, .. } = env;
    sites.clear();
    bounds.clear();

    let height = |q: usize| f[q] as f64 + (q * q) as f64;
    for q in 0..f.len() {
        if f[q] == UNREACHABLE {
            continue;
        }
        while let Some(&p) = sites.last() {
            let s = (height(q) - height(p)) / (2.0 * (q - p) as f64);
            if bounds.last().is_some_and(|&z| s <= z) {
                sites.pop();
                bounds.pop();
            } else {
                sites.push(q);
                bounds.push(s);
                break;
            }
        }
        if sites.is_empty() {
            sites.push(q);
            bounds.push(f64::NEG_INFINITY);
        }
    }

    if sites.is_empty() {
        out.fill(UNREACHABLE);
        return;
    }

    let mut k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while k + 1 < sites.len() && bounds[k + 1] < q as f64 {
            k += 1;
        }
        let d = q.abs_diff(sites[k]) as u32;
        *slot = d * d + f[sites[k]];
    }
}

/// Squared distance to the nearest cell where `inside` is false.
///
/// `inside` is an `n³` mask in `r, g, b` order.
pub fn squared_distances(inside: &[bool], n: usize) -> Vec<u32> {
    let mut grid: Vec<u32> = inside
        .par_iter()
        .map(|&cell| if cell { UNREACHABLE } else { 0 })
        .collect();

    // b axis: contiguous lines.
    grid.par_chunks_mut(n).for_each_init(Envelope::default, |env, line| {
        env.line.clear();
        env.line.extend_from_slice(line);
        let input = std::mem::take(&mut env.line);
        transform_line(&input, line, env);
        env.line = input;
    });

    // g axis: stride n inside each r plane.
    grid.par_chunks_mut(n * n)
        .for_each_init(Envelope::default, |env, plane| {
            let mut input = vec![0u32; n];
            let mut output = vec![0u32; n];
            for b in 0..n {
                for g in 0..n {
                    input[g] = plane[g * n + b];
                }
                transform_line(&input, &mut output, env);
                for g in 0..n {
                    plane[g * n + b] = output[g];
                }
            }
        });

    // r axis: stride n², gathered per (g, b) line and scattered back.
    let lines: Vec<Vec<u32>> = (0..n * n)
        .into_par_iter()
        .map_init(Envelope::default, |env, gb| {
            let input: Vec<u32> = (0..n).map(|r| grid[r * n * n + gb]).collect();
            let mut output = vec![0u32; n];
            transform_line(&input, &mut output, env);
            output
        })
        .collect();
    for (gb, line) in lines.into_iter().enumerate() {
        for (r, value) in line.into_iter().enumerate() {
            grid[r * n * n + gb] = value;
        }
    }

    grid
}
