use std::io::Cursor;

use color_terms::{ClassifiedCube, ColorTermsError};
use rayon::prelude::*;

use crate::error::TermMapError;

/// Placement of the red planes of a classified cube in a square raster.
///
/// A cube with `levels` steps per channel needs `levels` to be a perfect
/// square: the planes are laid out in a `tiles x tiles` grid, each plane a
/// `levels x levels` block with green down and blue across. Red plane `r`
/// sits in tile column `r % tiles`, tile row `r / tiles`. For the full
/// cube this is 16x16 tiles of 256x256 pixels, a 4096x4096 raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    levels: usize,
    tiles: usize,
}

impl TileLayout {
    pub fn new(levels: usize) -> Result<Self, TermMapError> {
        let tiles = (levels as f64).sqrt().round() as usize;
        if levels < 4 || tiles * tiles != levels {
            return Err(ColorTermsError::InvalidCubeSize(levels).into());
        }
        Ok(Self { levels, tiles })
    }

    /// Layout of a square raster of `side` pixels, if one fits exactly
    pub fn from_side(side: usize) -> Option<Self> {
        let tiles = (side as f64).cbrt().round() as usize;
        if !(2..=16).contains(&tiles) || tiles * tiles * tiles != side {
            return None;
        }
        Some(Self {
            levels: tiles * tiles,
            tiles,
        })
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Raster width and height in pixels
    #[inline]
    pub fn side(&self) -> usize {
        self.tiles * self.levels
    }

    /// Pixel position (x, y) of cube cell (`r`, `g`, `b`)
    #[inline]
    pub fn position(&self, r: usize, g: usize, b: usize) -> (usize, usize) {
        (
            (r % self.tiles) * self.levels + b,
            (r / self.tiles) * self.levels + g,
        )
    }

    /// Cube cell (r, g, b) shown at pixel (`x`, `y`)
    #[inline]
    fn cell(&self, x: usize, y: usize) -> (usize, usize, usize) {
        let r = (y / self.levels) * self.tiles + x / self.levels;
        (r, y % self.levels, x % self.levels)
    }
}

/// Lay the cube's category indices out as raster rows
pub fn flatten(cube: &ClassifiedCube) -> Result<Vec<u8>, TermMapError> {
    let layout = TileLayout::new(cube.levels())?;
    let side = layout.side();
    let mut pixels = vec![0u8; side * side];
    pixels
        .par_chunks_mut(side)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let (r, g, b) = layout.cell(x, y);
                *pixel = cube.get(r, g, b);
            }
        });
    Ok(pixels)
}

/// Rebuild a classified cube from raster rows
pub fn unflatten(pixels: &[u8], layout: TileLayout) -> Result<ClassifiedCube, TermMapError> {
    let side = layout.side();
    if pixels.len() != side * side {
        return Err(TermMapError::PngDecode(format!(
            "expected {} pixels, got {}",
            side * side,
            pixels.len()
        )));
    }
    let n = layout.levels();
    let mut indices = vec![0u8; n * n * n];
    indices
        .par_chunks_mut(n * n)
        .enumerate()
        .for_each(|(r, plane)| {
            for g in 0..n {
                for b in 0..n {
                    let (x, y) = layout.position(r, g, b);
                    plane[g * n + b] = pixels[y * side + x];
                }
            }
        });
    Ok(ClassifiedCube::from_raw(n, indices)?)
}

/// 8-bit grayscale PNG holding raw category indices
pub fn encode_grey(pixels: &[u8], side: usize, optimize: bool) -> Result<Vec<u8>, TermMapError> {
    let png = encode_png(side, png::ColorType::Grayscale, None, pixels)?;
    Ok(if optimize { recompress(png) } else { png })
}

/// 8-bit indexed PNG painting each category with its display color
///
/// `palette` is flattened RGB, one triple per category index.
pub fn encode_palette(
    pixels: &[u8],
    side: usize,
    palette: &[u8],
    optimize: bool,
) -> Result<Vec<u8>, TermMapError> {
    if palette.is_empty() || palette.len() % 3 != 0 || palette.len() > 256 * 3 {
        return Err(TermMapError::PngEncode(format!(
            "invalid palette of {} bytes",
            palette.len()
        )));
    }
    let png = encode_png(side, png::ColorType::Indexed, Some(palette), pixels)?;
    Ok(if optimize { recompress(png) } else { png })
}

fn encode_png(
    side: usize,
    color_type: png::ColorType,
    plte: Option<&[u8]>,
    pixels: &[u8],
) -> Result<Vec<u8>, TermMapError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, side as u32, side as u32);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| TermMapError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(pixels)
            .map_err(|e| TermMapError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress with oxipng, keeping color type, depth and palette order so
/// pixel values stay category indices.
fn recompress(png_bytes: Vec<u8>) -> Vec<u8> {
    let options = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        bit_depth_reduction: false,
        color_type_reduction: false,
        palette_reduction: false,
        grayscale_reduction: false,
        ..Default::default()
    };
    match oxipng::optimize_from_memory(&png_bytes, &options) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping fast encoding");
            png_bytes
        }
    }
}

/// A decoded term map raster
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRaster {
    pub side: usize,
    /// One category index per pixel, row-major
    pub pixels: Vec<u8>,
    /// Flattened RGB palette of an indexed PNG
    pub palette: Option<Vec<u8>>,
}

/// Decode a grayscale or indexed term map PNG.
///
/// Sub-byte depths are unpacked so every pixel comes out as its raw value.
pub fn decode(bytes: &[u8]) -> Result<DecodedRaster, TermMapError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|e| TermMapError::PngDecode(e.to_string()))?;
    let palette = reader.info().palette.as_ref().map(|p| p.to_vec());
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| TermMapError::PngDecode(e.to_string()))?;

    if info.width != info.height {
        return Err(TermMapError::UnsupportedDimensions {
            width: info.width,
            height: info.height,
        });
    }
    match info.color_type {
        png::ColorType::Grayscale | png::ColorType::Indexed => {}
        other => {
            return Err(TermMapError::PngDecode(format!(
                "expected grayscale or indexed image, got {other:?}"
            )))
        }
    }
    let bits = match info.bit_depth {
        png::BitDepth::One => 1,
        png::BitDepth::Two => 2,
        png::BitDepth::Four => 4,
        png::BitDepth::Eight => 8,
        png::BitDepth::Sixteen => {
            return Err(TermMapError::PngDecode(
                "16-bit term maps are not supported".to_string(),
            ))
        }
    };

    let side = info.width as usize;
    buf.truncate(info.buffer_size());
    let pixels = if bits == 8 {
        buf
    } else {
        unpack_nbits(&buf, side, info.line_size, bits)
    };
    Ok(DecodedRaster {
        side,
        pixels,
        palette: if info.color_type == png::ColorType::Indexed {
            palette
        } else {
            None
        },
    })
}

/// Unpack N-bit PNG row data (1, 2, or 4 bits per pixel) to one byte each.
fn unpack_nbits(packed: &[u8], width: usize, line_size: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let mask = (1u8 << bits) - 1;
    let mut pixels = Vec::with_capacity(width * (packed.len() / line_size.max(1)));
    for row in packed.chunks(line_size) {
        for x in 0..width {
            let byte = row[x / pixels_per_byte];
            let shift = (8 - bits) - (x % pixels_per_byte) as u8 * bits;
            pixels.push((byte >> shift) & mask);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped_cube(levels: usize) -> ClassifiedCube {
        let indices = (0..levels * levels * levels)
            .map(|i| (i % 7) as u8)
            .collect();
        ClassifiedCube::from_raw(levels, indices).unwrap()
    }

    #[test]
    fn test_full_cube_layout() {
        let layout = TileLayout::new(256).unwrap();
        assert_eq!(layout.side(), 4096);
        assert_eq!(layout.position(0, 0, 0), (0, 0));
        assert_eq!(layout.position(17, 3, 5), (256 + 5, 256 + 3));
        assert_eq!(layout.position(255, 255, 255), (4095, 4095));
    }

    #[test]
    fn test_non_square_levels_rejected() {
        assert!(TileLayout::new(24).is_err());
        assert!(TileLayout::new(1).is_err());
    }

    #[test]
    fn test_from_side() {
        assert_eq!(TileLayout::from_side(4096), TileLayout::new(256).ok());
        assert_eq!(TileLayout::from_side(64), TileLayout::new(16).ok());
        assert_eq!(TileLayout::from_side(100), None);
    }

    #[test]
    fn test_flatten_places_planes() {
        let cube = striped_cube(16);
        let pixels = flatten(&cube).unwrap();
        let layout = TileLayout::new(16).unwrap();
        for (r, g, b) in [(0, 0, 0), (5, 9, 2), (15, 15, 15), (4, 0, 11)] {
            let (x, y) = layout.position(r, g, b);
            assert_eq!(pixels[y * 64 + x], cube.get(r, g, b));
        }
        assert_eq!(unflatten(&pixels, layout).unwrap(), cube);
    }

    #[test]
    fn test_grey_png_keeps_indices() {
        let cube = striped_cube(16);
        let pixels = flatten(&cube).unwrap();
        let png = encode_grey(&pixels, 64, true).unwrap();
        let decoded = decode(&png).unwrap();
        assert_eq!(decoded.side, 64);
        assert_eq!(decoded.pixels, pixels);
        assert_eq!(decoded.palette, None);
    }

    #[test]
    fn test_palette_png_keeps_order() {
        let cube = striped_cube(16);
        let pixels = flatten(&cube).unwrap();
        let palette: Vec<u8> = (0..7u8).flat_map(|i| [i * 30, 255 - i * 30, 7]).collect();
        let png = encode_palette(&pixels, 64, &palette, true).unwrap();
        let decoded = decode(&png).unwrap();
        assert_eq!(decoded.pixels, pixels);
        let decoded_palette = decoded.palette.unwrap();
        assert_eq!(&decoded_palette[..palette.len()], &palette[..]);
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(encode_palette(&[0; 64 * 64], 64, &[], false).is_err());
    }

    #[test]
    fn test_unpack_nbits() {
        // Two rows of 3 pixels at 2 bits: 0b00_01_10_00, 0b11_10_01_00
        let packed = [0b0001_1000, 0b1110_0100];
        assert_eq!(unpack_nbits(&packed, 3, 1, 2), vec![0, 1, 2, 3, 2, 1]);
    }
}
