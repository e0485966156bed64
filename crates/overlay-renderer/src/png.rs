//! PNG encoding for finished overlays.
//!
//! Two encoding modes:
//! - **Indexed PNG (color type 3)** when the raster has ≤256 unique
//!   colors, which overlay output almost always does (palette colors
//!   plus anti-aliased edge blends).
//! - **RGBA PNG (color type 6)** as the fallback.
//!
//! `encode_png` picks automatically; `encode_png_rgba` forces RGBA.

use crate::raster::OverlayRaster;
use overlay_common::{OverlayError, OverlayResult};
use std::collections::HashMap;
use std::io::Write;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Encode an overlay as PNG with automatic format selection.
pub fn encode_png(raster: &OverlayRaster) -> OverlayResult<Vec<u8>> {
    match extract_palette(&raster.data) {
        Some((palette, indices)) => {
            encode_indexed(raster.width, raster.height, &palette, &indices)
        }
        None => encode_png_rgba(raster),
    }
}

/// Pack RGBA bytes into a u32 for hashing.
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Collect the unique colors and per-pixel palette indices. Returns
/// `None` once more than 256 colors are seen.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8, u8)>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<(u8, u8, u8, u8)> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2], chunk[3]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2], chunk[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Encode an indexed PNG (color type 3) from palette and indices.
fn encode_indexed(
    width: u32,
    height: u32,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> OverlayResult<Vec<u8>> {
    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&width.to_be_bytes());
    ihdr_data.extend_from_slice(&height.to_be_bytes());
    ihdr_data.push(8); // bit depth (8 bits per palette index)
    ihdr_data.push(3); // color type 3 = indexed
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // PLTE chunk
    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte_data.push(*r);
        plte_data.push(*g);
        plte_data.push(*b);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk, only when some palette entry is not fully opaque.
    // Overlay backgrounds are transparent so this is the common case.
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    // IDAT chunk: filter byte 0 per scanline, one index byte per pixel
    let mut uncompressed = Vec::with_capacity(height as usize * (1 + width as usize));
    for row in indices.chunks_exact(width as usize) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }
    write_chunk(&mut png, b"IDAT", &deflate(&uncompressed)?);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode an RGBA PNG (color type 6).
pub fn encode_png_rgba(raster: &OverlayRaster) -> OverlayResult<Vec<u8>> {
    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&raster.width.to_be_bytes());
    ihdr_data.extend_from_slice(&raster.height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk: filter byte 0 per scanline
    let row_bytes = raster.width as usize * 4;
    let mut uncompressed = Vec::with_capacity(raster.height as usize * (1 + row_bytes));
    for row in raster.data.chunks_exact(row_bytes) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }
    write_chunk(&mut png, b"IDAT", &deflate(&uncompressed)?);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn deflate(data: &[u8]) -> OverlayResult<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(data)
        .map_err(|e| OverlayError::Render(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| OverlayError::Render(format!("IDAT compression failed: {}", e)))
}

/// Write one PNG chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
