//! Rasterization of grids to RGBA pixel buffers and PNG.
//!
//! The native raster maps one grid cell to one pixel; integer magnification
//! replicates each cell into a `scale x scale` block with nearest-neighbor
//! resampling so pixel edges stay crisp. The display raster additionally
//! composites a checkerboard beneath transparent content, and the grid
//! overlay is produced as display-only line segments that are never baked
//! into exports.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{ImageOutputFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::grid::Grid;

/// Light square of the transparency checkerboard.
pub const CHECKER_LIGHT: Rgba<u8> = Rgba([204, 204, 204, 255]);
/// Dark square of the transparency checkerboard.
pub const CHECKER_DARK: Rgba<u8> = Rgba([153, 153, 153, 255]);

/// Error type for raster output operations.
#[derive(Debug, Error)]
pub enum RasterError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A display surface the editor redraws into after every mutation.
///
/// Implementations own the actual presentation technology (a window, a
/// terminal, a test buffer); the engine only hands them finished frames.
pub trait RenderSink {
    fn present(&mut self, frame: &RgbaImage);
}

/// Render the grid at native resolution, one pixel per cell, preserving
/// alpha exactly. This is the export path.
pub fn render_native(grid: &Grid) -> RgbaImage {
    let mut image = RgbaImage::new(grid.width(), grid.height());
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            image.put_pixel(x as u32, y as u32, cell);
        }
    }
    image
}

/// Render the grid for display: transparent content is composited over a
/// per-cell checkerboard so the result is fully opaque. Grids with no
/// transparency skip the checkerboard pass entirely.
pub fn render_display(grid: &Grid) -> RgbaImage {
    if grid.is_fully_opaque() {
        return render_native(grid);
    }
    let mut image = RgbaImage::new(grid.width(), grid.height());
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let background = if (x + y) % 2 == 0 { CHECKER_LIGHT } else { CHECKER_DARK };
            image.put_pixel(x as u32, y as u32, composite_over(background, cell));
        }
    }
    image
}

/// Alpha-composite `src` over an opaque `dst` cell.
fn composite_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src[3] as u32;
    let inv = 255 - a;
    let blend = |s: u8, d: u8| (((s as u32) * a + (d as u32) * inv + 127) / 255) as u8;
    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        255,
    ])
}

/// Scale an image by an integer factor using nearest-neighbor resampling.
///
/// Returns the image unchanged for factors of 0 or 1.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Render the grid to an export raster of `width*scale x height*scale`
/// pixels, alpha preserved.
pub fn rasterize(grid: &Grid, scale: u32) -> RgbaImage {
    scale_image(render_native(grid), scale)
}

/// Render the grid to a display raster at the given scale, checkerboard
/// composited beneath transparent content.
pub fn rasterize_display(grid: &Grid, scale: u32) -> RgbaImage {
    scale_image(render_display(grid), scale)
}

/// A display-space line segment of the alignment grid overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLine {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Line segments at every cell boundary, in display pixels.
///
/// Purely a display concern: sinks draw these over the presented frame,
/// and they never appear in exported rasters.
pub fn overlay_lines(grid: &Grid, scale: u32) -> Vec<OverlayLine> {
    let scale = scale.max(1);
    let (w, h) = (grid.width() * scale, grid.height() * scale);
    let mut lines = Vec::with_capacity((grid.width() + grid.height() + 2) as usize);
    for col in 0..=grid.width() {
        let x = col * scale;
        lines.push(OverlayLine { x0: x, y0: 0, x1: x, y1: h });
    }
    for row in 0..=grid.height() {
        let y = row * scale;
        lines.push(OverlayLine { x0: 0, y0: y, x1: w, y1: y });
    }
    lines
}

/// Encode an image as PNG bytes.
///
/// Encoding is deterministic: the same image always produces the same
/// bytes, which callers rely on for reproducible exports.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), RasterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    image.save(path)?;
    Ok(())
}
