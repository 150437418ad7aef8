//! Drawing tools applied to a grid: pencil, eraser, flood fill, eyedropper.
//!
//! Tool application takes grid-space cell coordinates (already mapped from
//! pointer coordinates by [`crate::input`]) plus a `continuous` flag that is
//! true for drag-continuation samples. Flood fill only evaluates on discrete
//! pointer-down events; repeating it at every intermediate mouse-move sample
//! would be redundant work.

use image::Rgba;

use crate::grid::{Grid, TRANSPARENT};

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Eyedropper,
}

/// Brush state shared by the pencil and fill tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Color written by pencil strokes and flood fills.
    pub color: Rgba<u8>,
    /// Side length of the square pencil/eraser footprint, at least 1.
    pub size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Brush { color: Rgba([0, 0, 0, 255]), size: 1 }
    }
}

impl Brush {
    /// Set the brush size, clamped to at least 1.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }

    /// Replace the brush color, alpha included.
    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    /// Set the alpha channel independently of RGB.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.color[3] = alpha;
    }
}

/// Stateful tool application over a grid.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    pub tool: Tool,
    pub brush: Brush,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the active tool at cell `(x, y)`.
    ///
    /// `continuous` is true for drag-continuation samples: flood fill and
    /// the eyedropper only act on discrete pointer-down events, while the
    /// pencil and eraser act on every sample.
    ///
    /// Returns whether the grid was mutated.
    pub fn apply(&mut self, grid: &mut Grid, x: i32, y: i32, continuous: bool) -> bool {
        match self.tool {
            Tool::Pencil => stamp(grid, x, y, self.brush.size, self.brush.color),
            Tool::Eraser => stamp(grid, x, y, self.brush.size, TRANSPARENT),
            Tool::Fill => {
                if continuous {
                    return false;
                }
                flood_fill(grid, x, y, self.brush.color)
            }
            Tool::Eyedropper => {
                if !continuous {
                    if let Some(sampled) = grid.get(x, y) {
                        // Full RGBA is copied, alpha included: sampling a
                        // translucent cell makes subsequent strokes translucent
                        self.brush.color = sampled;
                    }
                }
                false
            }
        }
    }
}

/// Write `color` into the square footprint of side `size` centered at
/// `(x, y)`, silently skipping cells outside the grid.
///
/// Returns whether any cell was written.
pub fn stamp(grid: &mut Grid, x: i32, y: i32, size: u32, color: Rgba<u8>) -> bool {
    let half = (size.max(1) / 2) as i32;
    let mut changed = false;
    for cy in (y - half)..=(y + half) {
        for cx in (x - half)..=(x + half) {
            if grid.set(cx, cy, color) {
                changed = true;
            }
        }
    }
    changed
}

/// Iterative 4-connected flood fill from `(x, y)` with `target`.
///
/// Uses an explicit stack rather than recursion so that fill depth is
/// bounded by heap memory, not the call stack, on large grids. A fill whose
/// seed cell already equals `target` is a no-op, as is a seed outside the
/// grid.
///
/// Returns whether any cell was written.
pub fn flood_fill(grid: &mut Grid, x: i32, y: i32, target: Rgba<u8>) -> bool {
    let src = match grid.get(x, y) {
        Some(c) => c,
        None => return false,
    };
    if src == target {
        return false;
    }

    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        match grid.get(cx, cy) {
            Some(c) if c == src => {}
            _ => continue,
        }
        grid.set(cx, cy, target);
        stack.push((cx - 1, cy));
        stack.push((cx + 1, cy));
        stack.push((cx, cy - 1));
        stack.push((cx, cy + 1));
    }
    true
}
