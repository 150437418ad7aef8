//! Geometric transforms over grids.
//!
//! All transforms are pure functions of the input grid; the editor swaps
//! the result in atomically. Rotations swap the grid dimensions.
//!
//! Supports both direct calls and string syntax for the CLI
//! (`"flip-h"`, `"rotate:90"`, with aliases).

use image::Rgba;
use thiserror::Error;

use crate::grid::{Grid, TRANSPARENT};

/// Errors from parsing a transform operation string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformParseError {
    /// Unknown transform operation
    #[error("unknown transform operation: {0}")]
    UnknownOperation(String),
    /// Invalid rotation degrees (must be 90 or 270)
    #[error("invalid rotation degrees: {0} (must be 90 or 270)")]
    InvalidRotation(String),
}

/// A transform operation on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    FlipHorizontal,
    FlipVertical,
    RotateCw,
    RotateCcw,
}

impl TransformOp {
    /// Apply this operation to a grid, producing the transformed grid.
    pub fn apply(self, grid: &Grid) -> Grid {
        match self {
            TransformOp::FlipHorizontal => flip_horizontal(grid),
            TransformOp::FlipVertical => flip_vertical(grid),
            TransformOp::RotateCw => rotate_cw(grid),
            TransformOp::RotateCcw => rotate_ccw(grid),
        }
    }
}

/// Parse a transform from string syntax: `"flip-h"`, `"rotate:90"`.
///
/// # Alias Resolution
/// - `flip-h`, `mirror-h`, `fliph` → `FlipHorizontal`
/// - `flip-v`, `mirror-v`, `flipv` → `FlipVertical`
/// - `rotate:90`, `rot:90`, `cw` → `RotateCw`
/// - `rotate:270`, `rot:270`, `rotate:-90`, `ccw` → `RotateCcw`
pub fn parse_transform_str(s: &str) -> Result<TransformOp, TransformParseError> {
    let s = s.trim();

    let (op, params) = if let Some(idx) = s.find(':') {
        (&s[..idx], Some(&s[idx + 1..]))
    } else {
        (s, None)
    };

    match op.to_lowercase().as_str() {
        "flip-h" | "mirror-h" | "fliph" => Ok(TransformOp::FlipHorizontal),
        "flip-v" | "mirror-v" | "flipv" => Ok(TransformOp::FlipVertical),
        "cw" => Ok(TransformOp::RotateCw),
        "ccw" => Ok(TransformOp::RotateCcw),
        "rotate" | "rot" => match params.map(str::trim) {
            Some("90") => Ok(TransformOp::RotateCw),
            Some("270") | Some("-90") => Ok(TransformOp::RotateCcw),
            other => Err(TransformParseError::InvalidRotation(
                other.unwrap_or("").to_string(),
            )),
        },
        _ => Err(TransformParseError::UnknownOperation(op.to_string())),
    }
}

/// Reverse each row's cell order. Dimensions are unchanged.
pub fn flip_horizontal(grid: &Grid) -> Grid {
    let rows: Vec<Vec<Rgba<u8>>> = grid
        .rows()
        .iter()
        .map(|row| row.iter().rev().copied().collect())
        .collect();
    // Input was rectangular and non-empty, so the result is too
    Grid::from_rows(rows).expect("flip preserves grid shape")
}

/// Reverse the row order. Dimensions are unchanged.
pub fn flip_vertical(grid: &Grid) -> Grid {
    let rows: Vec<Vec<Rgba<u8>>> = grid.rows().iter().rev().cloned().collect();
    Grid::from_rows(rows).expect("flip preserves grid shape")
}

/// Rotate +90 degrees. Source `(x, y)` maps to `(height-1-y, x)`; the
/// result has the dimensions swapped.
pub fn rotate_cw(grid: &Grid) -> Grid {
    let (w, h) = (grid.width() as usize, grid.height() as usize);
    let mut rows = vec![vec![TRANSPARENT; h]; w];
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            rows[x][h - 1 - y] = cell;
        }
    }
    Grid::from_rows(rows).expect("rotation preserves grid shape")
}

/// Rotate -90 degrees. Source `(x, y)` maps to `(y, width-1-x)`; the
/// result has the dimensions swapped.
pub fn rotate_ccw(grid: &Grid) -> Grid {
    let (w, h) = (grid.width() as usize, grid.height() as usize);
    let mut rows = vec![vec![TRANSPARENT; h]; w];
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            rows[w - 1 - x][y] = cell;
        }
    }
    Grid::from_rows(rows).expect("rotation preserves grid shape")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a grid whose cells encode their own (x, y) position.
    fn coordinate_grid(width: u32, height: u32) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                grid.set(x, y, Rgba([x as u8, y as u8, 0, 255]));
            }
        }
        grid
    }

    #[test]
    fn test_parse_transform_aliases() {
        assert_eq!(parse_transform_str("flip-h").unwrap(), TransformOp::FlipHorizontal);
        assert_eq!(parse_transform_str("MIRROR-H").unwrap(), TransformOp::FlipHorizontal);
        assert_eq!(parse_transform_str("flip-v").unwrap(), TransformOp::FlipVertical);
        assert_eq!(parse_transform_str("rotate:90").unwrap(), TransformOp::RotateCw);
        assert_eq!(parse_transform_str("rot:270").unwrap(), TransformOp::RotateCcw);
        assert_eq!(parse_transform_str("rotate:-90").unwrap(), TransformOp::RotateCcw);
        assert_eq!(parse_transform_str("cw").unwrap(), TransformOp::RotateCw);
        assert_eq!(parse_transform_str("ccw").unwrap(), TransformOp::RotateCcw);
    }

    #[test]
    fn test_parse_transform_invalid() {
        assert_eq!(
            parse_transform_str("rotate:45"),
            Err(TransformParseError::InvalidRotation("45".to_string()))
        );
        assert!(parse_transform_str("rotate").is_err());
        assert_eq!(
            parse_transform_str("shear"),
            Err(TransformParseError::UnknownOperation("shear".to_string()))
        );
    }

    #[test]
    fn test_flip_horizontal() {
        let grid = coordinate_grid(3, 2);
        let flipped = flip_horizontal(&grid);
        assert_eq!(flipped.width(), 3);
        assert_eq!(flipped.height(), 2);
        assert_eq!(flipped.get(0, 0), grid.get(2, 0));
        assert_eq!(flipped.get(2, 1), grid.get(0, 1));
        assert_eq!(flipped.get(1, 0), grid.get(1, 0));
    }

    #[test]
    fn test_flip_vertical() {
        let grid = coordinate_grid(2, 3);
        let flipped = flip_vertical(&grid);
        assert_eq!(flipped.get(0, 0), grid.get(0, 2));
        assert_eq!(flipped.get(1, 2), grid.get(1, 0));
        assert_eq!(flipped.get(0, 1), grid.get(0, 1));
    }

    #[test]
    fn test_flip_idempotence() {
        let grid = coordinate_grid(4, 3);
        assert_eq!(flip_horizontal(&flip_horizontal(&grid)), grid);
        assert_eq!(flip_vertical(&flip_vertical(&grid)), grid);
    }

    #[test]
    fn test_rotate_cw_dimension_swap() {
        // 2x3 grid rotated CW becomes 3x2; cell at (0,0) lands at (2,0)
        let grid = coordinate_grid(2, 3);
        let rotated = rotate_cw(&grid);
        assert_eq!(rotated.width(), 3);
        assert_eq!(rotated.height(), 2);
        assert_eq!(rotated.get(2, 0), grid.get(0, 0));
    }

    #[test]
    fn test_rotate_ccw_mapping() {
        let grid = coordinate_grid(2, 3);
        let rotated = rotate_ccw(&grid);
        assert_eq!(rotated.width(), 3);
        assert_eq!(rotated.height(), 2);
        // Source (x, y) lands at (y, width-1-x)
        assert_eq!(rotated.get(0, 1), grid.get(0, 0));
        assert_eq!(rotated.get(2, 0), grid.get(1, 2));
    }

    #[test]
    fn test_rotation_round_trip() {
        let grid = coordinate_grid(5, 3);
        assert_eq!(rotate_ccw(&rotate_cw(&grid)), grid);
        assert_eq!(
            rotate_cw(&rotate_cw(&rotate_cw(&rotate_cw(&grid)))),
            grid
        );
        assert_eq!(
            rotate_ccw(&rotate_ccw(&rotate_ccw(&rotate_ccw(&grid)))),
            grid
        );
    }

    #[test]
    fn test_transform_op_apply() {
        let grid = coordinate_grid(3, 3);
        assert_eq!(TransformOp::FlipHorizontal.apply(&grid), flip_horizontal(&grid));
        assert_eq!(TransformOp::RotateCw.apply(&grid), rotate_cw(&grid));
    }
}
