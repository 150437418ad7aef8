//! The canonical 2-D RGBA cell grid and its invariants.
//!
//! A [`Grid`] is always rectangular: `cells.len() == height` and every row
//! holds exactly `width` cells. Operations that change dimensions build a
//! complete replacement buffer and swap it in, so a partially resized or
//! ragged grid is never observable.

use image::Rgba;
use thiserror::Error;

/// Fully transparent cell value, the fill for newly created grids.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for grid construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height was zero on create/resize.
    #[error("invalid dimensions {width}x{height} (width and height must be at least 1)")]
    InvalidDimension { width: u32, height: u32 },
    /// Externally supplied grid data failed validation.
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] MalformedGrid),
}

/// Validation failures for externally supplied grid data.
///
/// Import is all-or-nothing: when any of these is raised the live grid is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGrid {
    /// The input had no rows or no columns.
    #[error("empty grid input")]
    Empty,
    /// A row's length disagreed with the first row / declared width.
    #[error("row {row} has {actual} cells, expected {expected} (rows must have consistent width)")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A cell did not hold exactly four channels.
    #[error("cell ({col},{row}) has {actual} channels, expected {expected}")]
    ChannelArity {
        row: usize,
        col: usize,
        expected: usize,
        actual: usize,
    },
    /// A channel value was not numeric.
    #[error("cell ({col},{row}) channel {channel} is not a number")]
    NonNumericChannel { row: usize, col: usize, channel: usize },
    /// Declared document dimensions disagreed with the matrix.
    #[error("declared size {declared_width}x{declared_height} does not match matrix size {matrix_width}x{matrix_height}")]
    SizeMismatch {
        declared_width: u32,
        declared_height: u32,
        matrix_width: u32,
        matrix_height: u32,
    },
    /// The document could not be deserialized at all.
    #[error("invalid document: {0}")]
    Document(String),
}

/// A rectangular 2-D grid of RGBA cells.
///
/// Cells are indexed `[row][col]` with `(0,0)` at the top-left; `x` is the
/// column and `y` is the row. Reads and writes outside the bounds are
/// sentinel returns (`None` / `false`), never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// 2D array indexed as `cells[y][x]`.
    cells: Vec<Vec<Rgba<u8>>>,
    width: u32,
    height: u32,
}

impl Grid {
    /// Create a grid with every cell fully transparent.
    ///
    /// Returns [`GridError::InvalidDimension`] when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        Self::with_fill(width, height, TRANSPARENT)
    }

    /// Create a grid with every cell set to `fill`.
    pub fn with_fill(width: u32, height: u32, fill: Rgba<u8>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimension { width, height });
        }
        let cells = vec![vec![fill; width as usize]; height as usize];
        Ok(Grid { cells, width, height })
    }

    /// Build a grid from pre-parsed rows, validating rectangularity.
    ///
    /// Channel clamping and arity checks for raw document data happen in
    /// [`crate::document`]; this constructor only enforces the shape
    /// invariant on rows that already hold RGBA cells.
    pub fn from_rows(rows: Vec<Vec<Rgba<u8>>>) -> Result<Self, GridError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(MalformedGrid::Empty.into());
        }
        let width = rows[0].len();
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MalformedGrid::RaggedRow {
                    row: row_idx,
                    expected: width,
                    actual: row.len(),
                }
                .into());
            }
        }
        let height = rows.len() as u32;
        Ok(Grid { cells: rows, width: width as u32, height })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The rows of the grid, indexed `[y][x]`.
    pub fn rows(&self) -> &[Vec<Rgba<u8>>] {
        &self.cells
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Get the cell at `(x, y)`. Returns `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y as usize][x as usize])
    }

    /// Set the cell at `(x, y)`.
    ///
    /// Returns `false` and performs no mutation when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Rgba<u8>) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize][x as usize] = cell;
        true
    }

    /// Resize the grid to `new_width x new_height`.
    ///
    /// When `preserve` is set, the overlapping top-left rectangle is copied
    /// from the old grid; all other cells are transparent. The new buffer
    /// is built in full before replacing the old one.
    pub fn resize(&mut self, new_width: u32, new_height: u32, preserve: bool) -> Result<(), GridError> {
        if new_width == 0 || new_height == 0 {
            return Err(GridError::InvalidDimension { width: new_width, height: new_height });
        }
        let mut next = vec![vec![TRANSPARENT; new_width as usize]; new_height as usize];
        if preserve {
            let copy_w = self.width.min(new_width) as usize;
            let copy_h = self.height.min(new_height) as usize;
            for y in 0..copy_h {
                next[y][..copy_w].copy_from_slice(&self.cells[y][..copy_w]);
            }
        }
        self.cells = next;
        self.width = new_width;
        self.height = new_height;
        Ok(())
    }

    /// Set every cell to `fill` without changing dimensions.
    pub fn clear(&mut self, fill: Rgba<u8>) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = fill;
            }
        }
    }

    /// Whether every cell has alpha 255.
    ///
    /// Used by the rasterizer to skip the checkerboard background pass.
    pub fn is_fully_opaque(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|c| c[3] == 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_transparent() {
        let grid = Grid::new(3, 2).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y), Some(TRANSPARENT));
            }
        }
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            Grid::new(0, 4),
            Err(GridError::InvalidDimension { width: 0, height: 4 })
        );
        assert_eq!(
            Grid::new(4, 0),
            Err(GridError::InvalidDimension { width: 4, height: 0 })
        );
        assert!(Grid::new(0, 0).is_err());
    }

    #[test]
    fn test_with_fill() {
        let red = Rgba([255, 0, 0, 255]);
        let grid = Grid::with_fill(2, 2, red).unwrap();
        assert_eq!(grid.get(1, 1), Some(red));
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut grid = Grid::new(4, 4).unwrap();
        let blue = Rgba([0, 0, 255, 255]);
        assert!(grid.set(2, 3, blue));
        assert_eq!(grid.get(2, 3), Some(blue));
    }

    #[test]
    fn test_bounds_safety() {
        let mut grid = Grid::new(4, 4).unwrap();
        let c = Rgba([1, 2, 3, 4]);
        assert!(!grid.set(-1, 0, c));
        assert!(!grid.set(4, 0, c));
        assert!(!grid.set(0, -1, c));
        assert!(!grid.set(0, 4, c));
        assert_eq!(grid.get(4, 4), None);
        assert_eq!(grid.get(-1, -1), None);
        // No mutation happened
        assert_eq!(grid, Grid::new(4, 4).unwrap());
    }

    #[test]
    fn test_from_rows_rectangular() {
        let rows = vec![
            vec![Rgba([1, 1, 1, 255]), Rgba([2, 2, 2, 255])],
            vec![Rgba([3, 3, 3, 255]), Rgba([4, 4, 4, 255])],
        ];
        let grid = Grid::from_rows(rows).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), Some(Rgba([2, 2, 2, 255])));
    }

    #[test]
    fn test_from_rows_empty() {
        assert_eq!(
            Grid::from_rows(vec![]),
            Err(GridError::MalformedGrid(MalformedGrid::Empty))
        );
        assert_eq!(
            Grid::from_rows(vec![vec![]]),
            Err(GridError::MalformedGrid(MalformedGrid::Empty))
        );
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![
            vec![TRANSPARENT, TRANSPARENT],
            vec![TRANSPARENT],
        ];
        assert_eq!(
            Grid::from_rows(rows),
            Err(GridError::MalformedGrid(MalformedGrid::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1,
            }))
        );
    }

    #[test]
    fn test_resize_preserve_overlap() {
        let mut grid = Grid::new(3, 3).unwrap();
        let red = Rgba([255, 0, 0, 255]);
        grid.set(0, 0, red);
        grid.set(2, 2, red);

        grid.resize(2, 4, true).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 4);
        // Overlap kept
        assert_eq!(grid.get(0, 0), Some(red));
        // (2,2) fell outside the new width
        assert_eq!(grid.get(2, 2), None);
        // New cells are transparent
        assert_eq!(grid.get(1, 3), Some(TRANSPARENT));
    }

    #[test]
    fn test_resize_without_preserve_discards() {
        let mut grid = Grid::with_fill(2, 2, Rgba([9, 9, 9, 255])).unwrap();
        grid.resize(3, 3, false).unwrap();
        assert_eq!(grid, Grid::new(3, 3).unwrap());
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut grid = Grid::new(2, 2).unwrap();
        let before = grid.clone();
        assert!(grid.resize(0, 5, true).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_keeps_dimensions() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 1, Rgba([7, 7, 7, 255]));
        let green = Rgba([0, 255, 0, 255]);
        grid.clear(green);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y), Some(green));
            }
        }
    }

    #[test]
    fn test_is_fully_opaque() {
        let mut grid = Grid::with_fill(2, 2, Rgba([0, 0, 0, 255])).unwrap();
        assert!(grid.is_fully_opaque());
        grid.set(1, 0, Rgba([0, 0, 0, 254]));
        assert!(!grid.is_fully_opaque());
    }
}
