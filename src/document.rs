//! JSON document round-trip for grids.
//!
//! The wire format is `{"width": W, "height": H, "matrix": [[[r,g,b,a], ...], ...]}`,
//! row-major. Import is all-or-nothing: validation failures surface as
//! [`MalformedGrid`] with the offending row/cell, and the caller's live grid
//! is never touched.

use image::Rgba;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grid::{Grid, GridError, MalformedGrid};

/// A plain structural snapshot of a grid.
///
/// The matrix holds raw JSON values so that validation can report the exact
/// offending cell instead of a generic deserialization failure. Channel
/// values are clamped to `[0, 255]` on import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridDocument {
    pub width: u32,
    pub height: u32,
    pub matrix: Vec<Vec<Vec<Value>>>,
}

impl GridDocument {
    /// Snapshot a grid into a document. The result shares no storage with
    /// the live grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let matrix = grid
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.0.iter().map(|&c| Value::from(c)).collect())
                    .collect()
            })
            .collect();
        GridDocument {
            width: grid.width(),
            height: grid.height(),
            matrix,
        }
    }

    /// Validate the document and build a grid from it.
    ///
    /// Checks, in order: non-empty matrix, rectangular rows, declared
    /// dimensions matching the matrix, and four numeric channels per cell.
    /// Channels are clamped to `[0, 255]`.
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        if self.matrix.is_empty() || self.matrix[0].is_empty() {
            return Err(MalformedGrid::Empty.into());
        }

        let matrix_width = self.matrix[0].len();
        for (row_idx, row) in self.matrix.iter().enumerate() {
            if row.len() != matrix_width {
                return Err(MalformedGrid::RaggedRow {
                    row: row_idx,
                    expected: matrix_width,
                    actual: row.len(),
                }
                .into());
            }
        }

        let matrix_height = self.matrix.len();
        if self.width as usize != matrix_width || self.height as usize != matrix_height {
            return Err(MalformedGrid::SizeMismatch {
                declared_width: self.width,
                declared_height: self.height,
                matrix_width: matrix_width as u32,
                matrix_height: matrix_height as u32,
            }
            .into());
        }

        let mut rows = Vec::with_capacity(matrix_height);
        for (row_idx, row) in self.matrix.iter().enumerate() {
            let mut cells = Vec::with_capacity(matrix_width);
            for (col_idx, cell) in row.iter().enumerate() {
                if cell.len() != 4 {
                    return Err(MalformedGrid::ChannelArity {
                        row: row_idx,
                        col: col_idx,
                        expected: 4,
                        actual: cell.len(),
                    }
                    .into());
                }
                let mut channels = [0u8; 4];
                for (chan_idx, value) in cell.iter().enumerate() {
                    let n = value.as_f64().ok_or(MalformedGrid::NonNumericChannel {
                        row: row_idx,
                        col: col_idx,
                        channel: chan_idx,
                    })?;
                    channels[chan_idx] = n.clamp(0.0, 255.0).round() as u8;
                }
                cells.push(Rgba(channels));
            }
            rows.push(cells);
        }

        Grid::from_rows(rows)
    }
}

/// Parse a document from a JSON string.
///
/// Structural failures (missing fields, a cell that is not an array) map to
/// [`MalformedGrid::Document`].
pub fn parse_document(json: &str) -> Result<GridDocument, GridError> {
    serde_json::from_str(json).map_err(|e| MalformedGrid::Document(e.to_string()).into())
}

/// Parse and validate a JSON string directly into a grid.
pub fn import_grid(json: &str) -> Result<Grid, GridError> {
    parse_document(json)?.to_grid()
}

/// Serialize a grid to its JSON document string.
pub fn export_grid(grid: &Grid) -> String {
    // GridDocument only holds numbers and arrays, serialization cannot fail
    serde_json::to_string(&GridDocument::from_grid(grid)).unwrap_or_default()
}

/// Serialize a grid to pretty-printed JSON, for files meant to be read.
pub fn export_grid_pretty(grid: &Grid) -> String {
    serde_json::to_string_pretty(&GridDocument::from_grid(grid)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_roundtrip() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(0, 0, Rgba([255, 0, 0, 255]));
        grid.set(2, 1, Rgba([0, 255, 0, 128]));

        let json = export_grid(&grid);
        let restored = import_grid(&json).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_document_shape() {
        let grid = Grid::new(2, 1).unwrap();
        let json = export_grid(&grid);
        assert!(json.contains(r#""width":2"#));
        assert!(json.contains(r#""height":1"#));
        assert!(json.contains(r#""matrix":[[[0,0,0,0],[0,0,0,0]]]"#));
    }

    #[test]
    fn test_import_clamps_channels() {
        let json = r#"{"width":1,"height":1,"matrix":[[[300,-5,12.6,255]]]}"#;
        let grid = import_grid(json).unwrap();
        assert_eq!(grid.get(0, 0), Some(Rgba([255, 0, 13, 255])));
    }

    #[test]
    fn test_import_wrong_channel_arity() {
        // Second cell of row 0 has 4 channels, first has 3
        let json = r#"{"width":2,"height":2,"matrix":[[[1,2,3],[4,5,6,7]],[[0,0,0,0],[0,0,0,0]]]}"#;
        let err = import_grid(json).unwrap_err();
        assert_eq!(
            err,
            GridError::MalformedGrid(MalformedGrid::ChannelArity {
                row: 0,
                col: 0,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_import_ragged_rows() {
        let json =
            r#"{"width":2,"height":2,"matrix":[[[0,0,0,0],[0,0,0,0]],[[0,0,0,0]]]}"#;
        let err = import_grid(json).unwrap_err();
        assert_eq!(
            err,
            GridError::MalformedGrid(MalformedGrid::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_import_size_mismatch() {
        let json = r#"{"width":3,"height":1,"matrix":[[[0,0,0,0],[0,0,0,0]]]}"#;
        let err = import_grid(json).unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedGrid(MalformedGrid::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_import_empty_matrix() {
        let json = r#"{"width":0,"height":0,"matrix":[]}"#;
        assert_eq!(
            import_grid(json).unwrap_err(),
            GridError::MalformedGrid(MalformedGrid::Empty)
        );
    }

    #[test]
    fn test_import_non_numeric_channel() {
        let json = r#"{"width":1,"height":1,"matrix":[[[0,"zero",0,255]]]}"#;
        assert_eq!(
            import_grid(json).unwrap_err(),
            GridError::MalformedGrid(MalformedGrid::NonNumericChannel {
                row: 0,
                col: 0,
                channel: 1,
            })
        );
    }

    #[test]
    fn test_import_not_a_document() {
        let err = import_grid("[1,2,3]").unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedGrid(MalformedGrid::Document(_))
        ));
    }

    #[test]
    fn test_snapshot_does_not_alias() {
        let mut grid = Grid::new(1, 1).unwrap();
        let doc = GridDocument::from_grid(&grid);
        grid.set(0, 0, Rgba([9, 9, 9, 9]));
        // The earlier snapshot still holds the original value
        assert!(doc.matrix[0][0].iter().all(|v| v.as_u64() == Some(0)));
    }
}
