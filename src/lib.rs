//! Pixedit - headless pixel grid editing engine
//!
//! This library provides functionality to:
//! - Own and validate a rectangular 2-D RGBA cell grid
//! - Apply drawing tools (pencil, eraser, flood fill, eyedropper)
//! - Flip and rotate the grid in place
//! - Rasterize the grid to PNG at integer scale
//! - Round-trip the grid through a JSON document format

pub mod cli;
pub mod color;
pub mod document;
pub mod editor;
pub mod grid;
pub mod input;
pub mod raster;
pub mod tools;
pub mod transform;
