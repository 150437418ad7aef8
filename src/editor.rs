//! The editing engine instance: one owned grid plus tool, view, and drag
//! state.
//!
//! Every grid mutation bumps a revision counter and redraws into the
//! attached [`RenderSink`], so a sink always sees a fully applied mutation,
//! never a partial one. The grid itself is only ever exposed as a cloned
//! snapshot; callers cannot alias the live buffer.

use image::Rgba;

use crate::document::{self, GridDocument};
use crate::grid::{Grid, GridError, TRANSPARENT};
use crate::input::{self, SurfaceMetrics};
use crate::raster::{self, OverlayLine, RasterError, RenderSink};
use crate::tools::{Tool, ToolController};
use crate::transform;

/// Pointer drag lifecycle. Move events are only honored between a down and
/// the matching up or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Active,
}

/// A pixel editing engine instance.
///
/// Owns its grid exclusively; no cross-instance sharing. All mutation entry
/// points are synchronous and leave the grid rectangular.
pub struct Editor {
    grid: Grid,
    tools: ToolController,
    surface: SurfaceMetrics,
    show_grid: bool,
    drag: DragState,
    sink: Option<Box<dyn RenderSink>>,
    revision: u64,
}

impl Editor {
    /// Create an editor over a fresh transparent grid.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::new(width, height)?))
    }

    /// Create an editor owning an existing grid.
    pub fn from_grid(grid: Grid) -> Self {
        Editor {
            grid,
            tools: ToolController::new(),
            surface: SurfaceMetrics::native(1),
            show_grid: false,
            drag: DragState::Idle,
            sink: None,
            revision: 0,
        }
    }

    // --- view of the grid ---

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Read a single cell; `None` when out of bounds.
    pub fn cell(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        self.grid.get(x, y)
    }

    /// A cloned snapshot of the grid, sharing no storage with the editor.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    /// Monotonically increasing change counter; bumps on every grid
    /// mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- tool and view configuration ---

    pub fn tool(&self) -> Tool {
        self.tools.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.tool = tool;
    }

    pub fn brush_color(&self) -> Rgba<u8> {
        self.tools.brush.color
    }

    pub fn set_brush_color(&mut self, color: Rgba<u8>) {
        self.tools.brush.set_color(color);
    }

    pub fn set_brush_alpha(&mut self, alpha: u8) {
        self.tools.brush.set_alpha(alpha);
    }

    pub fn brush_size(&self) -> u32 {
        self.tools.brush.size
    }

    /// Set the brush size, clamped to at least 1.
    pub fn set_brush_size(&mut self, size: u32) {
        self.tools.brush.set_size(size);
    }

    pub fn display_scale(&self) -> u32 {
        self.surface.display_scale
    }

    /// Set the display scale (pixels per cell), clamped to at least 1.
    /// Purely a rendering parameter; the grid is untouched.
    pub fn set_display_scale(&mut self, scale: u32) {
        self.surface.display_scale = scale.max(1);
        self.redraw();
    }

    /// Replace the surface geometry used for pointer mapping.
    pub fn set_surface(&mut self, mut metrics: SurfaceMetrics) {
        metrics.display_scale = metrics.display_scale.max(1);
        self.surface = metrics;
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
        self.redraw();
    }

    /// Attach the display sink the editor redraws into, and present the
    /// current state immediately.
    pub fn attach_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.sink = Some(sink);
        self.redraw();
    }

    // --- pointer events ---

    /// Begin a drag and apply the active tool at the pointer position.
    pub fn pointer_down(&mut self, pointer_x: f64, pointer_y: f64) {
        self.drag = DragState::Active;
        let (x, y) = input::to_cell(pointer_x, pointer_y, &self.surface);
        if self.tools.apply(&mut self.grid, x, y, false) {
            self.committed();
        }
    }

    /// Continue a drag. Ignored when no drag is active.
    pub fn pointer_move(&mut self, pointer_x: f64, pointer_y: f64) {
        if self.drag != DragState::Active {
            return;
        }
        let (x, y) = input::to_cell(pointer_x, pointer_y, &self.surface);
        if self.tools.apply(&mut self.grid, x, y, true) {
            self.committed();
        }
    }

    /// End a drag. The stroke keeps whatever the last move applied.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Abort a drag (pointer left the surface). No rollback; the partial
    /// stroke stands, and further moves are ignored until a new down.
    pub fn pointer_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    // --- structural operations ---

    /// Resize the grid, optionally preserving the overlapping rectangle.
    pub fn resize(&mut self, width: u32, height: u32, preserve: bool) -> Result<(), GridError> {
        self.grid.resize(width, height, preserve)?;
        self.committed();
        Ok(())
    }

    /// Reset every cell to transparent.
    pub fn clear(&mut self) {
        self.clear_with(TRANSPARENT);
    }

    /// Reset every cell to `fill`.
    pub fn clear_with(&mut self, fill: Rgba<u8>) {
        self.grid.clear(fill);
        self.committed();
    }

    pub fn flip_horizontal(&mut self) {
        self.replace_grid(transform::flip_horizontal(&self.grid));
    }

    pub fn flip_vertical(&mut self) {
        self.replace_grid(transform::flip_vertical(&self.grid));
    }

    pub fn rotate_cw(&mut self) {
        self.replace_grid(transform::rotate_cw(&self.grid));
    }

    pub fn rotate_ccw(&mut self) {
        self.replace_grid(transform::rotate_ccw(&self.grid));
    }

    // --- serialization and export ---

    /// Snapshot the grid into a document; no aliasing with the live grid.
    pub fn export_document(&self) -> GridDocument {
        GridDocument::from_grid(&self.grid)
    }

    /// Serialize the grid to its JSON document string.
    pub fn export_json(&self) -> String {
        document::export_grid(&self.grid)
    }

    /// Replace the grid from a validated document.
    ///
    /// The incoming data is validated in full before the swap, so on
    /// failure the live grid is unchanged.
    pub fn import_document(&mut self, doc: &GridDocument) -> Result<(), GridError> {
        let grid = doc.to_grid()?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Replace the grid from a JSON document string.
    pub fn import_json(&mut self, json: &str) -> Result<(), GridError> {
        let grid = document::import_grid(json)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Encode the grid as PNG bytes at the given integer scale.
    ///
    /// Reads a cloned snapshot, so edits made while the encoded bytes are
    /// in flight cannot corrupt the export.
    pub fn export_png(&self, scale: u32) -> Result<Vec<u8>, RasterError> {
        let snapshot = self.grid.clone();
        raster::encode_png(&raster::rasterize(&snapshot, scale))
    }

    /// The alignment grid overlay for the current scale, or empty when the
    /// overlay is disabled.
    pub fn overlay(&self) -> Vec<OverlayLine> {
        if !self.show_grid {
            return Vec::new();
        }
        raster::overlay_lines(&self.grid, self.surface.display_scale)
    }

    // --- internals ---

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.committed();
    }

    /// Record a completed mutation: bump the revision and redraw.
    fn committed(&mut self) {
        self.revision += 1;
        self.redraw();
    }

    fn redraw(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let frame = raster::rasterize_display(&self.grid, self.surface.display_scale);
        if let Some(sink) = self.sink.as_mut() {
            sink.present(&frame);
        }
    }
}
