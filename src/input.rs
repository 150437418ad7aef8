//! Pointer-to-cell coordinate mapping.
//!
//! Pointer events arrive in the rendering surface's own coordinate space.
//! The surface may additionally be displayed at a different size than its
//! backing buffer (CSS/device scaling), so the mapping first rescales the
//! origin-relative offset by the buffer-to-displayed ratio and then divides
//! by the display scale, flooring toward negative infinity.

/// Geometry of the rendering surface a pointer event is relative to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Surface top-left in pointer coordinates.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Display pixels per grid cell.
    pub display_scale: u32,
    /// Ratio of buffer resolution to displayed resolution, per axis.
    /// 1.0 when the surface is shown at its native size.
    pub ratio_x: f64,
    pub ratio_y: f64,
}

impl SurfaceMetrics {
    /// Metrics for a surface at pointer origin shown at native size.
    pub fn native(display_scale: u32) -> Self {
        SurfaceMetrics {
            origin_x: 0.0,
            origin_y: 0.0,
            display_scale: display_scale.max(1),
            ratio_x: 1.0,
            ratio_y: 1.0,
        }
    }
}

/// Map a pointer position to grid cell coordinates.
///
/// The result may lie outside the grid (including negative cells); callers
/// rely on the grid's bounds-safe accessors to ignore those.
pub fn to_cell(pointer_x: f64, pointer_y: f64, metrics: &SurfaceMetrics) -> (i32, i32) {
    let scale = metrics.display_scale.max(1) as f64;
    let cell_x = ((pointer_x - metrics.origin_x) * metrics.ratio_x / scale).floor();
    let cell_y = ((pointer_y - metrics.origin_y) * metrics.ratio_y / scale).floor();
    (cell_x as i32, cell_y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_scale_mapping() {
        let m = SurfaceMetrics::native(10);
        assert_eq!(to_cell(0.0, 0.0, &m), (0, 0));
        assert_eq!(to_cell(9.9, 9.9, &m), (0, 0));
        assert_eq!(to_cell(10.0, 25.0, &m), (1, 2));
    }

    #[test]
    fn test_origin_offset() {
        let m = SurfaceMetrics { origin_x: 100.0, origin_y: 50.0, ..SurfaceMetrics::native(8) };
        assert_eq!(to_cell(100.0, 50.0, &m), (0, 0));
        assert_eq!(to_cell(123.0, 66.0, &m), (2, 2));
    }

    #[test]
    fn test_negative_cells_floor() {
        // Pointer left of / above the surface floors toward negative
        let m = SurfaceMetrics::native(10);
        assert_eq!(to_cell(-0.5, -0.5, &m), (-1, -1));
        assert_eq!(to_cell(-10.0, 5.0, &m), (-1, 0));
    }

    #[test]
    fn test_displayed_size_ratio() {
        // Buffer is 160px wide but displayed at 320px: ratio 0.5, so a
        // click at displayed x=40 hits buffer x=20, cell 2 at scale 10
        let m = SurfaceMetrics {
            ratio_x: 0.5,
            ratio_y: 0.5,
            ..SurfaceMetrics::native(10)
        };
        assert_eq!(to_cell(40.0, 40.0, &m), (2, 2));
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let m = SurfaceMetrics { display_scale: 0, ..SurfaceMetrics::native(1) };
        assert_eq!(to_cell(3.0, 4.0, &m), (3, 4));
    }
}
