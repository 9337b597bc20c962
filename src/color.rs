use eframe::egui::Color32;
use image::{Rgba, RgbaImage};
use palette::{LinSrgb, Mix};

use crate::data::grid::Grid2;

// ---------------------------------------------------------------------------
// "Hot" colour map
// ---------------------------------------------------------------------------

/// Breakpoints of the matplotlib `hot` map: black-red, red-yellow, yellow-white.
///
/// The segment data interpolates the encoded channel values directly, so the
/// stops are treated as plain numbers rather than converted to linear light.
const HOT_STOPS: [(f32, [f32; 3]); 4] = [
    (0.0, [0.0416, 0.0, 0.0]),
    (0.365079, [1.0, 0.0, 0.0]),
    (0.746032, [1.0, 1.0, 0.0]),
    (1.0, [1.0, 1.0, 1.0]),
];

/// Look up `t` in `[0, 1]` on the hot map.
pub fn hot(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let upper = HOT_STOPS
        .iter()
        .position(|(pos, _)| t <= *pos)
        .unwrap_or(HOT_STOPS.len() - 1)
        .max(1);
    let (p0, [r0, g0, b0]) = HOT_STOPS[upper - 1];
    let (p1, [r1, g1, b1]) = HOT_STOPS[upper];
    let factor = (t - p0) / (p1 - p0);

    let rgb = LinSrgb::new(r0, g0, b0)
        .mix(LinSrgb::new(r1, g1, b1), factor)
        .into_format::<u8>();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Colour scale: data value → [0, 1]
// ---------------------------------------------------------------------------

/// Linear scale with the lower bound pinned at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorScale {
    /// `vmin = 0`, `vmax` = largest cell.
    pub fn for_grid(grid: &Grid2) -> Self {
        ColorScale {
            vmin: 0.0,
            vmax: grid.max().unwrap_or(0.0),
        }
    }

    /// Position of `v` on the scale, or `None` for NaN cells.
    pub fn normalize(&self, v: f64) -> Option<f32> {
        if v.is_nan() {
            return None;
        }
        let range = self.vmax - self.vmin;
        if !(range > 0.0) {
            return Some(0.0);
        }
        Some(((v - self.vmin) / range).clamp(0.0, 1.0) as f32)
    }

    pub fn color(&self, v: f64) -> Color32 {
        self.normalize(v).map(hot).unwrap_or(Color32::TRANSPARENT)
    }
}

// ---------------------------------------------------------------------------
// Heatmap raster
// ---------------------------------------------------------------------------

/// One image pixel per grid cell, with grid row 0 (minimum y) at the bottom.
pub fn render_heatmap(grid: &Grid2, scale: &ColorScale) -> RgbaImage {
    let width = grid.cols() as u32;
    let height = grid.rows() as u32;
    RgbaImage::from_fn(width, height, |x, y| {
        let row = grid.rows() - 1 - y as usize;
        let c = scale.color(grid.row(row)[x as usize]);
        Rgba([c.r(), c.g(), c.b(), c.a()])
    })
}
