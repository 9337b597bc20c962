use std::path::{Path, PathBuf};

use eframe::egui;

use crate::color::{render_heatmap, ColorScale};
use crate::data::binning::{Bounds, ShowRaster};
use crate::data::grid::Grid2;
use crate::data::model::RenderCube;
use crate::export;

// ---------------------------------------------------------------------------
// Plot extent
// ---------------------------------------------------------------------------

/// Data-space rectangle covered by the heatmap, half a pixel past the
/// outermost sample on every side so pixel centres sit on true coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn for_grid(bounds: &Bounds, grid: &Grid2) -> Self {
        let hx = bounds.x.half_pixel(grid.cols());
        let hy = bounds.y.half_pixel(grid.rows());
        Extent {
            x_min: bounds.x.min - hx,
            x_max: bounds.x.max + hx,
            y_min: bounds.y.min - hy,
            y_max: bounds.y.max + hy,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 2] {
        [self.x_max - self.x_min, self.y_max - self.y_min]
    }
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the show-mode window needs, independent of rendering.
pub struct ViewerState {
    /// Input file; also the plot title.
    pub source: PathBuf,
    pub grid: Grid2,
    pub bounds: Bounds,
    pub extent: Extent,
    pub scale: ColorScale,

    /// Sample count from the file header.
    pub declared_count: i64,
    /// Sample lines actually binned.
    pub sample_count: usize,

    /// Upload of the heatmap raster, created on first paint.
    pub texture: Option<egui::TextureHandle>,

    /// Upscale factor for File → Export PNG…
    pub export_scale: u32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(source: &Path, cube: &RenderCube, raster: ShowRaster, export_scale: u32) -> Self {
        let ShowRaster { grid, bounds } = raster;
        Self {
            source: source.to_path_buf(),
            extent: Extent::for_grid(&bounds, &grid),
            scale: ColorScale::for_grid(&grid),
            grid,
            bounds,
            declared_count: cube.declared_count,
            sample_count: cube.len(),
            texture: None,
            export_scale,
            status_message: None,
        }
    }

    pub fn title(&self) -> String {
        self.source.display().to_string()
    }

    /// Heatmap texture, uploaded on first use.
    pub fn texture(&mut self, ctx: &egui::Context) -> &egui::TextureHandle {
        let (grid, scale) = (&self.grid, &self.scale);
        self.texture.get_or_insert_with(|| {
            let img = render_heatmap(grid, scale);
            let size = [img.width() as usize, img.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
            ctx.load_texture("heatmap", color_image, egui::TextureOptions::NEAREST)
        })
    }

    /// Grid cell under a data-space point: `(x pixel, y pixel, value)`.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize, f64)> {
        let px = self.bounds.x.locate(x, self.grid.cols())?;
        let py = self.bounds.y.locate(y, self.grid.rows())?;
        Some((px, py, self.grid.get(py, px)))
    }

    /// Export the heatmap, reporting failures in the status line.
    pub fn export_png(&mut self, path: &Path) {
        match export::save_png(&self.grid, path, self.export_scale) {
            Ok(()) => {
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export heatmap: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
