use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};

use crate::color::{render_heatmap, ColorScale};
use crate::data::grid::Grid2;

/// Heatmap raster enlarged `factor` times with nearest-neighbour sampling.
pub fn heatmap_png(grid: &Grid2, factor: u32) -> RgbaImage {
    let img = render_heatmap(grid, &ColorScale::for_grid(grid));
    if factor <= 1 {
        return img;
    }
    let (w, h) = img.dimensions();
    imageops::resize(&img, w * factor, h * factor, FilterType::Nearest)
}

/// Write the heatmap as PNG, whatever extension `path` carries.
pub fn save_png(grid: &Grid2, path: &Path, factor: u32) -> Result<()> {
    let img = heatmap_png(grid, factor);
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing heatmap to {}", path.display()))?;
    log::info!(
        "Saved {}x{} heatmap to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
