/// Data layer: render cube parsing, bounds, binning and grids.
///
/// Architecture:
/// ```text
///  render_cube.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read lines → RenderCube (header count + sample lines)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ binning   │  scan → Bounds, rescale each sample → pixel index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   grid    │  Grid2 (show, summed) / Grid3 (compare, overwritten)
///   └──────────┘
/// ```

pub mod binning;
pub mod error;
pub mod grid;
pub mod loader;
pub mod model;
