use super::error::CubeError;
use super::grid::{Grid2, Grid3};
use super::model::{Axis, RenderCube, SampleLine};

/// Show-mode grid width (x pixels).
pub const SHOW_X_PIXELS: usize = 50;
/// Show-mode grid height (y pixels).
pub const SHOW_Y_PIXELS: usize = 724;
/// Compare-mode grid shape `[x, y, l]`.
pub const COMPARE_SHAPE: [usize; 3] = [149, 148, 100];
/// Compare mode bins file lines 5..=999 only, whatever the file length.
pub const COMPARE_SAMPLE_LIMIT: usize = 995;

const SHOW_SEED_MAGNITUDE: f64 = 1e20;
const COMPARE_SEED_MIN_L: f64 = 1000.0;

// ---------------------------------------------------------------------------
// AxisRange / Bounds
// ---------------------------------------------------------------------------

/// Closed `[min, max]` range of one coordinate column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64) -> Self {
        AxisRange { min, max }
    }

    fn include(self, v: f64) -> Self {
        AxisRange {
            min: self.min.min(v),
            max: self.max.max(v),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Half the distance between neighbouring pixel centres.
    pub fn half_pixel(&self, pixels: usize) -> f64 {
        self.span() / (pixels - 1) as f64 / 2.0
    }

    /// Map a coordinate onto `0..pixels` by min-max rescaling, rounding ties to even.
    ///
    /// The range must be non-degenerate; see [`Bounds::ensure_spans`].
    pub fn bin(&self, v: f64, pixels: usize) -> usize {
        self.scaled(v, pixels).round_ties_even() as usize
    }

    /// Pixel whose cell contains `v`, or `None` outside the half-pixel margins.
    pub fn locate(&self, v: f64, pixels: usize) -> Option<usize> {
        let f = self.scaled(v, pixels).round_ties_even();
        (f >= 0.0 && f < pixels as f64).then_some(f as usize)
    }

    fn scaled(&self, v: f64, pixels: usize) -> f64 {
        (v - self.min) / self.span() * (pixels - 1) as f64
    }
}

/// Coordinate bounds of a cube, computed once by a full pass over its lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: AxisRange,
    pub y: AxisRange,
    pub l: AxisRange,
}

impl Bounds {
    /// Starting point for show mode: every real coordinate tightens it.
    pub const SHOW_SEED: Bounds = Bounds {
        x: AxisRange::new(SHOW_SEED_MAGNITUDE, -SHOW_SEED_MAGNITUDE),
        y: AxisRange::new(SHOW_SEED_MAGNITUDE, -SHOW_SEED_MAGNITUDE),
        l: AxisRange::new(SHOW_SEED_MAGNITUDE, -SHOW_SEED_MAGNITUDE),
    };

    /// Starting point for compare mode. Seed values can survive the scan:
    /// if every x lies above 149, the minimum x stays 149.
    pub fn compare_seed() -> Bounds {
        let [nx, ny, _] = COMPARE_SHAPE;
        Bounds {
            x: AxisRange::new(nx as f64, 0.0),
            y: AxisRange::new(ny as f64, 0.0),
            l: AxisRange::new(COMPARE_SEED_MIN_L, 0.0),
        }
    }

    /// Widen `seed` by the `(x, y, l)` columns of every line.
    pub fn scan(lines: &[SampleLine], seed: Bounds) -> Result<Bounds, CubeError> {
        if lines.is_empty() {
            return Err(CubeError::NoSamples);
        }
        lines.iter().try_fold(seed, |b, line| {
            let [x, y, l] = line.coords()?;
            Ok(Bounds {
                x: b.x.include(x),
                y: b.y.include(y),
                l: b.l.include(l),
            })
        })
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::L => self.l,
        }
    }

    /// Reject any of `axes` whose range collapsed to a single value.
    pub fn ensure_spans(&self, axes: &[Axis]) -> Result<(), CubeError> {
        for &axis in axes {
            let range = self.range(axis);
            if !(range.span() > 0.0) {
                return Err(CubeError::DegenerateAxis {
                    axis,
                    value: range.min,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rasterization
// ---------------------------------------------------------------------------

/// Show-mode result: accumulated `[y][x]` grid plus the bounds used to bin it.
#[derive(Debug, Clone)]
pub struct ShowRaster {
    pub grid: Grid2,
    pub bounds: Bounds,
}

/// Compare-mode result: last-write-wins `[x][y][l]` grid plus its bounds.
#[derive(Debug, Clone)]
pub struct CompareRaster {
    pub grid: Grid3,
    pub bounds: Bounds,
}

/// Bin every sample into a `724 x 50` grid, summing values that share a pixel.
pub fn rasterize_show(cube: &RenderCube) -> Result<ShowRaster, CubeError> {
    let bounds = Bounds::scan(&cube.lines, Bounds::SHOW_SEED)?;
    bounds.ensure_spans(&[Axis::X, Axis::Y])?;
    log::debug!("show bounds: {bounds:?}");

    let mut grid = Grid2::zeros(SHOW_Y_PIXELS, SHOW_X_PIXELS);
    for line in &cube.lines {
        let s = line.sample()?;
        let px = bounds.x.bin(s.x, SHOW_X_PIXELS);
        let py = bounds.y.bin(s.y, SHOW_Y_PIXELS);
        grid.add(py, px, s.value);
    }
    Ok(ShowRaster { grid, bounds })
}

/// Bin the first 995 samples into a `149 x 148 x 100` grid, later samples
/// overwriting earlier ones. Bounds still come from every line in the file.
pub fn rasterize_compare(cube: &RenderCube) -> Result<CompareRaster, CubeError> {
    let bounds = Bounds::scan(&cube.lines, Bounds::compare_seed())?;
    bounds.ensure_spans(&[Axis::X, Axis::Y, Axis::L])?;
    log::debug!("compare bounds: {bounds:?}");

    let [nx, ny, nl] = COMPARE_SHAPE;
    let mut grid = Grid3::zeros(COMPARE_SHAPE);
    for line in cube.lines.iter().take(COMPARE_SAMPLE_LIMIT) {
        let s = line.sample()?;
        let index = [
            bounds.x.bin(s.x, nx),
            bounds.y.bin(s.y, ny),
            bounds.l.bin(s.l, nl),
        ];
        grid.set(index, s.value);
    }
    if cube.len() > COMPARE_SAMPLE_LIMIT {
        log::info!(
            "compare mode binned {COMPARE_SAMPLE_LIMIT} of {} sample lines",
            cube.len()
        );
    }
    Ok(CompareRaster { grid, bounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_cube;

    fn cube(samples: &[&str]) -> RenderCube {
        let mut text = format!("header\n{}\nh\nh\nh\n", samples.len());
        for s in samples {
            text.push_str(s);
            text.push('\n');
        }
        parse_cube(&text).unwrap()
    }

    #[test]
    fn test_bin_rounds_half_to_even() {
        // 98 units over 49 pixel gaps: every odd coordinate lands on .5
        let r = AxisRange::new(0.0, 98.0);
        assert_eq!(r.bin(1.0, 50), 0);
        assert_eq!(r.bin(3.0, 50), 2);
        assert_eq!(r.bin(5.0, 50), 2);
        assert_eq!(r.bin(7.0, 50), 4);
        assert_eq!(r.bin(98.0, 50), 49);
    }

    #[test]
    fn test_half_pixel() {
        assert_eq!(AxisRange::new(0.0, 49.0).half_pixel(50), 0.5);
    }

    #[test]
    fn test_locate_respects_half_pixel_margins() {
        let r = AxisRange::new(0.0, 49.0);
        assert_eq!(r.locate(-0.4, 50), Some(0));
        assert_eq!(r.locate(-0.6, 50), None);
        assert_eq!(r.locate(49.4, 50), Some(49));
        assert_eq!(r.locate(49.6, 50), None);
        assert_eq!(r.locate(f64::NAN, 50), None);
    }

    #[test]
    fn test_accumulation_law() {
        let c = cube(&["0 0 1 3.0", "0 0 2 4.0", "1 1 3 0.5"]);
        let raster = rasterize_show(&c).unwrap();
        assert_eq!(raster.grid.get(0, 0), 7.0);
        assert_eq!(raster.grid.get(SHOW_Y_PIXELS - 1, SHOW_X_PIXELS - 1), 0.5);
    }

    #[test]
    fn test_identical_samples_only_is_degenerate() {
        let c = cube(&["2 5 1 3.0", "2 5 1 4.0"]);
        match rasterize_show(&c) {
            Err(CubeError::DegenerateAxis { axis, value }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(value, 2.0);
            }
            other => panic!("expected degenerate axis, got {other:?}"),
        }
    }

    #[test]
    fn test_show_ignores_wavelength_span() {
        let c = cube(&["0 0 7 1.0", "1 1 7 1.0"]);
        assert!(rasterize_show(&c).is_ok());
    }

    #[test]
    fn test_show_bounds_are_tight() {
        let c = cube(&["-3.5 10 500 1", "2.5 20 600 1", "0 15 550 1"]);
        let b = rasterize_show(&c).unwrap().bounds;
        assert_eq!(b.x, AxisRange::new(-3.5, 2.5));
        assert_eq!(b.y, AxisRange::new(10.0, 20.0));
        assert_eq!(b.l, AxisRange::new(500.0, 600.0));
    }

    #[test]
    fn test_indices_stay_in_range() {
        // Deterministic pseudo-random scatter.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        let lines: Vec<String> = (0..500)
            .map(|_| {
                format!(
                    "{} {} {} 1",
                    next() * 40.0 - 20.0,
                    next() * 1e3,
                    400.0 + next() * 300.0
                )
            })
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let c = cube(&refs);
        let b = Bounds::scan(&c.lines, Bounds::SHOW_SEED).unwrap();
        for line in &c.lines {
            let s = line.sample().unwrap();
            assert!(b.x.bin(s.x, SHOW_X_PIXELS) < SHOW_X_PIXELS);
            assert!(b.y.bin(s.y, SHOW_Y_PIXELS) < SHOW_Y_PIXELS);
        }
        // Every sample contributes exactly once.
        let raster = rasterize_show(&c).unwrap();
        let total: f64 = (0..SHOW_Y_PIXELS).map(|r| raster.grid.row(r).iter().sum::<f64>()).sum();
        assert_eq!(total, 500.0);
    }

    #[test]
    fn test_compare_seed_bounds_are_kept() {
        let c = cube(&["200 -5 500 1", "300 -10 600 2"]);
        let b = rasterize_compare(&c).unwrap().bounds;
        assert_eq!(b.x, AxisRange::new(149.0, 300.0));
        assert_eq!(b.y, AxisRange::new(-10.0, 0.0));
        assert_eq!(b.l, AxisRange::new(500.0, 600.0));
    }

    #[test]
    fn test_overwrite_law_last_write_wins() {
        let c = cube(&["0 0 0 3.0", "0 0 0 4.0", "149 148 1000 1.0"]);
        let raster = rasterize_compare(&c).unwrap();
        assert_eq!(raster.grid.get([0, 0, 0]), 4.0);
        assert_eq!(raster.grid.get([148, 147, 99]), 1.0);
    }

    #[test]
    fn test_compare_reads_at_most_995_lines() {
        let mut lines: Vec<String> = (0..COMPARE_SAMPLE_LIMIT)
            .map(|_| "0 0 0 1.0".to_string())
            .collect();
        // Beyond the cutoff: widens the bounds but is never binned.
        lines.push("298 296 2000 9.0".to_string());
        lines.push("298 296 2000 9.0".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let c = cube(&refs);
        assert_eq!(c.lines[COMPARE_SAMPLE_LIMIT - 1].number, 999);

        let raster = rasterize_compare(&c).unwrap();
        assert_eq!(raster.bounds.x.max, 298.0);
        assert_eq!(raster.grid.get([148, 147, 99]), 0.0);
        assert_eq!(raster.grid.get([0, 0, 0]), 1.0);
        let touched = raster.grid.cells().iter().filter(|v| **v != 0.0).count();
        assert_eq!(touched, 1);
    }

    #[test]
    fn test_malformed_value_past_cutoff_is_not_read() {
        let mut lines: Vec<String> = (0..COMPARE_SAMPLE_LIMIT)
            .map(|i| format!("{} {} {} 1.0", i % 3, i % 5, i % 7))
            .collect();
        lines.push("1 1 1 not-a-number".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        assert!(rasterize_compare(&cube(&refs)).is_ok());
        assert!(matches!(
            rasterize_show(&cube(&refs)),
            Err(CubeError::BadField { column: 3, .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        for bad in ["inf 5 1 1.0", "nan 5 1 1.0"] {
            let c = cube(&["0 0 1 3.0", "10 10 1 4.0", bad]);
            assert!(
                matches!(
                    rasterize_show(&c),
                    Err(CubeError::NonFinite { line: 8, column: 0, .. })
                ),
                "{bad}"
            );
            assert!(matches!(
                rasterize_compare(&c),
                Err(CubeError::NonFinite { column: 0, .. })
            ));
        }
    }

    #[test]
    fn test_compare_degenerate_axis() {
        // Every x is 0 and the compare seed max is 0 as well.
        let c = cube(&["0 1 1 1.0", "0 2 2 1.0"]);
        match rasterize_compare(&c) {
            Err(CubeError::DegenerateAxis { axis, value }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(value, 0.0);
            }
            other => panic!("expected degenerate axis, got {other:?}"),
        }
    }

    #[test]
    fn test_no_samples() {
        assert!(matches!(rasterize_show(&cube(&[])), Err(CubeError::NoSamples)));
        assert!(matches!(
            rasterize_compare(&cube(&[])),
            Err(CubeError::NoSamples)
        ));
    }
}
