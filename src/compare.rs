use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::binning::rasterize_compare;
use crate::data::grid::Grid3;
use crate::data::loader::load_file;

// ---------------------------------------------------------------------------
// Comparison statistics
// ---------------------------------------------------------------------------

/// Which grid the reported `mean(1)` is taken from.
///
/// The historical tool printed the mean of the first cube twice;
/// `FirstGridTwice` reproduces that output for side-by-side checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanSource {
    SecondGrid,
    FirstGridTwice,
}

/// Summary of two binned cubes of identical shape.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub mean0: f64,
    pub mean1: f64,
    pub rmse: f64,
    /// Elementwise `grid1 / grid0`.
    pub ratio: Grid3,
}

impl Comparison {
    pub fn from_grids(grid0: &Grid3, grid1: &Grid3, mean_source: MeanSource) -> Self {
        let mean0 = grid0.mean();
        let mean1 = match mean_source {
            MeanSource::SecondGrid => grid1.mean(),
            MeanSource::FirstGridTwice => grid0.mean(),
        };
        Comparison {
            mean0,
            mean1,
            rmse: grid0.rmse(grid1),
            ratio: grid1.ratio(grid0),
        }
    }

    /// Print the statistics followed by the full ratio grid.
    pub fn write_report(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "mean(0): {}", format_value(self.mean0))?;
        writeln!(out, "mean(1): {}", format_value(self.mean1))?;
        writeln!(out, "RMSE(0-1): {}", format_value(self.rmse))?;
        writeln!(out, "RMSE(0-1)/mean(0): {}", format_value(self.rmse / self.mean0))?;
        writeln!(out, "RMSE(0-1)/mean(1): {}", format_value(self.rmse / self.mean1))?;
        write_grid(out, &self.ratio)
    }
}

/// Load, bin and compare two cubes, printing the report to stdout.
pub fn compare_files(path0: &Path, path1: &Path, mean_source: MeanSource) -> Result<()> {
    let mut grids = Vec::with_capacity(2);
    for path in [path0, path1] {
        let cube = load_file(path)?;
        let raster = rasterize_compare(&cube)
            .with_context(|| format!("binning {}", path.display()))?;
        let b = &raster.bounds;
        log::info!(
            "{}: x in [{}, {}], y in [{}, {}], wavelength in [{}, {}]",
            path.display(),
            b.x.min,
            b.x.max,
            b.y.min,
            b.y.max,
            b.l.min,
            b.l.max
        );
        grids.push(raster.grid);
    }

    if mean_source == MeanSource::FirstGridTwice {
        log::warn!("reporting mean(1) from the first cube (legacy output)");
    }
    let comparison = Comparison::from_grids(&grids[0], &grids[1], mean_source);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    comparison
        .write_report(&mut out)
        .and_then(|_| out.flush())
        .context("writing comparison to stdout")
}

// ---------------------------------------------------------------------------
// Output formatting
// ---------------------------------------------------------------------------

/// Shortest round-trip form, switching to scientific notation for very small
/// or very large magnitudes: `0.5`, `1e-05`, `1.5e+16`.
fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    let magnitude = v.abs();
    if v == 0.0 || !v.is_finite() || (1e-4..1e16).contains(&magnitude) {
        return v.to_string();
    }
    let sci = format!("{v:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => sci,
    }
}

/// Nested-bracket dump of a 3D grid, one innermost `l` row per line, every
/// value written out.
fn write_grid(out: &mut impl Write, grid: &Grid3) -> io::Result<()> {
    let [nx, ny, nl] = grid.shape();
    write!(out, "[")?;
    for x in 0..nx {
        if x > 0 {
            write!(out, "\n\n ")?;
        }
        write!(out, "[")?;
        for y in 0..ny {
            if y > 0 {
                write!(out, "\n  ")?;
            }
            write!(out, "[")?;
            for l in 0..nl {
                if l > 0 {
                    write!(out, " ")?;
                }
                write!(out, "{}", format_value(grid.get([x, y, l])))?;
            }
            write!(out, "]")?;
        }
        write!(out, "]")?;
    }
    writeln!(out, "]")
}
