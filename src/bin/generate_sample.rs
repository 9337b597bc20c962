use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Emission blob in the image plane: `(x0, y0, width, peak)`.
type Blob = (f64, f64, f64, f64);

struct CubeRecipe<'a> {
    path: &'a str,
    blobs: &'a [Blob],
    /// Doppler shift of the line centre, in Å.
    shift: f64,
    noise: f64,
}

const X_STEPS: usize = 40;
const Y_STEPS: usize = 60;
const L_STEPS: usize = 8;
const LINE_CENTRE: f64 = 171.073;
const LINE_WIDTH: f64 = 0.02;

fn write_cube(recipe: &CubeRecipe, rng: &mut SimpleRng) -> Result<usize> {
    let mut rows = Vec::with_capacity(X_STEPS * Y_STEPS * L_STEPS);
    for ix in 0..X_STEPS {
        for iy in 0..Y_STEPS {
            // Jitter positions so samples are scattered, not on a lattice.
            let x = -20.0 + 40.0 * ix as f64 / (X_STEPS - 1) as f64 + rng.gauss(0.0, 0.05);
            let y = 100.0 * iy as f64 / (Y_STEPS - 1) as f64 + rng.gauss(0.0, 0.05);
            let spatial: f64 = recipe
                .blobs
                .iter()
                .map(|&(x0, y0, w, peak)| {
                    gaussian(x, x0, w, 1.0) * gaussian(y, y0, w * 2.5, peak)
                })
                .sum();
            for il in 0..L_STEPS {
                let l = LINE_CENTRE - 0.08 + 0.16 * il as f64 / (L_STEPS - 1) as f64;
                let profile = gaussian(l, LINE_CENTRE + recipe.shift, LINE_WIDTH, 1.0);
                let value = (spatial * profile + rng.gauss(0.0, recipe.noise)).max(0.0);
                rows.push((x, y, l, value));
            }
        }
    }

    let file = File::create(recipe.path).with_context(|| format!("creating {}", recipe.path))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "FoMo render cube (synthetic)")?;
    writeln!(out, "{}", rows.len())?;
    writeln!(out, "x[Mm] y[Mm] lambda[A] emissivity")?;
    writeln!(out, "ergs cm^-2 s^-1 sr^-1")?;
    writeln!(out, "----")?;
    for (x, y, l, value) in &rows {
        writeln!(out, "{x} {y} {l} {value:e}")?;
    }
    out.flush()?;
    Ok(rows.len())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let cubes = [
        CubeRecipe {
            path: "sample_cube_a.txt",
            blobs: &[(-5.0, 30.0, 4.0, 2.0e3), (8.0, 70.0, 3.0, 1.2e3)],
            shift: 0.0,
            noise: 5.0,
        },
        CubeRecipe {
            path: "sample_cube_b.txt",
            blobs: &[(-5.0, 30.0, 4.0, 1.8e3), (8.5, 68.0, 3.0, 1.4e3)],
            shift: 0.005,
            noise: 5.0,
        },
    ];

    for recipe in &cubes {
        let n = write_cube(recipe, &mut rng)?;
        println!("Wrote {n} samples to {}", recipe.path);
    }
    Ok(())
}
