// ---------------------------------------------------------------------------
// Dense pixel grids
// ---------------------------------------------------------------------------

/// Row-major 2D grid indexed `[row][col]`, i.e. `[y][x]` in show mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2 {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Grid2 {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Grid2 {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    /// Accumulate `value` into a cell.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.cols + col] += value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Largest cell value, ignoring NaN. `None` for an empty grid.
    pub fn max(&self) -> Option<f64> {
        self.cells
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }
}

/// 3D grid indexed `[x][y][l]`, with `l` varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3 {
    shape: [usize; 3],
    cells: Vec<f64>,
}

impl Grid3 {
    pub fn zeros(shape: [usize; 3]) -> Self {
        Grid3 {
            shape,
            cells: vec![0.0; shape[0] * shape[1] * shape[2]],
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    fn offset(&self, [x, y, l]: [usize; 3]) -> usize {
        (x * self.shape[1] + y) * self.shape[2] + l
    }

    pub fn get(&self, index: [usize; 3]) -> f64 {
        self.cells[self.offset(index)]
    }

    /// Overwrite a cell.
    pub fn set(&mut self, index: [usize; 3], value: f64) {
        let i = self.offset(index);
        self.cells[i] = value;
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Arithmetic mean over every cell, untouched zeros included.
    pub fn mean(&self) -> f64 {
        pairwise_sum(&self.cells) / self.cells.len() as f64
    }

    /// Root-mean-square difference over every cell.
    ///
    /// # Panics
    /// If the two grids differ in shape.
    pub fn rmse(&self, other: &Grid3) -> f64 {
        assert_eq!(self.shape, other.shape, "RMSE needs grids of equal shape");
        let squares: Vec<f64> = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| (a - b).powi(2))
            .collect();
        (pairwise_sum(&squares) / self.cells.len() as f64).sqrt()
    }

    /// Elementwise `self / denominator`. Zero denominators give NaN or ±inf.
    ///
    /// # Panics
    /// If the two grids differ in shape.
    pub fn ratio(&self, denominator: &Grid3) -> Grid3 {
        assert_eq!(
            self.shape, denominator.shape,
            "ratio needs grids of equal shape"
        );
        Grid3 {
            shape: self.shape,
            cells: self
                .cells
                .iter()
                .zip(&denominator.cells)
                .map(|(n, d)| n / d)
                .collect(),
        }
    }
}

const PAIRWISE_BLOCK: usize = 128;

/// Pairwise summation: error grows with `log n` instead of `n`.
///
/// Blocks of up to 128 values are summed with eight interleaved
/// accumulators; longer slices are split in two at a multiple of eight.
fn pairwise_sum(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 8 {
        values.iter().fold(0.0, |acc, v| acc + v)
    } else if n <= PAIRWISE_BLOCK {
        let mut r = [0.0; 8];
        r.copy_from_slice(&values[..8]);
        let unrolled = n - n % 8;
        for chunk in values[8..unrolled].chunks_exact(8) {
            for (acc, v) in r.iter_mut().zip(chunk) {
                *acc += v;
            }
        }
        let mut sum = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for v in &values[unrolled..] {
            sum += v;
        }
        sum
    } else {
        let half = n / 2;
        let half = half - half % 8;
        pairwise_sum(&values[..half]) + pairwise_sum(&values[half..])
    }
}
