use ndarray::Array2;
use num::complex::Complex;

use crate::coord::Resolution;
use crate::grid::{Tile, TileResult};

/// Base of the outer logarithm in the smoothing term.
const SMOOTHING_BASE: f64 = 1e11;

/// Fills one tile buffer. Implementations own no shared state: the
/// dispatcher clones one solver per worker thread.
pub trait Solver: Clone + Send + 'static {
    fn solve(&self, tile: &Tile) -> TileResult;
}

/// Escape-time evaluator for z <- z^2 + c with a fixed iteration budget.
#[derive(Clone, Debug)]
pub struct EscapeSolver {
    iterations: u32,
    threshold: f64,
}

impl EscapeSolver {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            threshold: 2.0,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Finite scores wrap modulo this period, so they lie in
    /// `[0, iterations / 5)`. The divisor is fractional unless the budget
    /// divides by five.
    pub fn score_period(&self) -> f64 {
        f64::from(self.iterations) / 5.0
    }

    /// Smoothed escape time of `c`, or `0.0` when `c` never escapes within
    /// the budget. The double logarithm can go NaN for extreme magnitudes
    /// of `z`; the NaN is returned as-is rather than clamped.
    pub fn escape(&self, c: Complex<f64>) -> f64 {
        let mut z = Complex::new(0.0, 0.0);
        let mut i = 0;
        while z.norm() < self.threshold && i < self.iterations {
            z = (z * z) + c;
            i += 1;
        }
        if i == self.iterations {
            return 0.0;
        }
        let nu = (z.norm().ln() / SMOOTHING_BASE.ln()).ln() / std::f64::consts::LN_2;
        (f64::from(i) + 1.0 - nu).rem_euclid(self.score_period())
    }
}

impl Default for EscapeSolver {
    fn default() -> Self {
        Self::new(200)
    }
}

impl Solver for EscapeSolver {
    /// Renders the tile row by row. The pixel at (col, row) maps to
    /// `(x.min + col * x_step, y.min + row * y_step)`; row 0 of the buffer
    /// corresponds to the low edge of the imaginary axis.
    fn solve(&self, tile: &Tile) -> TileResult {
        let Resolution { width, height } = tile.resolution;
        let x_step = tile.frame.x.length() / width as f64;
        let y_step = tile.frame.y.length() / height as f64;
        let mut scores = Array2::zeros((height, width));
        for ((row, col), score) in scores.indexed_iter_mut() {
            let c = Complex::new(
                tile.frame.x.min + col as f64 * x_step,
                tile.frame.y.min + row as f64 * y_step,
            );
            *score = self.escape(c);
        }
        TileResult {
            scores,
            index: tile.index,
        }
    }
}
