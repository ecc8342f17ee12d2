use ndarray::Array2;
use tracing::info;

use crate::grid::TileGrid;
use crate::solver::EscapeSolver;
use crate::threads::TileDispatcher;

pub mod bench;
pub mod coord;
pub mod error;
pub mod grid;
pub mod painter;
pub mod solver;
pub mod threads;

pub use crate::coord::{Frame, Resolution};
pub use crate::error::RenderError;

/// Immutable configuration for one render, fixed at startup and passed by
/// reference from there on.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub frame: Frame<f64>,
    pub resolution: Resolution,
    pub iterations: u32,
    pub workers: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            resolution: Resolution::new(4500, 3000),
            iterations: 200,
            workers: 4,
        }
    }
}

/// Renders the configured region of the complex plane: partitions it into a
/// square tile grid, renders every tile on its own worker thread, and
/// stitches the unordered results back into one score buffer. The output is
/// deterministic for fixed settings regardless of worker scheduling.
pub fn render(settings: &RenderSettings) -> Result<Array2<f64>, RenderError> {
    let grid = TileGrid::new(settings.resolution, settings.workers)?;
    let tiles = grid.tiles(&settings.frame);
    info!(
        tiles = grid.tile_count(),
        pixels = grid.output_resolution().pixels(),
        iterations = settings.iterations,
        "dispatching tile workers"
    );
    let results = TileDispatcher::new(EscapeSolver::new(settings.iterations)).render_all(tiles)?;
    grid.assemble(results)
}
