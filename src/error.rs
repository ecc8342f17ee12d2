use thiserror::Error;

/// Fatal render failures. Configuration problems are caught before any tile
/// is dispatched; the tile variants indicate a defect in the partitioner or
/// dispatcher rather than a condition a caller can recover from. NaN scores
/// are not errors and never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("worker count {0} is not a perfect square")]
    WorkerCount(usize),

    #[error("a {side}x{side} tile grid does not fit a {width}x{height} pixel image")]
    GridTooFine {
        side: usize,
        width: usize,
        height: usize,
    },

    #[error("tile ({row}, {col}) is outside the grid")]
    UnknownTile { row: usize, col: usize },

    #[error("tile ({row}, {col}) was delivered more than once")]
    DuplicateTile { row: usize, col: usize },

    #[error("tile ({row}, {col}) was never delivered")]
    MissingTile { row: usize, col: usize },

    #[error("tile ({row}, {col}) has the wrong dimensions")]
    TileShape { row: usize, col: usize },

    #[error("a render worker exited without delivering its tile")]
    WorkerLost,
}
