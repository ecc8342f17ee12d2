use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::error::RenderError;
use crate::grid::{Tile, TileResult};
use crate::solver::Solver;

/// Largest perfect square no greater than the physical core count; a usable
/// worker count when the caller has no preference.
pub fn default_workers() -> usize {
    let side = ((num_cpus::get_physical() as f64).sqrt() as usize).max(1);
    side * side
}

/// Runs one worker thread per tile and collects the finished buffers over a
/// shared channel. Collection is a full barrier: nothing is returned until
/// every tile has been delivered, and a worker dying loses the whole render.
pub struct TileDispatcher<S> {
    solver: S,
}

impl<S> TileDispatcher<S>
where
    S: Solver,
{
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    pub fn render_all(&self, tiles: Vec<Tile>) -> Result<Vec<TileResult>, RenderError> {
        let expected = tiles.len();
        let (tx, rx) = mpsc::channel::<TileResult>();
        let mut handles = Vec::with_capacity(expected);
        for tile in tiles {
            let solver = self.solver.clone();
            let tx = tx.clone();
            handles.push(thread::spawn(move || {
                // A send only fails once the dispatcher has already bailed out.
                let _ = tx.send(solver.solve(&tile));
            }));
        }
        drop(tx);

        let mut results = Vec::with_capacity(expected);
        for _ in 0..expected {
            match rx.recv() {
                Ok(result) => {
                    debug!(row = result.index.row, col = result.index.col, "tile finished");
                    results.push(result);
                }
                // Every sender is gone but tiles are still owed: a worker died.
                Err(_) => return Err(RenderError::WorkerLost),
            }
        }
        for handle in handles {
            if handle.join().is_err() {
                return Err(RenderError::WorkerLost);
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::{Frame, Resolution};
    use crate::grid::{TileGrid, TileIndex};
    use crate::solver::EscapeSolver;

    fn tiles2() -> Vec<Tile> {
        TileGrid::new(Resolution::new(16, 16), 4)
            .unwrap()
            .tiles(&Frame::default())
    }

    #[test]
    fn test_dispatch_delivers_every_tile() {
        let dispatcher = TileDispatcher::new(EscapeSolver::new(30));
        let results = dispatcher.render_all(tiles2()).unwrap();
        assert_eq!(results.len(), 4);
        let mut indices: Vec<(usize, usize)> = results
            .iter()
            .map(|result| (result.index.row, result.index.col))
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        for result in &results {
            assert_eq!(result.scores.dim(), (8, 8));
        }
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let dispatcher = TileDispatcher::new(EscapeSolver::new(30));
        let mut a = dispatcher.render_all(tiles2()).unwrap();
        let mut b = dispatcher.render_all(tiles2()).unwrap();
        let by_index = |r: &TileResult| (r.index.row, r.index.col);
        a.sort_by_key(by_index);
        b.sort_by_key(by_index);
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.scores, right.scores);
        }
    }

    #[derive(Clone)]
    struct FaultySolver;

    impl Solver for FaultySolver {
        fn solve(&self, tile: &Tile) -> TileResult {
            if tile.index == (TileIndex { row: 0, col: 1 }) {
                panic!("worker crash");
            }
            EscapeSolver::new(5).solve(tile)
        }
    }

    #[test]
    fn test_worker_panic_fails_the_render() {
        let dispatcher = TileDispatcher::new(FaultySolver);
        assert_eq!(
            dispatcher.render_all(tiles2()).unwrap_err(),
            RenderError::WorkerLost
        );
    }
}
