use ndarray::{concatenate, Array2, Axis as NdAxis};

use crate::coord::{Axis, Frame, Resolution};
use crate::error::RenderError;

/// Position of a tile in the grid, row-major from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub row: usize,
    pub col: usize,
}

/// One unit of render work: a sub-rectangle of the complex plane, the pixel
/// dimensions of its buffer, and where the finished buffer belongs.
#[derive(Clone, Debug)]
pub struct Tile {
    pub frame: Frame<f64>,
    pub resolution: Resolution,
    pub index: TileIndex,
}

/// A finished tile buffer, stamped with its grid position so results can be
/// collected in any order.
#[derive(Clone, Debug)]
pub struct TileResult {
    pub scores: Array2<f64>,
    pub index: TileIndex,
}

/// Square tile layout for one render: `side * side` congruent tiles.
#[derive(Clone, Copy, Debug)]
pub struct TileGrid {
    side: usize,
    tile_width: usize,
    tile_height: usize,
}

impl TileGrid {
    /// `workers` must be a positive perfect square; the grid side is its
    /// square root. Tile pixel sizes use integer division, so when the side
    /// does not divide the resolution evenly the remainder pixels fall off
    /// the right and bottom edges of the output.
    pub fn new(resolution: Resolution, workers: usize) -> Result<Self, RenderError> {
        let side = (workers as f64).sqrt() as usize;
        if workers == 0 || side * side != workers {
            return Err(RenderError::WorkerCount(workers));
        }
        let tile_width = resolution.width / side;
        let tile_height = resolution.height / side;
        if tile_width == 0 || tile_height == 0 {
            return Err(RenderError::GridTooFine {
                side,
                width: resolution.width,
                height: resolution.height,
            });
        }
        Ok(Self {
            side,
            tile_width,
            tile_height,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tile_count(&self) -> usize {
        self.side * self.side
    }

    /// Dimensions of the assembled image; smaller than the requested
    /// resolution when the grid side does not divide it evenly.
    pub fn output_resolution(&self) -> Resolution {
        Resolution::new(self.side * self.tile_width, self.side * self.tile_height)
    }

    /// Splits `frame` into the tile descriptors, in (row, col) order. Tile
    /// (i, j) covers `[x.min + j*dx, x.min + (j+1)*dx]` by
    /// `[y.min + i*dy, y.min + (i+1)*dy]`. Each tile later derives its own
    /// pixel grid from these bounds, so adjacent tiles may disagree by an
    /// ulp along their shared edge.
    pub fn tiles(&self, frame: &Frame<f64>) -> Vec<Tile> {
        let dx = frame.x.length() / self.side as f64;
        let dy = frame.y.length() / self.side as f64;
        let resolution = Resolution::new(self.tile_width, self.tile_height);
        let mut tiles = Vec::with_capacity(self.tile_count());
        for row in 0..self.side {
            let y = Axis::new(
                frame.y.min + row as f64 * dy,
                frame.y.min + (row + 1) as f64 * dy,
            );
            for col in 0..self.side {
                let x = Axis::new(
                    frame.x.min + col as f64 * dx,
                    frame.x.min + (col + 1) as f64 * dx,
                );
                tiles.push(Tile {
                    frame: Frame::new(x, y),
                    resolution,
                    index: TileIndex { row, col },
                });
            }
        }
        tiles
    }

    /// Reorders `results` by (row, col) and stitches them into one buffer:
    /// tiles concatenate left-to-right within a row band, then the bands
    /// concatenate top-to-bottom. Every grid position must be delivered
    /// exactly once with the expected shape.
    pub fn assemble(&self, results: Vec<TileResult>) -> Result<Array2<f64>, RenderError> {
        let n = self.side;
        let mut slots: Vec<Option<Array2<f64>>> = (0..n * n).map(|_| None).collect();
        for result in results {
            let TileIndex { row, col } = result.index;
            if row >= n || col >= n {
                return Err(RenderError::UnknownTile { row, col });
            }
            if result.scores.dim() != (self.tile_height, self.tile_width) {
                return Err(RenderError::TileShape { row, col });
            }
            let slot = &mut slots[row * n + col];
            if slot.is_some() {
                return Err(RenderError::DuplicateTile { row, col });
            }
            *slot = Some(result.scores);
        }
        let mut ordered = Vec::with_capacity(n * n);
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(scores) => ordered.push(scores),
                None => {
                    return Err(RenderError::MissingTile {
                        row: i / n,
                        col: i % n,
                    })
                }
            }
        }
        let mut bands = Vec::with_capacity(n);
        for row in ordered.chunks(n) {
            let views: Vec<_> = row.iter().map(|tile| tile.view()).collect();
            bands.push(concatenate(NdAxis(1), &views).expect("tile shapes verified"));
        }
        let views: Vec<_> = bands.iter().map(|band| band.view()).collect();
        Ok(concatenate(NdAxis(0), &views).expect("band widths all equal"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn grid2() -> TileGrid {
        TileGrid::new(Resolution::new(450, 300), 4).unwrap()
    }

    #[test]
    fn test_worker_count_must_be_square() {
        let resolution = Resolution::new(100, 100);
        assert_eq!(
            TileGrid::new(resolution, 3).unwrap_err(),
            RenderError::WorkerCount(3)
        );
        assert_eq!(
            TileGrid::new(resolution, 0).unwrap_err(),
            RenderError::WorkerCount(0)
        );
        assert!(TileGrid::new(resolution, 1).is_ok());
        assert!(TileGrid::new(resolution, 16).is_ok());
    }

    #[test]
    fn test_grid_must_fit_resolution() {
        assert_eq!(
            TileGrid::new(Resolution::new(1, 1), 4).unwrap_err(),
            RenderError::GridTooFine {
                side: 2,
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_partition_covers_grid() {
        let tiles = grid2().tiles(&Frame::default());
        assert_eq!(tiles.len(), 4);
        let mut indices: Vec<(usize, usize)> = tiles
            .iter()
            .map(|tile| (tile.index.row, tile.index.col))
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        for tile in &tiles {
            assert_eq!(tile.resolution, Resolution::new(225, 150));
        }
    }

    #[test]
    fn test_partition_tiles_abut() {
        let tiles = grid2().tiles(&Frame::default());
        // Row-major order: (0,0), (0,1), (1,0), (1,1).
        assert_eq!(tiles[0].frame.x.max, tiles[1].frame.x.min);
        assert_eq!(tiles[0].frame.y.max, tiles[2].frame.y.min);
        assert_eq!(tiles[1].frame.x.min, -0.5);
        assert_eq!(tiles[2].frame.y.min, 0.0);
        assert_eq!(tiles[3].frame.x.max, 1.0);
        assert_eq!(tiles[3].frame.y.max, 1.0);
    }

    #[test]
    fn test_partition_truncates_remainder() {
        let grid = TileGrid::new(Resolution::new(7, 5), 4).unwrap();
        assert_eq!(grid.output_resolution(), Resolution::new(6, 4));
        for tile in grid.tiles(&Frame::default()) {
            assert_eq!(tile.resolution, Resolution::new(3, 2));
        }
    }

    fn constant_tile(grid: &TileGrid, row: usize, col: usize, value: f64) -> TileResult {
        let resolution = grid.output_resolution();
        let shape = (resolution.height / grid.side(), resolution.width / grid.side());
        TileResult {
            scores: Array2::from_elem(shape, value),
            index: TileIndex { row, col },
        }
    }

    fn four_tiles(grid: &TileGrid) -> Vec<TileResult> {
        vec![
            constant_tile(grid, 0, 0, 1.0),
            constant_tile(grid, 0, 1, 2.0),
            constant_tile(grid, 1, 0, 3.0),
            constant_tile(grid, 1, 1, 4.0),
        ]
    }

    #[test]
    fn test_assemble_orders_tiles() {
        let grid = TileGrid::new(Resolution::new(4, 4), 4).unwrap();
        let mut results = four_tiles(&grid);
        // Completion order is arbitrary; assembly must not depend on it.
        results.reverse();
        let img = grid.assemble(results).unwrap();
        assert_eq!(img.dim(), (4, 4));
        assert_eq!(img[[0, 0]], 1.0);
        assert_eq!(img[[0, 3]], 2.0);
        assert_eq!(img[[3, 0]], 3.0);
        assert_eq!(img[[3, 3]], 4.0);
    }

    #[test]
    fn test_assemble_rejects_duplicates() {
        let grid = TileGrid::new(Resolution::new(4, 4), 4).unwrap();
        let mut results = four_tiles(&grid);
        results[1] = constant_tile(&grid, 0, 0, 9.0);
        assert_eq!(
            grid.assemble(results).unwrap_err(),
            RenderError::DuplicateTile { row: 0, col: 0 }
        );
    }

    #[test]
    fn test_assemble_rejects_missing() {
        let grid = TileGrid::new(Resolution::new(4, 4), 4).unwrap();
        let mut results = four_tiles(&grid);
        results.remove(2);
        assert_eq!(
            grid.assemble(results).unwrap_err(),
            RenderError::MissingTile { row: 1, col: 0 }
        );
    }

    #[test]
    fn test_assemble_rejects_out_of_range_index() {
        let grid = TileGrid::new(Resolution::new(4, 4), 4).unwrap();
        let mut results = four_tiles(&grid);
        results[3].index = TileIndex { row: 2, col: 0 };
        assert_eq!(
            grid.assemble(results).unwrap_err(),
            RenderError::UnknownTile { row: 2, col: 0 }
        );
    }

    #[test]
    fn test_assemble_rejects_wrong_shape() {
        let grid = TileGrid::new(Resolution::new(4, 4), 4).unwrap();
        let mut results = four_tiles(&grid);
        results[0].scores = Array2::zeros((1, 1));
        assert_eq!(
            grid.assemble(results).unwrap_err(),
            RenderError::TileShape { row: 0, col: 0 }
        );
    }
}
