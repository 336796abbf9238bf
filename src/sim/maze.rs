//! Perfect-maze generation on an odd-sized grid
//!
//! Cells at odd coordinates form a lattice two units apart. Carving walks the
//! lattice with a randomized depth-first backtracker, opening the lattice cell
//! and the single cell between it and its parent. The explicit stack keeps
//! large mazes off the call stack.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_DIMENSION, START_CELL};

/// A grid cell as (x, y)
pub type Cell = (usize, usize);

/// Lattice moves: two cells per step so carved cells stay on odd coordinates
const LATTICE_STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];
/// Single-cell moves for walking the finished maze
const NEIGHBOR_STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Rejected maze dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// Dimension below the 3x3 minimum
    DimensionTooSmall { dimension: usize },
    /// Even dimensions leave an open border and unreachable cells
    EvenDimension { dimension: usize },
    /// A hand-made row whose length differs from the row count
    RaggedRow {
        row: usize,
        len: usize,
        dimension: usize,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionTooSmall { dimension } => write!(
                f,
                "maze dimension must be at least {MIN_DIMENSION} (received {dimension})"
            ),
            Self::EvenDimension { dimension } => {
                write!(f, "maze dimension must be odd (received {dimension})")
            }
            Self::RaggedRow {
                row,
                len,
                dimension,
            } => write!(f, "maze row {row} has {len} cells, expected {dimension}"),
        }
    }
}

impl Error for LevelError {}

/// Check a dimension before generating
pub fn validate_dimension(dimension: usize) -> Result<(), LevelError> {
    if dimension < MIN_DIMENSION {
        return Err(LevelError::DimensionTooSmall { dimension });
    }
    if dimension % 2 == 0 {
        return Err(LevelError::EvenDimension { dimension });
    }
    Ok(())
}

/// Square wall/open grid, `true` = wall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    dimension: usize,
    cells: Vec<bool>,
}

impl Maze {
    /// A fully walled grid
    fn solid(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![true; dimension * dimension],
        }
    }

    /// Build a maze from explicit rows (`true` = wall), rows indexed by y
    ///
    /// Mostly useful for hand-made layouts in tests and demos.
    pub fn from_rows(rows: &[&[bool]]) -> Result<Self, LevelError> {
        let dimension = rows.len();
        validate_dimension(dimension)?;
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != dimension)
        {
            return Err(LevelError::RaggedRow {
                row,
                len: cells.len(),
                dimension,
            });
        }
        Ok(Self {
            dimension,
            cells: rows.concat(),
        })
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.dimension + x
    }

    fn open(&mut self, x: usize, y: usize) {
        let idx = self.idx(x, y);
        self.cells[idx] = false;
    }

    /// Side length of the grid
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether (x, y) is a wall; out-of-bounds counts as wall
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        if x >= self.dimension || y >= self.dimension {
            return true;
        }
        self.cells[self.idx(x, y)]
    }

    /// All wall cells in row-major order
    pub fn wall_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_where(true)
    }

    /// All open cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_where(false)
    }

    fn cells_where(&self, wall: bool) -> impl Iterator<Item = Cell> + '_ {
        let d = self.dimension;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, w)| **w == wall)
            .map(move |(i, _)| (i % d, i / d))
    }

    /// Open cells sharing an edge with (x, y)
    pub fn open_neighbors(&self, (x, y): Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_STEPS.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (!self.is_wall(nx, ny)).then_some((nx, ny))
        })
    }

    /// Shortest open path from `from` to `to`, both ends included
    ///
    /// Returns `None` if either end is a wall or no path exists.
    pub fn shortest_path(&self, from: Cell, to: Cell) -> Option<Vec<Cell>> {
        if self.is_wall(from.0, from.1) || self.is_wall(to.0, to.1) {
            return None;
        }

        let mut prev: Vec<Option<usize>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[self.idx(from.0, from.1)] = true;
        queue.push_back(from);

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                let mut path = vec![to];
                let mut idx = self.idx(to.0, to.1);
                while let Some(p) = prev[idx] {
                    path.push((p % self.dimension, p / self.dimension));
                    idx = p;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.open_neighbors(cell) {
                let next_idx = self.idx(next.0, next.1);
                if !seen[next_idx] {
                    seen[next_idx] = true;
                    prev[next_idx] = Some(self.idx(cell.0, cell.1));
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Text dump for logs: `#` wall, `.` open
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.dimension * (self.dimension + 1));
        for y in 0..self.dimension {
            for x in 0..self.dimension {
                out.push(if self.is_wall(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

/// Generate a perfect maze of the given odd dimension
///
/// Carving starts at (1,1). From the cell on top of the stack, pick a random
/// lattice neighbor that is in `[1, D-2]` and still wall, open it and the cell
/// in between, and push it. A cell with no candidates is popped (backtrack).
pub fn generate<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Maze, LevelError> {
    validate_dimension(dimension)?;

    let mut maze = Maze::solid(dimension);
    let max = dimension - 2;
    maze.open(START_CELL.0, START_CELL.1);

    let mut stack: Vec<Cell> = vec![START_CELL];
    let mut candidates: Vec<Cell> = Vec::with_capacity(LATTICE_STEPS.len());

    while let Some(&(x, y)) = stack.last() {
        candidates.clear();
        for &(dx, dy) in &LATTICE_STEPS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if (1..=max).contains(&nx) && (1..=max).contains(&ny) && maze.is_wall(nx, ny) {
                candidates.push((nx, ny));
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (nx, ny) = candidates[rng.random_range(0..candidates.len())];
        maze.open((x + nx) / 2, (y + ny) / 2);
        maze.open(nx, ny);
        stack.push((nx, ny));
    }

    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn reachable_from_start(maze: &Maze) -> usize {
        let mut seen = vec![false; maze.dimension * maze.dimension];
        let mut stack = vec![START_CELL];
        seen[maze.idx(START_CELL.0, START_CELL.1)] = true;
        let mut count = 0;
        while let Some(cell) = stack.pop() {
            count += 1;
            for n in maze.open_neighbors(cell) {
                let i = maze.idx(n.0, n.1);
                if !seen[i] {
                    seen[i] = true;
                    stack.push(n);
                }
            }
        }
        count
    }

    fn open_edge_count(maze: &Maze) -> usize {
        // Count each edge once: only look right and down
        maze.open_cells()
            .map(|(x, y)| {
                usize::from(!maze.is_wall(x + 1, y)) + usize::from(!maze.is_wall(x, y + 1))
            })
            .sum()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            generate(1, &mut rng),
            Err(LevelError::DimensionTooSmall { dimension: 1 })
        );
        assert_eq!(
            generate(6, &mut rng),
            Err(LevelError::EvenDimension { dimension: 6 })
        );
        assert!(generate(0, &mut rng).is_err());
    }

    #[test]
    fn test_smallest_maze_is_single_cell() {
        let mut rng = Pcg32::seed_from_u64(7);
        let maze = generate(3, &mut rng).unwrap();
        assert_eq!(maze.open_cells().collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(maze.to_ascii(), "###\n#.#\n###\n");
    }

    #[test]
    fn test_five_by_five_reaches_exit() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let maze = generate(5, &mut rng).unwrap();
        // 4 lattice cells, 3 connectors
        assert_eq!(maze.open_cells().count(), 7);
        let path = maze.shortest_path((1, 1), (3, 3)).expect("exit reachable");
        assert_eq!(path.first(), Some(&(1, 1)));
        assert_eq!(path.last(), Some(&(3, 3)));
        // Every step moves exactly one cell
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1);
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate(21, &mut Pcg32::seed_from_u64(99)).unwrap();
        let b = generate(21, &mut Pcg32::seed_from_u64(99)).unwrap();
        let c = generate(21, &mut Pcg32::seed_from_u64(100)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_large_maze_does_not_recurse() {
        // 401x401 has 40k lattice cells; a recursive carve would need that many frames
        let maze = generate(401, &mut Pcg32::seed_from_u64(5)).unwrap();
        assert_eq!(maze.open_cells().count(), 2 * 200 * 200 - 1);
    }

    #[test]
    fn test_from_rows_and_path() {
        const W: bool = true;
        const O: bool = false;
        let maze = Maze::from_rows(&[
            &[W, W, W, W, W],
            &[W, O, O, O, W],
            &[W, W, W, O, W],
            &[W, O, O, O, W],
            &[W, W, W, W, W],
        ])
        .unwrap();
        let path = maze.shortest_path((1, 1), (1, 3)).unwrap();
        assert_eq!(
            path,
            vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3)]
        );
        assert_eq!(maze.shortest_path((1, 1), (2, 2)), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        const W: bool = true;
        const O: bool = false;
        let short = Maze::from_rows(&[&[W, W, W], &[W, O], &[W, W, W]]);
        assert_eq!(
            short.unwrap_err(),
            LevelError::RaggedRow {
                row: 1,
                len: 2,
                dimension: 3
            }
        );

        let long = Maze::from_rows(&[&[W, W, W], &[W, O, W], &[W, W, W, O]]);
        let err = long.unwrap_err();
        assert_eq!(
            err,
            LevelError::RaggedRow {
                row: 2,
                len: 4,
                dimension: 3
            }
        );
        assert_eq!(err.to_string(), "maze row 2 has 4 cells, expected 3");
    }

    proptest! {
        #[test]
        fn prop_generated_maze_is_perfect(seed in any::<u64>(), half in 1usize..20) {
            let dimension = 2 * half + 1;
            let maze = generate(dimension, &mut Pcg32::seed_from_u64(seed)).unwrap();
            let lattice = half * half;
            let open = maze.open_cells().count();

            // Every lattice cell visited, one connector per carve step
            prop_assert_eq!(open, 2 * lattice - 1);
            // Connected
            prop_assert_eq!(reachable_from_start(&maze), open);
            // Tree: no cycles
            prop_assert_eq!(open_edge_count(&maze), open - 1);
        }

        #[test]
        fn prop_border_is_wall(seed in any::<u64>(), half in 1usize..20) {
            let dimension = 2 * half + 1;
            let maze = generate(dimension, &mut Pcg32::seed_from_u64(seed)).unwrap();
            for i in 0..dimension {
                prop_assert!(maze.is_wall(i, 0));
                prop_assert!(maze.is_wall(i, dimension - 1));
                prop_assert!(maze.is_wall(0, i));
                prop_assert!(maze.is_wall(dimension - 1, i));
            }
        }

        #[test]
        fn prop_even_cells_stay_wall(seed in any::<u64>(), half in 1usize..12) {
            let dimension = 2 * half + 1;
            let maze = generate(dimension, &mut Pcg32::seed_from_u64(seed)).unwrap();
            for (x, y) in maze.open_cells() {
                prop_assert!(x % 2 == 1 || y % 2 == 1);
            }
        }
    }
}
