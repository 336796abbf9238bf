//! Level layout: maze, wall entities, start and exit
//!
//! A level is built in one go from a freshly generated maze and thrown away
//! whole when the player reaches the exit. Walls carry the generation id of
//! the level that created them so consumers can tell stale sets apart.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::maze::{self, Cell, LevelError, Maze};
use crate::consts::START_CELL;
use crate::tuning::Tuning;
use crate::{cell_to_world, centering_offset, world_to_cell};

/// A wall cube placed in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Grid cell the wall came from
    pub cell: Cell,
    /// World position on the XZ plane (x, z)
    pub pos: Vec2,
}

/// All walls of one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallSet {
    /// Bumped every time a level is loaded
    pub generation: u32,
    pub walls: Vec<Wall>,
}

impl WallSet {
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter()
    }
}

/// Everything the simulation needs to know about the current level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    /// 1-based level counter
    pub level: u32,
    pub maze: Maze,
    pub walls: WallSet,
    /// Added to grid * cell_size to center the maze at the origin
    pub offset: Vec2,
    pub cell_size: f32,
    pub start_cell: Cell,
    pub exit_cell: Cell,
}

impl LevelLayout {
    /// Maze side length
    pub fn dimension(&self) -> usize {
        self.maze.dimension()
    }

    /// World position of a grid cell
    pub fn cell_to_world(&self, cell: Cell) -> Vec2 {
        cell_to_world(cell, self.cell_size, self.offset)
    }

    /// Grid cell under a world position
    pub fn world_to_cell(&self, pos: Vec2) -> Option<Cell> {
        world_to_cell(pos, self.cell_size, self.offset, self.dimension())
    }

    /// Where the player spawns
    pub fn start_world(&self) -> Vec2 {
        self.cell_to_world(self.start_cell)
    }

    /// Center of the exit cell
    pub fn exit_world(&self) -> Vec2 {
        self.cell_to_world(self.exit_cell)
    }
}

/// Generate a maze and lay out its walls, start and exit
///
/// The exit sits in the far corner at (D-2, D-2), the start at (1,1).
pub fn load_level<R: Rng + ?Sized>(
    level: u32,
    dimension: usize,
    tuning: &Tuning,
    rng: &mut R,
    generation: u32,
) -> Result<LevelLayout, LevelError> {
    let maze = maze::generate(dimension, rng)?;
    let offset = centering_offset(dimension, tuning.cell_size);

    let walls = maze
        .wall_cells()
        .map(|cell| Wall {
            cell,
            pos: cell_to_world(cell, tuning.cell_size, offset),
        })
        .collect();

    Ok(LevelLayout {
        level,
        maze,
        walls: WallSet { generation, walls },
        offset,
        cell_size: tuning.cell_size,
        start_cell: START_CELL,
        exit_cell: (dimension - 2, dimension - 2),
    })
}

/// True when the player is within `tolerance` of the exit center on both axes
pub fn check_exit(player: Vec2, exit_cell: Cell, offset: Vec2, cell_size: f32, tolerance: f32) -> bool {
    let exit = cell_to_world(exit_cell, cell_size, offset);
    (player.x - exit.x).abs() < tolerance && (player.y - exit.y).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_load_level_layout() {
        let tuning = Tuning::default();
        let layout = load_level(1, 5, &tuning, &mut Pcg32::seed_from_u64(3), 1).unwrap();

        assert_eq!(layout.offset, Vec2::splat(-5.0));
        assert_eq!(layout.start_cell, (1, 1));
        assert_eq!(layout.exit_cell, (3, 3));
        // Grid (1,1) is world (2 + offset)
        assert_eq!(layout.start_world(), Vec2::new(-3.0, -3.0));
        assert_eq!(layout.exit_world(), Vec2::new(1.0, 1.0));
        // One wall per wall cell: 25 cells minus 7 open
        assert_eq!(layout.walls.len(), 18);
        assert_eq!(layout.walls.generation, 1);
        for wall in layout.walls.iter() {
            assert!(layout.maze.is_wall(wall.cell.0, wall.cell.1));
            assert_eq!(wall.pos, layout.cell_to_world(wall.cell));
        }
    }

    #[test]
    fn test_load_level_rejects_even() {
        let tuning = Tuning::default();
        let result = load_level(1, 4, &tuning, &mut Pcg32::seed_from_u64(3), 1);
        assert_eq!(
            result.unwrap_err(),
            LevelError::EvenDimension { dimension: 4 }
        );
    }

    #[test]
    fn test_check_exit_tolerance() {
        let offset = Vec2::splat(-5.0);
        // Exit (3,3) sits at world (1,1)
        assert!(check_exit(Vec2::new(1.0, 1.0), (3, 3), offset, 2.0, 1.0));
        assert!(check_exit(Vec2::new(1.9, 0.1), (3, 3), offset, 2.0, 1.0));
        // Exactly one unit away is not "within"
        assert!(!check_exit(Vec2::new(2.0, 1.0), (3, 3), offset, 2.0, 1.0));
        assert!(!check_exit(Vec2::new(1.0, -0.5), (3, 3), offset, 2.0, 1.0));
    }

    #[test]
    fn test_world_to_cell_on_layout() {
        let tuning = Tuning::default();
        let layout = load_level(1, 7, &tuning, &mut Pcg32::seed_from_u64(11), 1).unwrap();
        assert_eq!(layout.world_to_cell(layout.exit_world()), Some((5, 5)));
        assert_eq!(layout.world_to_cell(layout.start_world() + Vec2::new(0.4, -0.4)), Some((1, 1)));
    }
}
