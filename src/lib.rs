//! Cube Maze - A 3D maze runner for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze generation, levels, collision, movement)
//! - `renderer`: WebGPU instanced-cube renderer
//! - `platform`: Frame clock and FPS tracking for the host loop
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences from the page URL

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{MovementPolicy, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Smallest legal maze dimension
    pub const MIN_DIMENSION: usize = 3;
    /// Grid cell where every maze is carved from and the player spawns
    pub const START_CELL: (usize, usize) = (1, 1);

    /// Player cube edge length (world units)
    pub const PLAYER_SIZE: f32 = 1.0;
    /// Player cube rests on the floor
    pub const PLAYER_Y: f32 = PLAYER_SIZE / 2.0;
}

/// Map a grid coordinate onto the world axis
#[inline]
pub fn grid_to_world(g: usize, cell_size: f32, offset: f32) -> f32 {
    g as f32 * cell_size + offset
}

/// Map a grid cell onto the world XZ plane (returned as x, z)
#[inline]
pub fn cell_to_world(cell: (usize, usize), cell_size: f32, offset: Vec2) -> Vec2 {
    Vec2::new(
        grid_to_world(cell.0, cell_size, offset.x),
        grid_to_world(cell.1, cell_size, offset.y),
    )
}

/// Nearest grid cell for a world position, `None` when outside the grid
#[inline]
pub fn world_to_cell(pos: Vec2, cell_size: f32, offset: Vec2, dimension: usize) -> Option<(usize, usize)> {
    let gx = ((pos.x - offset.x) / cell_size).round();
    let gz = ((pos.y - offset.y) / cell_size).round();
    if gx < 0.0 || gz < 0.0 {
        return None;
    }
    let (gx, gz) = (gx as usize, gz as usize);
    (gx < dimension && gz < dimension).then_some((gx, gz))
}

/// Centering offset for a maze of the given dimension (same on both axes)
#[inline]
pub fn centering_offset(dimension: usize, cell_size: f32) -> Vec2 {
    Vec2::splat(-(dimension as f32) * cell_size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centering_offset_matches_cell_size_two() {
        // With 2 world units per cell the offset is simply -dimension
        assert_eq!(centering_offset(5, 2.0), Vec2::splat(-5.0));
        assert_eq!(centering_offset(11, 2.0), Vec2::splat(-11.0));
    }

    #[test]
    fn test_cell_world_round_trip() {
        let offset = centering_offset(7, 2.0);
        let world = cell_to_world((1, 1), 2.0, offset);
        assert_eq!(world, Vec2::new(-5.0, -5.0));
        assert_eq!(world_to_cell(world, 2.0, offset, 7), Some((1, 1)));
        assert_eq!(world_to_cell(Vec2::new(-40.0, 0.0), 2.0, offset, 7), None);
        assert_eq!(world_to_cell(Vec2::new(40.0, 0.0), 2.0, offset, 7), None);
    }
}
