//! Idle/demo mode: walk the shortest route to the exit
//!
//! Plans a cell-by-cell route with BFS and turns it into held keys, one axis
//! at a time so the walk never cuts a corner.

use glam::Vec2;

use super::input::{Direction, InputState};
use super::level::LevelLayout;
use super::maze::Cell;

/// Route through the current level
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Wall generation the route was planned for
    generation: u32,
    route: Vec<Cell>,
    /// Index of the waypoint being approached
    next: usize,
}

impl Autopilot {
    /// Plan from the cell under `pos` to the level exit
    pub fn plan(layout: &LevelLayout, pos: Vec2) -> Option<Self> {
        let from = layout.world_to_cell(pos)?;
        let route = layout.maze.shortest_path(from, layout.exit_cell)?;
        log::debug!(
            "Autopilot route for level {}: {} cells",
            layout.level,
            route.len()
        );
        Some(Self {
            generation: layout.walls.generation,
            route,
            next: 0,
        })
    }

    /// Whether this route still belongs to the loaded level
    pub fn is_current(&self, layout: &LevelLayout) -> bool {
        self.generation == layout.walls.generation
    }

    /// Waypoints left to visit
    pub fn remaining(&self) -> &[Cell] {
        &self.route[self.next.min(self.route.len())..]
    }

    /// Keys to hold this tick to follow the route
    pub fn steer(&mut self, layout: &LevelLayout, pos: Vec2, speed: f32) -> InputState {
        let arrive = speed * 0.5;
        let mut keys = InputState::default();

        while let Some(&cell) = self.route.get(self.next) {
            let delta = layout.cell_to_world(cell) - pos;
            if delta.x.abs() <= arrive && delta.y.abs() <= arrive {
                self.next += 1;
                continue;
            }

            // Finish the larger axis first
            if delta.x.abs() >= delta.y.abs() {
                keys.press(if delta.x > 0.0 {
                    Direction::Right
                } else {
                    Direction::Left
                });
            } else {
                keys.press(if delta.y > 0.0 {
                    Direction::Back
                } else {
                    Direction::Forward
                });
            }
            break;
        }

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::load_level;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_plan_starts_at_player_and_ends_at_exit() {
        let tuning = Tuning::default();
        let layout = load_level(1, 9, &tuning, &mut Pcg32::seed_from_u64(8), 4).unwrap();
        let pilot = Autopilot::plan(&layout, layout.start_world()).unwrap();
        assert!(pilot.is_current(&layout));
        assert_eq!(pilot.remaining().first(), Some(&layout.start_cell));
        assert_eq!(pilot.remaining().last(), Some(&layout.exit_cell));
    }

    #[test]
    fn test_steer_presses_single_axis() {
        let tuning = Tuning::default();
        let layout = load_level(1, 9, &tuning, &mut Pcg32::seed_from_u64(8), 4).unwrap();
        let mut pilot = Autopilot::plan(&layout, layout.start_world()).unwrap();
        let keys = pilot.steer(&layout, layout.start_world(), tuning.player_speed);
        let held = Direction::ALL.iter().filter(|d| keys.is_held(**d)).count();
        assert_eq!(held, 1);
        // Standing on the start cell skips it
        assert_eq!(pilot.remaining().first(), Some(&pilot.route[1]));
    }

    #[test]
    fn test_plan_fails_outside_grid() {
        let tuning = Tuning::default();
        let layout = load_level(1, 5, &tuning, &mut Pcg32::seed_from_u64(1), 1).unwrap();
        assert!(Autopilot::plan(&layout, Vec2::new(100.0, 100.0)).is_none());
    }
}
