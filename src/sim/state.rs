//! Game state and core simulation types
//!
//! Everything needed to replay a run deterministically lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::autopilot::Autopilot;
use super::level::{self, LevelLayout};
use super::maze::LevelError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player can move
    Playing,
    /// Game is paused
    Paused,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new maze replaced the previous one
    LevelLoaded {
        level: u32,
        dimension: usize,
        wall_count: usize,
        generation: u32,
    },
    /// The player stood on the exit of `level`
    ExitReached { level: u32, ticks: u64 },
    /// The player walked into a wall (reported once per contact)
    MoveBlocked,
}

/// The player's cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Position on the XZ plane (x, z); height is fixed
    pub pos: Vec2,
    /// Whether the previous tick's move was blocked
    pub blocked: bool,
}

/// RNG state wrapper for serialization
///
/// Each level draws a fresh generator from the run seed and a per-level
/// stream, so a level's maze only depends on the seed and its index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next level, advancing the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(
            self.seed
                .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        );
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Balance values the run was started with
    pub tuning: Tuning,
    /// Current level
    pub layout: LevelLayout,
    pub player: Player,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick at which the current level was loaded
    pub level_start_tick: u64,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Route for idle/demo mode
    #[serde(skip)]
    pub autopilot: Option<Autopilot>,
}

impl GameState {
    /// Start a run at level 1
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, LevelError> {
        let mut rng_state = RngState::new(seed);
        let layout = level::load_level(1, tuning.start_dimension, &tuning, &mut rng_state.next_rng(), 1)?;
        let player = Player {
            pos: layout.start_world(),
            blocked: false,
        };

        let mut state = Self {
            seed,
            rng_state,
            tuning,
            layout,
            player,
            phase: GamePhase::Playing,
            time_ticks: 0,
            level_start_tick: 0,
            events: Vec::new(),
            autopilot: None,
        };
        state.announce_level();
        Ok(state)
    }

    /// Current level number (1-based)
    pub fn level(&self) -> u32 {
        self.layout.level
    }

    /// Current maze side length
    pub fn dimension(&self) -> usize {
        self.layout.dimension()
    }

    /// Replace the level with a freshly generated maze and respawn the player
    pub fn load_level(&mut self, level: u32, dimension: usize) -> Result<(), LevelError> {
        let generation = self.layout.walls.generation.wrapping_add(1);
        let mut rng = self.rng_state.next_rng();
        self.layout = level::load_level(level, dimension, &self.tuning, &mut rng, generation)?;
        self.player.pos = self.layout.start_world();
        self.player.blocked = false;
        self.autopilot = None;
        self.level_start_tick = self.time_ticks;
        self.announce_level();
        Ok(())
    }

    /// Move on to the next, larger maze
    pub fn advance_level(&mut self) -> Result<(), LevelError> {
        let level = self.level() + 1;
        let dimension = self.dimension() + self.tuning.dimension_step;
        self.load_level(level, dimension)
    }

    /// Whether the player currently stands on the exit
    pub fn at_exit(&self) -> bool {
        level::check_exit(
            self.player.pos,
            self.layout.exit_cell,
            self.layout.offset,
            self.layout.cell_size,
            self.tuning.exit_tolerance,
        )
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn announce_level(&mut self) {
        log::info!(
            "Level {}: {}x{} maze, {} walls",
            self.layout.level,
            self.dimension(),
            self.dimension(),
            self.layout.walls.len()
        );
        self.events.push(GameEvent::LevelLoaded {
            level: self.layout.level,
            dimension: self.dimension(),
            wall_count: self.layout.walls.len(),
            generation: self.layout.walls.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_starts_at_level_one() {
        let mut state = GameState::new(42, Tuning::default()).unwrap();
        assert_eq!(state.level(), 1);
        assert_eq!(state.dimension(), 5);
        assert_eq!(state.player.pos, state.layout.start_world());
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::LevelLoaded { level: 1, dimension: 5, generation: 1, .. }]
        ));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_new_game_rejects_bad_tuning_dimension() {
        let tuning = Tuning {
            start_dimension: 4,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(1, tuning),
            Err(LevelError::EvenDimension { dimension: 4 })
        ));
    }

    #[test]
    fn test_advance_replaces_walls() {
        let mut state = GameState::new(7, Tuning::default()).unwrap();
        let old_generation = state.layout.walls.generation;
        state.player.pos += Vec2::new(0.4, 0.0);

        state.advance_level().unwrap();

        assert_eq!(state.level(), 2);
        assert_eq!(state.dimension(), 7);
        assert_eq!(state.layout.walls.generation, old_generation + 1);
        assert_eq!(state.player.pos, state.layout.start_world());
        // Every wall belongs to the new 7x7 maze
        assert!(state
            .layout
            .walls
            .iter()
            .all(|w| w.cell.0 < 7 && w.cell.1 < 7 && state.layout.maze.is_wall(w.cell.0, w.cell.1)));
        assert_eq!(
            state.layout.walls.len(),
            state.layout.maze.wall_cells().count()
        );
    }

    #[test]
    fn test_same_seed_same_levels() {
        let mut a = GameState::new(123, Tuning::default()).unwrap();
        let mut b = GameState::new(123, Tuning::default()).unwrap();
        assert_eq!(a.layout.maze, b.layout.maze);
        a.advance_level().unwrap();
        b.advance_level().unwrap();
        assert_eq!(a.layout.maze, b.layout.maze);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(5, Tuning::default()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.layout.maze, state.layout.maze);
        assert_eq!(back.layout.walls.len(), state.layout.walls.len());
    }
}
