//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (walls in row-major grid order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod level;
pub mod maze;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{MoveOutcome, is_colliding, resolve_move};
pub use input::{Direction, InputState};
pub use level::{LevelLayout, Wall, WallSet, check_exit, load_level};
pub use maze::{Cell, LevelError, Maze, generate};
pub use state::{GameEvent, GamePhase, GameState, Player, RngState};
pub use tick::{TickInput, tick};
