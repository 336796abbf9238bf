//! Fixed timestep simulation tick
//!
//! Reads held keys, moves the player if the way is clear, and advances the
//! level when the exit is reached.

use super::autopilot::Autopilot;
use super::collision::{MoveOutcome, resolve_move};
use super::input::InputState;
use super::maze::LevelError;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys currently held
    pub keys: InputState,
    /// Pause toggle
    pub pause: bool,
    /// Skip to next level (debug/testing)
    pub skip_level: bool,
    /// Idle/demo mode - autopilot walks to the exit
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
///
/// Only level loading can fail, and only if tuning produces an invalid
/// dimension, which `Tuning::validate` rules out.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), LevelError> {
    // Handle pause toggle
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
        };
        log::info!("Phase: {:?}", state.phase);
    }

    if state.phase == GamePhase::Paused {
        return Ok(());
    }

    // Debug: skip to next level
    if input.skip_level {
        return state.advance_level();
    }

    state.time_ticks += 1;

    let keys = if input.autopilot {
        autopilot_keys(state)
    } else {
        state.autopilot = None;
        input.keys
    };

    let delta = keys.displacement(state.tuning.player_speed);
    let outcome = resolve_move(
        state.player.pos,
        delta,
        &state.layout.walls.walls,
        state.tuning.collision_margin,
        state.tuning.movement_policy,
    );

    match outcome {
        MoveOutcome::Blocked => {
            if !state.player.blocked {
                log::debug!("Move blocked at {:?}", state.player.pos);
                state.events.push(GameEvent::MoveBlocked);
            }
            state.player.blocked = true;
        }
        MoveOutcome::Moved(pos) | MoveOutcome::Slid(pos) => {
            state.player.pos = pos;
            state.player.blocked = false;
        }
        MoveOutcome::Idle => state.player.blocked = false,
    }

    if state.at_exit() {
        let ticks = state.time_ticks - state.level_start_tick;
        log::info!("Level {} cleared in {} ticks", state.level(), ticks);
        state.events.push(GameEvent::ExitReached {
            level: state.level(),
            ticks,
        });
        state.advance_level()?;
    }

    Ok(())
}

/// Keys chosen by the autopilot, replanning after a level change
fn autopilot_keys(state: &mut GameState) -> InputState {
    let stale = state
        .autopilot
        .as_ref()
        .is_none_or(|pilot| !pilot.is_current(&state.layout));
    if stale {
        state.autopilot = Autopilot::plan(&state.layout, state.player.pos);
    }

    match state.autopilot.as_mut() {
        Some(pilot) => pilot.steer(&state.layout, state.player.pos, state.tuning.player_speed),
        None => InputState::default(),
    }
}
