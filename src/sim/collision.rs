//! Player/wall collision
//!
//! The player keeps a square "personal space" around each wall center: a
//! candidate position collides when it is closer than `half_gap` to a wall on
//! BOTH axes. This is a per-axis test, not a true box or circle overlap, so
//! diagonal corner clipping and tunneling at very high speeds are possible.

use glam::Vec2;

use super::level::Wall;
use crate::tuning::MovementPolicy;

/// Result of trying to move the player for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No movement requested
    Idle,
    /// The full move was applied
    Moved(Vec2),
    /// Only part of the move was applied (slide policy)
    Slid(Vec2),
    /// Every option collided; position unchanged
    Blocked,
}

impl MoveOutcome {
    /// Position after the move, given the position before it
    pub fn position(&self, from: Vec2) -> Vec2 {
        match *self {
            MoveOutcome::Moved(pos) | MoveOutcome::Slid(pos) => pos,
            MoveOutcome::Idle | MoveOutcome::Blocked => from,
        }
    }
}

/// Check whether a candidate position lies inside any wall's keep-out square
#[inline]
pub fn is_colliding(candidate: Vec2, walls: &[Wall], half_gap: f32) -> bool {
    walls.iter().any(|wall| {
        (wall.pos.x - candidate.x).abs() < half_gap && (wall.pos.y - candidate.y).abs() < half_gap
    })
}

/// Apply a per-tick displacement under the given policy
///
/// `Halt` is all-or-nothing: if the combined move collides, neither axis
/// changes. `Slide` falls back to the x-only move, then the z-only move.
pub fn resolve_move(
    from: Vec2,
    delta: Vec2,
    walls: &[Wall],
    half_gap: f32,
    policy: MovementPolicy,
) -> MoveOutcome {
    if delta == Vec2::ZERO {
        return MoveOutcome::Idle;
    }

    let candidate = from + delta;
    if !is_colliding(candidate, walls, half_gap) {
        return MoveOutcome::Moved(candidate);
    }

    if policy == MovementPolicy::Slide {
        for partial in [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)] {
            if partial == Vec2::ZERO {
                continue;
            }
            let candidate = from + partial;
            if !is_colliding(candidate, walls, half_gap) {
                return MoveOutcome::Slid(candidate);
            }
        }
    }

    MoveOutcome::Blocked
}
