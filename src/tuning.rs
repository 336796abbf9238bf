//! Data-driven game balance
//!
//! Everything a designer may want to tweak without touching the simulation:
//! grid scale, movement speed, collision margin and level growth.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_DIMENSION;

/// What happens when a move would put the player inside a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MovementPolicy {
    /// Discard the whole move for the tick (player stops dead)
    #[default]
    Halt,
    /// Retry each axis on its own so the player slides along walls
    Slide,
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World units per grid cell (also the wall cube edge)
    pub cell_size: f32,
    /// Per-axis distance moved per tick while a key is held
    pub player_speed: f32,
    /// Half-width of the square keep-out zone around each wall center
    pub collision_margin: f32,
    /// Max per-axis distance from the exit cell center that counts as arrival
    pub exit_tolerance: f32,
    /// Maze dimension of level 1 (odd, >= 3)
    pub start_dimension: usize,
    /// Dimension growth per cleared level (even, keeps dimensions odd)
    pub dimension_step: usize,
    /// Wall contact behavior
    pub movement_policy: MovementPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            player_speed: 0.2,
            collision_margin: 1.5,
            exit_tolerance: 1.0,
            start_dimension: 5,
            dimension_step: 2,
            movement_policy: MovementPolicy::Halt,
        }
    }
}

/// Invalid tuning values
#[derive(Debug)]
pub enum TuningError {
    /// A length or speed that must be strictly positive was not
    NonPositive {
        field: &'static str,
        value: f32,
    },
    /// Margin does not lie strictly between half a cell and a full cell
    MarginOutOfRange {
        margin: f32,
        min: f32,
        max: f32,
    },
    /// Starting dimension is even or too small
    InvalidStartDimension(usize),
    /// Level growth would produce even dimensions (or no growth at all)
    InvalidDimensionStep(usize),
    /// Tuning JSON could not be parsed
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive (received {value})")
            }
            Self::MarginOutOfRange { margin, min, max } => write!(
                f,
                "collision_margin must be greater than {min} and less than {max} (received {margin})"
            ),
            Self::InvalidStartDimension(dimension) => write!(
                f,
                "start_dimension must be odd and at least {MIN_DIMENSION} (received {dimension})"
            ),
            Self::InvalidDimensionStep(step) => {
                write!(f, "dimension_step must be even and non-zero (received {step})")
            }
            Self::Parse(error) => write!(f, "could not parse tuning: {error}"),
        }
    }
}

impl Error for TuningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(error) => Some(error),
            _ => None,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("cell_size", self.cell_size),
            ("player_speed", self.player_speed),
            ("collision_margin", self.collision_margin),
            ("exit_tolerance", self.exit_tolerance),
        ];
        for (field, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        // Below half a cell the cube overlaps walls; at a full cell the start cell is sealed
        let (min, max) = (self.cell_size / 2.0, self.cell_size);
        if self.collision_margin <= min || self.collision_margin >= max {
            return Err(TuningError::MarginOutOfRange {
                margin: self.collision_margin,
                min,
                max,
            });
        }
        if self.start_dimension < MIN_DIMENSION || self.start_dimension % 2 == 0 {
            return Err(TuningError::InvalidStartDimension(self.start_dimension));
        }
        if self.dimension_step == 0 || self.dimension_step % 2 != 0 {
            return Err(TuningError::InvalidDimensionStep(self.dimension_step));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        // Margin must exceed the wall's half footprint so the cube never pokes into a wall
        assert!(tuning.collision_margin > tuning.cell_size / 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 0.25, "movement_policy": "Slide" }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.player_speed, 0.25);
        assert_eq!(tuning.movement_policy, MovementPolicy::Slide);
        assert_eq!(tuning.start_dimension, 5);
    }

    #[test]
    fn test_rejects_even_start_dimension() {
        let err = Tuning::from_json(r#"{ "start_dimension": 6 }"#).unwrap_err();
        assert!(matches!(err, TuningError::InvalidStartDimension(6)));
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn test_rejects_odd_dimension_step() {
        let tuning = Tuning {
            dimension_step: 3,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidDimensionStep(3))
        ));
    }

    #[test]
    fn test_rejects_zero_margin() {
        let tuning = Tuning {
            collision_margin: 0.0,
            ..Default::default()
        };
        let err = tuning.validate().unwrap_err();
        assert!(matches!(
            err,
            TuningError::NonPositive {
                field: "collision_margin",
                ..
            }
        ));
    }

    #[test]
    fn test_margin_must_clear_wall_half_footprint() {
        for margin in [0.5, 1.0] {
            let tuning = Tuning {
                collision_margin: margin,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::MarginOutOfRange { min, .. }) if min == 1.0
            ));
        }
    }

    #[test]
    fn test_margin_must_stay_below_cell_size() {
        for margin in [2.0, 2.5] {
            let tuning = Tuning {
                collision_margin: margin,
                ..Default::default()
            };
            let err = tuning.validate().unwrap_err();
            assert!(matches!(err, TuningError::MarginOutOfRange { max, .. } if max == 2.0));
            assert!(err.to_string().contains("less than 2"));
        }
    }

    #[test]
    fn test_margin_bounds_follow_cell_size() {
        let tuning = Tuning {
            cell_size: 4.0,
            collision_margin: 2.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
        assert!(Tuning::from_json(r#"{ "collision_margin": 1.9 }"#).is_ok());
    }

    #[test]
    fn test_parse_error_has_source() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.source().is_some());
    }
}
