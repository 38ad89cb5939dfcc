//! Configuration constants and runtime settings for the navigation core.

use crate::error::CoreError;
use crate::targeting::TargetingStrategyKind;

// Velocity tracking
pub const DEFAULT_AVERAGE_VELOCITY: f64 = 20.0; // Prior for targets never observed
pub const VELOCITY_WINDOW: usize = 20; // Most recent samples averaged per target

// Wall avoidance
pub const AVOIDANCE_TURN_NUMERATOR: f64 = 800.0; // Turn degrees = numerator / distance to wall
pub const DEFAULT_PERIMETER: f64 = 120.0;
pub const MAX_AVOIDANCE_TURN: f64 = 180.0; // Used once the wall distance collapses to zero

// Firing
pub const MIN_FIRE_POWER: f64 = 0.1;
pub const MAX_FIRE_POWER: f64 = 3.0;
pub const RAM_FIRE_POWER: f64 = 3.0;
pub const BULLET_BASE_SPEED: f64 = 20.0; // Bullet speed = base - per_power * power
pub const BULLET_SPEED_PER_POWER: f64 = 3.0;
pub const DEFAULT_MIN_FIRE_RATIO: f64 = 0.05; // Normalized score below which we hold fire

// Inverse-sum scoring
pub const INVERSE_SUM_NUMERATOR: f64 = 10000.0;
pub const INVERSE_SUM_HALF_SCORE: f64 = 50.0; // Score that normalizes to 0.5

// Cosine-decay scoring
pub const COSINE_DECAY_CEILING: f64 = 100.0;
pub const COSINE_DECAY_DISTANCE_SCALE: f64 = 400.0;
pub const COSINE_DECAY_SPEED_SCALE: f64 = 8.0;

// Lead compensation
pub const LEAD_BEARING_DIVISOR: f64 = 8.0;
pub const LEAD_VELOCITY_DIVISOR: f64 = 4.0;
pub const LEAD_DISTANCE_DIVISOR: f64 = 400.0;
pub const MAX_LEAD_ANGLE: f64 = 45.0;

// Navigation
pub const GO_TO_STEP: f64 = 10.0;
pub const GO_TO_MARGIN: f64 = 5.0; // Added to half the body size for arrival
pub const DEFAULT_BODY_SIZE: f64 = 36.0;
pub const DEFAULT_HEADING_PRECISION: f64 = 1.0;
pub const TEAMMATE_RAM_TURN: f64 = 90.0;

// Headless skirmish defaults
pub const DEFAULT_ARENA_WIDTH: f64 = 800.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 600.0;
pub const DEFAULT_TICKS: u32 = 2000;
pub const DEFAULT_ENEMIES: usize = 3;
pub const MAX_ROBOT_SPEED: f64 = 8.0;
pub const MAX_TURN_RATE: f64 = 10.0; // Degrees per tick
pub const MAX_GUN_TURN_RATE: f64 = 20.0;
pub const HITS_TO_ELIMINATE: u32 = 5;

/// Runtime settings for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub perimeter: f64,
    pub velocity_window: usize,
    pub fallback_velocity: f64,
    pub strategy: TargetingStrategyKind,
    pub min_fire_ratio: f64,
    pub max_avoidance_turn: f64,
    pub body_size: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            perimeter: DEFAULT_PERIMETER,
            velocity_window: VELOCITY_WINDOW,
            fallback_velocity: DEFAULT_AVERAGE_VELOCITY,
            strategy: TargetingStrategyKind::default(),
            min_fire_ratio: DEFAULT_MIN_FIRE_RATIO,
            max_avoidance_turn: MAX_AVOIDANCE_TURN,
            body_size: DEFAULT_BODY_SIZE,
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.perimeter.is_finite() && self.perimeter >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "perimeter must be a non-negative number, got {}",
                self.perimeter
            )));
        }
        if self.velocity_window == 0 {
            return Err(CoreError::InvalidConfig(
                "velocity window must hold at least one sample".to_string(),
            ));
        }
        if !(self.fallback_velocity.is_finite() && self.fallback_velocity >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "fallback velocity must be a non-negative number, got {}",
                self.fallback_velocity
            )));
        }
        if !(0.0..=1.0).contains(&self.min_fire_ratio) {
            return Err(CoreError::InvalidConfig(format!(
                "minimum fire ratio must lie in [0, 1], got {}",
                self.min_fire_ratio
            )));
        }
        if !(self.max_avoidance_turn.is_finite() && self.max_avoidance_turn > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "max avoidance turn must be positive, got {}",
                self.max_avoidance_turn
            )));
        }
        if !(self.body_size.is_finite() && self.body_size >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "body size must be a non-negative number, got {}",
                self.body_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CoreConfig {
            velocity_window: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let config = CoreConfig {
            min_fire_ratio: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            perimeter: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
