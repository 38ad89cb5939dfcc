//! Hit-likelihood scoring, lead compensation and fire-power selection.
//!
//! Scores are relative ranking signals, not probabilities. Every strategy must
//! be non-increasing in distance, gun offset and target speed.

use crate::config;
use crate::error::CoreError;
use crate::geometry::relative_angle;
use crate::types::{SelfState, TargetObservation};
use std::fmt;
use std::str::FromStr;

/// The quantities a strategy scores, derived from one observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetingInput {
    pub distance: f64,
    pub gun_offset: f64,       // Degrees the gun must turn to face the target
    pub direction_offset: f64, // Target heading relative to the gun, degrees
    pub speed: f64,            // Tracked average speed
}

impl TargetingInput {
    pub fn new(me: &SelfState, target: &TargetObservation, average_speed: f64) -> Self {
        TargetingInput {
            distance: target.distance.abs(),
            gun_offset: gun_heading_relative_to(me, target),
            direction_offset: relative_angle(target.heading - me.gun_heading),
            speed: average_speed.abs(),
        }
    }
}

/// A scoring formula for choosing how hard to fire
pub trait TargetingStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, input: &TargetingInput) -> f64;

    /// Maps a score onto [0, 1] so every strategy shares one fire-power table
    fn normalize(&self, score: f64) -> f64;
}

/// `10000 / ((distance/2 + 2*|gun offset| + |direction offset|) * speed + 1)`,
/// angles in radians
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseSum;

impl TargetingStrategy for InverseSum {
    fn name(&self) -> &'static str {
        "inverse-sum"
    }

    fn score(&self, input: &TargetingInput) -> f64 {
        let spread = input.distance / 2.0
            + input.gun_offset.to_radians().abs() * 2.0
            + input.direction_offset.to_radians().abs();
        config::INVERSE_SUM_NUMERATOR / (spread * input.speed + 1.0)
    }

    fn normalize(&self, score: f64) -> f64 {
        let score = score.max(0.0);
        (score / (score + config::INVERSE_SUM_HALF_SCORE)).clamp(0.0, 1.0)
    }
}

/// `100 * e^(-distance/400) * (1 + cos(gun offset)) / 2 * e^(-speed/8)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDecay;

impl TargetingStrategy for CosineDecay {
    fn name(&self) -> &'static str {
        "cosine-decay"
    }

    fn score(&self, input: &TargetingInput) -> f64 {
        let range = (-input.distance / config::COSINE_DECAY_DISTANCE_SCALE).exp();
        let alignment = (1.0 + input.gun_offset.to_radians().cos()) / 2.0;
        let agility = (-input.speed / config::COSINE_DECAY_SPEED_SCALE).exp();
        config::COSINE_DECAY_CEILING * range * alignment * agility
    }

    fn normalize(&self, score: f64) -> f64 {
        (score / config::COSINE_DECAY_CEILING).clamp(0.0, 1.0)
    }
}

/// Selects a scoring formula by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetingStrategyKind {
    #[default]
    InverseSum,
    CosineDecay,
}

impl TargetingStrategyKind {
    pub fn build(self) -> Box<dyn TargetingStrategy> {
        match self {
            TargetingStrategyKind::InverseSum => Box::new(InverseSum),
            TargetingStrategyKind::CosineDecay => Box::new(CosineDecay),
        }
    }
}

impl FromStr for TargetingStrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inverse-sum" | "inverse_sum" | "inverse" => Ok(TargetingStrategyKind::InverseSum),
            "cosine-decay" | "cosine_decay" | "cosine" => Ok(TargetingStrategyKind::CosineDecay),
            other => Err(CoreError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for TargetingStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetingStrategyKind::InverseSum => f.write_str("inverse-sum"),
            TargetingStrategyKind::CosineDecay => f.write_str("cosine-decay"),
        }
    }
}

/// Degrees the gun must turn right to face the target, in (-180, 180]
pub fn gun_heading_relative_to(me: &SelfState, target: &TargetObservation) -> f64 {
    relative_angle(me.heading + target.bearing - me.gun_heading)
}

/// Offset between body and gun heading
pub fn gun_center(me: &SelfState) -> f64 {
    me.heading - me.gun_heading
}

/// Heuristic lead angle in degrees, clamped to +/- MAX_LEAD_ANGLE.
/// A zero own heading is treated as 1 in the heading ratio.
pub fn movement_compensation(me: &SelfState, target: &TargetObservation) -> f64 {
    let own_heading = if me.heading == 0.0 { 1.0 } else { me.heading };
    let relative_heading = target.bearing + target.heading / own_heading;
    let lead = relative_heading / config::LEAD_BEARING_DIVISOR
        * (target.velocity / config::LEAD_VELOCITY_DIVISOR)
        * (target.distance / config::LEAD_DISTANCE_DIVISOR);
    if lead.is_finite() {
        lead.clamp(-config::MAX_LEAD_ANGLE, config::MAX_LEAD_ANGLE)
    } else {
        0.0
    }
}

/// Speed of a bullet fired with `power`
pub fn bullet_speed(power: f64) -> f64 {
    config::BULLET_BASE_SPEED - config::BULLET_SPEED_PER_POWER * power
}

/// Power that produces a bullet of the given speed
pub fn power_for_bullet_speed(speed: f64) -> f64 {
    (speed - config::BULLET_BASE_SPEED) / -config::BULLET_SPEED_PER_POWER
}

/// Fire power for a normalized score, or None to hold fire
pub fn fire_power(ratio: f64, min_ratio: f64) -> Option<f64> {
    if !(ratio >= min_ratio) {
        return None;
    }
    let ratio = ratio.clamp(0.0, 1.0);
    Some(config::MIN_FIRE_POWER + ratio * (config::MAX_FIRE_POWER - config::MIN_FIRE_POWER))
}

/// Everything needed to turn the gun and pull the trigger on one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSolution {
    pub score: f64,
    pub ratio: f64,
    pub lead: f64,
    pub gun_turn: f64,
    pub power: Option<f64>,
}

pub fn solve(
    strategy: &dyn TargetingStrategy,
    me: &SelfState,
    target: &TargetObservation,
    average_speed: f64,
    min_ratio: f64,
) -> FiringSolution {
    let input = TargetingInput::new(me, target, average_speed);
    let score = strategy.score(&input);
    let ratio = strategy.normalize(score);
    let lead = movement_compensation(me, target);
    let solution = FiringSolution {
        score,
        ratio,
        lead,
        gun_turn: relative_angle(input.gun_offset + lead),
        power: fire_power(ratio, min_ratio),
    };
    crate::debug_target!(
        "{} on {}: score {:.3} (ratio {:.3}), gun turn {:.2}, power {:?}",
        strategy.name(),
        target.name,
        solution.score,
        solution.ratio,
        solution.gun_turn,
        solution.power
    );
    solution
}
