//! Value types exchanged between the host environment and the navigation core.

use crate::error::CoreError;
use std::fmt;

/// A position in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        crate::geometry::distance(*self, *other)
    }
}

/// Width and height of the arena, fixed for the duration of a round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> Result<Self, CoreError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CoreError::InvalidBounds { width, height });
        }
        Ok(ArenaBounds { width, height })
    }

    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Clamps a point onto the arena rectangle
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(0.0, self.width),
            y: point.y.clamp(0.0, self.height),
        }
    }

    /// Length of the arena diagonal
    pub fn diagonal(&self) -> f64 {
        Point::ORIGIN.distance(&Point::new(self.width, self.height))
    }
}

/// One of the four boundary segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Wall::Up => "UP",
            Wall::Down => "DOWN",
            Wall::Left => "LEFT",
            Wall::Right => "RIGHT",
        };
        f.write_str(label)
    }
}

/// Own state as reported by the host at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfState {
    pub position: Point,
    pub heading: f64,     // Degrees [0, 360), clockwise
    pub gun_heading: f64, // Degrees [0, 360), clockwise
    pub bounds: ArenaBounds,
}

impl SelfState {
    /// Validates the position against the bounds and wraps both headings into [0, 360).
    /// Non-finite headings are rejected.
    pub fn new(
        position: Point,
        heading: f64,
        gun_heading: f64,
        bounds: ArenaBounds,
    ) -> Result<Self, CoreError> {
        for h in [heading, gun_heading] {
            if !h.is_finite() {
                return Err(CoreError::InvalidHeading { heading: h });
            }
        }
        if !bounds.contains(position) {
            return Err(CoreError::PositionOutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        Ok(SelfState {
            position,
            heading: wrap_heading(heading),
            gun_heading: wrap_heading(gun_heading),
            bounds,
        })
    }
}

/// A snapshot of another agent, as delivered by a scan
#[derive(Debug, Clone, PartialEq)]
pub struct TargetObservation {
    pub name: String,
    pub bearing: f64,  // Degrees, relative to own heading
    pub distance: f64,
    pub heading: f64,  // Degrees, absolute
    pub velocity: f64, // Signed speed along the target's own heading
}

impl TargetObservation {
    /// Absolute position of the target, derived from own position and heading
    pub fn absolute_position(&self, me: &SelfState) -> Point {
        crate::geometry::project(me.position, me.heading + self.bearing, self.distance)
    }
}

/// Effect requests emitted back to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TurnLeft(f64),
    TurnRight(f64),
    SetHeading(f64),
    Ahead(f64),
    TurnGunRight(f64),
    Fire(f64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::TurnLeft(deg) => write!(f, "turn-left({:.2})", deg),
            Command::TurnRight(deg) => write!(f, "turn-right({:.2})", deg),
            Command::SetHeading(deg) => write!(f, "set-heading({:.2})", deg),
            Command::Ahead(dist) => write!(f, "ahead({:.2})", dist),
            Command::TurnGunRight(deg) => write!(f, "turn-gun-right({:.2})", deg),
            Command::Fire(power) => write!(f, "fire({:.2})", power),
        }
    }
}

/// Wraps any heading into [0, 360)
pub fn wrap_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_bounds_validation() {
        assert!(ArenaBounds::new(800.0, 600.0).is_ok());
        assert_eq!(
            ArenaBounds::new(0.0, 600.0),
            Err(CoreError::InvalidBounds {
                width: 0.0,
                height: 600.0
            })
        );
        assert!(ArenaBounds::new(f64::NAN, 600.0).is_err());
    }

    #[test]
    fn test_self_state_wraps_headings() {
        let bounds = ArenaBounds::new(100.0, 100.0).unwrap();
        let state = SelfState::new(Point::new(10.0, 10.0), -90.0, 725.0, bounds).unwrap();
        assert_approx_eq!(state.heading, 270.0);
        assert_approx_eq!(state.gun_heading, 5.0);
    }

    #[test]
    fn test_self_state_rejects_outside_position() {
        let bounds = ArenaBounds::new(100.0, 100.0).unwrap();
        let result = SelfState::new(Point::new(120.0, 10.0), 0.0, 0.0, bounds);
        assert!(matches!(result, Err(CoreError::PositionOutOfBounds { .. })));
    }

    #[test]
    fn test_self_state_rejects_non_finite_headings() {
        let bounds = ArenaBounds::new(100.0, 100.0).unwrap();
        let here = Point::new(50.0, 50.0);
        assert!(matches!(
            SelfState::new(here, f64::NAN, 0.0, bounds),
            Err(CoreError::InvalidHeading { .. })
        ));
        assert_eq!(
            SelfState::new(here, 0.0, f64::INFINITY, bounds),
            Err(CoreError::InvalidHeading {
                heading: f64::INFINITY
            })
        );
        assert!(SelfState::new(here, f64::NEG_INFINITY, 0.0, bounds).is_err());
    }

    #[test]
    fn test_absolute_position() {
        let bounds = ArenaBounds::new(800.0, 600.0).unwrap();
        let me = SelfState::new(Point::new(100.0, 100.0), 90.0, 90.0, bounds).unwrap();
        let target = TargetObservation {
            name: "enemy".to_string(),
            bearing: -90.0,
            distance: 50.0,
            heading: 0.0,
            velocity: 0.0,
        };
        // Heading 90 + bearing -90 points straight up the y axis
        let pos = target.absolute_position(&me);
        assert_approx_eq!(pos.x, 100.0);
        assert_approx_eq!(pos.y, 150.0);
    }

    #[test]
    fn test_wall_labels() {
        assert_eq!(Wall::Left.to_string(), "LEFT");
        assert_eq!(Command::Fire(3.0).to_string(), "fire(3.00)");
    }
}
