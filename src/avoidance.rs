use crate::config;
use crate::types::Command;
use crate::walls::WallProximity;
use std::collections::VecDeque;

/// Turns away from a wall once it comes within the perimeter.
/// Each call decides from scratch; nothing carries over between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidancePolicy {
    pub perimeter: f64,
    pub max_turn: f64,
}

impl AvoidancePolicy {
    pub fn new(perimeter: f64) -> Self {
        AvoidancePolicy {
            perimeter,
            max_turn: config::MAX_AVOIDANCE_TURN,
        }
    }

    pub fn with_max_turn(mut self, max_turn: f64) -> Self {
        self.max_turn = max_turn;
        self
    }

    /// The turn to make, if any. Turns toward whichever beam has more clearance.
    pub fn decide(&self, walls: &WallProximity) -> Option<Command> {
        let distance = walls.distance_to_wall();
        if !(distance < self.perimeter) {
            return None;
        }

        let mut magnitude = config::AVOIDANCE_TURN_NUMERATOR / distance;
        if !magnitude.is_finite() {
            magnitude = self.max_turn;
        }

        let left = walls.distance_left_beam();
        let right = walls.distance_right_beam();
        let command = if left < right {
            Command::TurnRight(magnitude)
        } else {
            Command::TurnLeft(magnitude)
        };
        crate::debug_avoid!(
            "wall at {:.2} inside perimeter {:.2} (left beam {:.2}, right beam {:.2}): {}",
            distance,
            self.perimeter,
            left,
            right,
            command
        );
        Some(command)
    }

    /// Queues the avoidance turn. Returns true if a turn was queued.
    pub fn turn_for_wall(&self, walls: &WallProximity, commands: &mut VecDeque<Command>) -> bool {
        match self.decide(walls) {
            Some(command) => {
                commands.push_back(command);
                true
            }
            None => false,
        }
    }
}

impl Default for AvoidancePolicy {
    fn default() -> Self {
        Self::new(config::DEFAULT_PERIMETER)
    }
}
