//! Host-facing facade for one combat agent.
//!
//! The host pushes its own state each tick with [`Agent::update_state`], then
//! delivers events synchronously. Everything the agent wants done comes back
//! as [`Command`]s in a queue the host drains and executes.

use crate::avoidance::AvoidancePolicy;
use crate::config::{self, CoreConfig};
use crate::error::CoreError;
use crate::geometry::{self, relative_angle};
use crate::stats::BulletStats;
use crate::targeting::{self, FiringSolution, TargetingStrategy};
use crate::tracker::{SharedTracker, VelocityTracker};
use crate::types::{Command, Point, SelfState, TargetObservation};
use crate::walls::WallProximity;
use log::info;
use std::collections::{BTreeSet, VecDeque};

/// Notifications delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ScannedRobot(TargetObservation),
    /// An observation relayed by a teammate
    MessageReceived(TargetObservation),
    RobotDeath(String),
    BulletHit,
    BulletMissed,
    HitRobot { name: String, bearing: f64 },
    RoundEnded,
    Death,
}

#[derive(Debug)]
pub struct Agent {
    name: String,
    config: CoreConfig,
    tracker: SharedTracker,
    stats: BulletStats,
    strategy: Box<dyn TargetingStrategy>,
    avoidance: AvoidancePolicy,
    teammates: BTreeSet<String>,
    commands: VecDeque<Command>,
    state: Option<SelfState>,
}

impl Agent {
    /// Creates an agent with its own velocity tracker
    pub fn new(name: impl Into<String>, config: CoreConfig) -> Result<Self, CoreError> {
        let tracker = SharedTracker::new(VelocityTracker::with_window(
            config.velocity_window,
            config.fallback_velocity,
        ));
        Self::with_tracker(name, config, tracker)
    }

    /// Creates an agent around an existing tracker, e.g. one shared by a team.
    ///
    /// The tracker keeps its own window and fallback velocity; the config's
    /// `velocity_window` and `fallback_velocity` only apply to trackers built by
    /// [`Agent::new`]. A mismatch is logged at `warn`.
    pub fn with_tracker(
        name: impl Into<String>,
        config: CoreConfig,
        tracker: SharedTracker,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let name = name.into();
        let (window, fallback) = tracker.with(|t| (t.window(), t.fallback()));
        if window != config.velocity_window || fallback != config.fallback_velocity {
            log::warn!(
                target: "tracker",
                "{}: shared tracker keeps window {} / fallback {:.2}, config asks for {} / {:.2}",
                name,
                window,
                fallback,
                config.velocity_window,
                config.fallback_velocity
            );
        }
        let strategy = config.strategy.build();
        let avoidance = AvoidancePolicy::new(config.perimeter).with_max_turn(config.max_avoidance_turn);
        Ok(Agent {
            name,
            config,
            tracker,
            stats: BulletStats::new(),
            strategy,
            avoidance,
            teammates: BTreeSet::new(),
            commands: VecDeque::new(),
            state: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SharedTracker {
        &self.tracker
    }

    pub fn stats(&self) -> &BulletStats {
        &self.stats
    }

    pub fn strategy(&self) -> &dyn TargetingStrategy {
        self.strategy.as_ref()
    }

    pub fn state(&self) -> Option<&SelfState> {
        self.state.as_ref()
    }

    pub fn add_teammate(&mut self, name: impl Into<String>) {
        self.teammates.insert(name.into());
    }

    pub fn is_teammate(&self, name: &str) -> bool {
        self.teammates.contains(name)
    }

    /// Records the host's view of our own body for this tick
    pub fn update_state(&mut self, state: SelfState) {
        self.state = Some(state);
    }

    /// Commands queued since the last drain, oldest first
    pub fn drain_commands(&mut self) -> Vec<Command> {
        self.commands.drain(..).collect()
    }

    pub fn pending_commands(&self) -> &VecDeque<Command> {
        &self.commands
    }

    /// Wall proximity for the current state
    pub fn walls(&self) -> Option<WallProximity> {
        self.state.as_ref().map(WallProximity::new)
    }

    /// Per-tick wall check. Returns true if an avoidance turn was queued.
    pub fn tick(&mut self) -> bool {
        let Some(walls) = self.walls() else {
            return false;
        };
        let engaged = self.avoidance.turn_for_wall(&walls, &mut self.commands);
        if engaged {
            crate::debug_avoid!(self.name => "avoidance engaged");
        }
        engaged
    }

    /// Dispatches one host event. Returns an observation that should be
    /// broadcast to teammates, if any.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<TargetObservation> {
        match event {
            HostEvent::ScannedRobot(target) => {
                if self.on_scanned_robot(&target) {
                    Some(target)
                } else {
                    None
                }
            }
            HostEvent::MessageReceived(target) => {
                self.on_message_received(&target);
                None
            }
            HostEvent::RobotDeath(name) => {
                self.on_robot_death(&name);
                None
            }
            HostEvent::BulletHit => {
                self.on_bullet_hit();
                None
            }
            HostEvent::BulletMissed => {
                self.on_bullet_missed();
                None
            }
            HostEvent::HitRobot { name, bearing } => {
                self.on_hit_robot(&name, bearing);
                None
            }
            HostEvent::RoundEnded => {
                self.on_round_ended();
                None
            }
            HostEvent::Death => {
                self.on_death();
                None
            }
        }
    }

    /// Records an enemy's speed. Returns true if the scan should be relayed.
    pub fn on_scanned_robot(&mut self, target: &TargetObservation) -> bool {
        if self.is_teammate(&target.name) {
            return false;
        }
        self.tracker.record_observation(&target.name, target.velocity);
        true
    }

    pub fn on_message_received(&mut self, target: &TargetObservation) {
        if self.is_teammate(&target.name) || target.name == self.name {
            return;
        }
        crate::debug_agent!(self.name => "relayed scan of {}", target.name);
        self.tracker.record_observation(&target.name, target.velocity);
    }

    pub fn on_robot_death(&mut self, name: &str) {
        self.tracker.remove_target(name);
    }

    pub fn on_bullet_hit(&mut self) {
        self.stats.record_hit();
        crate::debug_stats!(self.name => "hit ({} total)", self.stats.hits());
    }

    pub fn on_bullet_missed(&mut self) {
        self.stats.record_miss();
        crate::debug_stats!(self.name => "miss ({} total)", self.stats.misses());
    }

    /// Rammed (or rammed by) another agent: back off a teammate, shoot an enemy
    pub fn on_hit_robot(&mut self, name: &str, bearing: f64) {
        if self.is_teammate(name) {
            self.commands.push_back(Command::TurnLeft(config::TEAMMATE_RAM_TURN));
        } else {
            self.commands.push_back(Command::TurnRight(relative_angle(bearing)));
            self.commands.push_back(Command::Fire(config::RAM_FIRE_POWER));
        }
    }

    pub fn on_round_ended(&mut self) {
        self.show_stats();
    }

    pub fn on_death(&mut self) {
        self.show_stats();
    }

    pub fn show_stats(&self) {
        info!(target: "stats", "[{}] {}", self.name, self.stats);
    }

    /// Lowest-average-speed target currently tracked
    pub fn weakest_target(&self) -> Option<String> {
        self.tracker.weakest_target()
    }

    /// Firing solution against `target`, without queuing anything
    pub fn firing_solution(&self, target: &TargetObservation) -> Option<FiringSolution> {
        let state = self.state.as_ref()?;
        if !(target.distance > 0.0) {
            crate::debug_target!(self.name => "{} coincides with us; skipping", target.name);
            return None;
        }
        let average = self.tracker.average_velocity(&target.name);
        Some(targeting::solve(
            self.strategy.as_ref(),
            state,
            target,
            average,
            self.config.min_fire_ratio,
        ))
    }

    /// Turns the gun onto `target` and fires if the score is high enough
    pub fn engage(&mut self, target: &TargetObservation) -> Option<FiringSolution> {
        let solution = self.firing_solution(target)?;
        self.commands.push_back(Command::TurnGunRight(solution.gun_turn));
        if let Some(power) = solution.power {
            self.commands.push_back(Command::Fire(power));
        }
        Some(solution)
    }

    /// One step toward `destination`. Returns true once within reach.
    pub fn go_to(&mut self, destination: Point) -> bool {
        let Some(state) = self.state else {
            return false;
        };
        let reach = self.config.body_size / 2.0 + config::GO_TO_MARGIN;
        if state.position.distance(&destination) <= reach {
            return true;
        }
        let heading = geometry::compass_bearing(state.position, destination);
        self.commands.push_back(Command::SetHeading(heading));
        self.commands.push_back(Command::Ahead(config::GO_TO_STEP));
        false
    }

    /// One step toward an absolute heading. Returns true once within `precision`.
    pub fn set_heading(&mut self, heading: f64, precision: f64) -> bool {
        let Some(state) = self.state else {
            return false;
        };
        let difference = relative_angle(state.heading - heading);
        if difference.abs() <= precision {
            return true;
        }
        self.commands.push_back(Command::TurnLeft(difference));
        false
    }

    /// Queues a gun turn that lines the gun up with the body
    pub fn align_gun_to_center(&mut self) -> bool {
        match self.gun_center() {
            Some(offset) => {
                self.commands.push_back(Command::TurnGunRight(offset));
                true
            }
            None => false,
        }
    }

    pub fn gun_center(&self) -> Option<f64> {
        self.state.as_ref().map(targeting::gun_center)
    }

    pub fn center_of_battlefield(&self) -> Option<Point> {
        self.state
            .as_ref()
            .map(|state| geometry::center_of_battlefield(&state.bounds))
    }
}
