//! Headless skirmish standing in for the host environment.
//!
//! One agent at the centre of the arena against random-walking enemies.
//! Movement and bullets are deliberately crude: this exists to drive the
//! core through whole rounds, not to model the real engine.

use crate::agent::{Agent, HostEvent};
use crate::config::{self, CoreConfig};
use crate::error::CoreError;
use crate::geometry::{self, relative_angle};
use crate::stats::BulletStats;
use crate::types::{ArenaBounds, Command, Point, SelfState, TargetObservation, wrap_heading};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

const SPAWN_MARGIN: f64 = 50.0;
const ENEMY_TURN_JITTER: f64 = 15.0;
const ENEMY_ACCEL_JITTER: f64 = 1.0;
const MIN_HIT_CHANCE: f64 = 0.02;
const MAX_HIT_CHANCE: f64 = 0.9;
// Share of the range/speed chance kept by a zero-ratio shot
const RATIO_HIT_FLOOR: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct SkirmishConfig {
    pub ticks: u32,
    pub seed: u64,
    pub bounds: ArenaBounds,
    pub enemies: usize,
    pub core: CoreConfig,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        SkirmishConfig {
            ticks: config::DEFAULT_TICKS,
            seed: 0,
            bounds: ArenaBounds {
                width: config::DEFAULT_ARENA_WIDTH,
                height: config::DEFAULT_ARENA_HEIGHT,
            },
            enemies: config::DEFAULT_ENEMIES,
            core: CoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkirmishReport {
    pub ticks: u32,
    pub stats: BulletStats,
    pub eliminated: Vec<String>,
    pub survivors: usize,
    pub still_tracked: usize,
    pub avoidance_turns: u32,
}

impl fmt::Display for SkirmishReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticks simulated: {}", self.ticks)?;
        writeln!(f, "{}", self.stats)?;
        writeln!(
            f,
            "Eliminated: {} [{}]",
            self.eliminated.len(),
            self.eliminated.join(", ")
        )?;
        writeln!(f, "Survivors: {} ({} tracked)", self.survivors, self.still_tracked)?;
        write!(f, "Avoidance turns: {}", self.avoidance_turns)
    }
}

// Our own body as the host sees it
#[derive(Debug, Clone, Copy)]
struct Body {
    position: Point,
    heading: f64,
    gun_heading: f64,
    pending_turn: f64,
    pending_gun_turn: f64,
    pending_ahead: f64,
}

#[derive(Debug, Clone)]
struct Enemy {
    name: String,
    position: Point,
    heading: f64,
    velocity: f64,
    hits: u32,
}

pub struct Skirmish {
    config: SkirmishConfig,
    rng: StdRng,
    agent: Agent,
    body: Body,
    enemies: Vec<Enemy>,
    eliminated: Vec<String>,
    tick: u32,
    avoidance_turns: u32,
}

impl Skirmish {
    pub fn new(config: SkirmishConfig) -> Result<Self, CoreError> {
        let bounds = ArenaBounds::new(config.bounds.width, config.bounds.height)?;
        let agent = Agent::new("botnav", config.core.clone())?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let body = Body {
            position: Point::new(bounds.width / 2.0, bounds.height / 2.0),
            heading: rng.gen_range(0.0..360.0),
            gun_heading: 0.0,
            pending_turn: 0.0,
            pending_gun_turn: 0.0,
            pending_ahead: 0.0,
        };

        let margin_x = SPAWN_MARGIN.min(bounds.width / 2.0);
        let margin_y = SPAWN_MARGIN.min(bounds.height / 2.0);
        let enemies = (0..config.enemies)
            .map(|i| Enemy {
                name: format!("enemy-{}", i + 1),
                position: Point::new(
                    rng.gen_range(margin_x..=bounds.width - margin_x),
                    rng.gen_range(margin_y..=bounds.height - margin_y),
                ),
                heading: rng.gen_range(0.0..360.0),
                velocity: rng.gen_range(-config::MAX_ROBOT_SPEED..=config::MAX_ROBOT_SPEED),
                hits: 0,
            })
            .collect();

        info!(
            "Skirmish: {}x{} arena, {} enemies, seed {}, strategy {}",
            bounds.width,
            bounds.height,
            config.enemies,
            config.seed,
            config.core.strategy
        );

        Ok(Skirmish {
            config,
            rng,
            agent,
            body,
            enemies,
            eliminated: Vec::new(),
            tick: 0,
            avoidance_turns: 0,
        })
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn enemy_positions(&self) -> Vec<(String, Point)> {
        self.enemies
            .iter()
            .map(|e| (e.name.clone(), e.position))
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.enemies.is_empty() || self.tick >= self.config.ticks
    }

    /// Advances one tick. Returns false once the round is over.
    pub fn step(&mut self) -> Result<bool, CoreError> {
        if self.is_finished() {
            return Ok(false);
        }
        self.tick += 1;

        let state = SelfState::new(
            self.body.position,
            self.body.heading,
            self.body.gun_heading,
            self.config.bounds,
        )?;
        self.agent.update_state(state);

        if self.agent.tick() {
            self.avoidance_turns += 1;
        } else {
            self.body.pending_ahead = config::MAX_ROBOT_SPEED;
        }

        let observations: Vec<TargetObservation> = self
            .enemies
            .iter()
            .filter_map(|enemy| observe(&state, enemy))
            .collect();
        for observation in &observations {
            self.agent
                .handle_event(HostEvent::ScannedRobot(observation.clone()));
        }

        let engaged = self
            .agent
            .weakest_target()
            .and_then(|name| observations.iter().find(|o| o.name == name).cloned())
            .and_then(|target| {
                let solution = self.agent.engage(&target)?;
                Some((target, solution.ratio))
            });

        for command in self.agent.drain_commands() {
            debug!("Tick {} command {}", self.tick, command);
            self.apply(command, engaged.as_ref().map(|(target, ratio)| (target, *ratio)));
        }

        self.move_body();
        self.move_enemies();
        Ok(!self.is_finished())
    }

    /// Runs to completion and reports
    pub fn run(mut self) -> Result<SkirmishReport, CoreError> {
        while self.step()? {}
        self.agent.handle_event(HostEvent::RoundEnded);
        Ok(SkirmishReport {
            ticks: self.tick,
            stats: *self.agent.stats(),
            eliminated: self.eliminated,
            survivors: self.enemies.len(),
            still_tracked: self.agent.tracker().len(),
            avoidance_turns: self.avoidance_turns,
        })
    }

    // `engaged` carries the target fired at and its normalized score
    fn apply(&mut self, command: Command, engaged: Option<(&TargetObservation, f64)>) {
        match command {
            // A new turn request replaces whatever turn is still outstanding
            Command::TurnLeft(deg) => self.body.pending_turn = -deg,
            Command::TurnRight(deg) => self.body.pending_turn = deg,
            Command::SetHeading(heading) => {
                self.body.pending_turn = relative_angle(heading - self.body.heading)
            }
            Command::Ahead(distance) => self.body.pending_ahead = distance,
            Command::TurnGunRight(deg) => self.body.pending_gun_turn = deg,
            Command::Fire(power) => match engaged {
                Some((target, ratio)) => self.resolve_shot(power, ratio, target),
                None => debug!("Tick {} fired with nothing engaged", self.tick),
            },
        }
    }

    /// Hit chance falls with range and target speed and grows with the
    /// firing ratio, so better-scored shots land more often.
    fn resolve_shot(&mut self, power: f64, ratio: f64, target: &TargetObservation) {
        let diagonal = self.config.bounds.diagonal();
        let confidence = RATIO_HIT_FLOOR + (1.0 - RATIO_HIT_FLOOR) * ratio.clamp(0.0, 1.0);
        let chance = ((1.0 - target.distance / diagonal)
            * (-target.velocity.abs() / config::MAX_ROBOT_SPEED).exp()
            * confidence)
            .clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE);

        if !self.rng.gen_bool(chance) {
            self.agent.handle_event(HostEvent::BulletMissed);
            return;
        }
        self.agent.handle_event(HostEvent::BulletHit);

        let Some(index) = self.enemies.iter().position(|e| e.name == target.name) else {
            return;
        };
        self.enemies[index].hits += 1;
        debug!(
            "Tick {} hit {} with power {:.2} at chance {:.2} ({} hits)",
            self.tick, target.name, power, chance, self.enemies[index].hits
        );
        if self.enemies[index].hits >= config::HITS_TO_ELIMINATE {
            let enemy = self.enemies.remove(index);
            info!("Tick {} {} eliminated", self.tick, enemy.name);
            self.agent.handle_event(HostEvent::RobotDeath(enemy.name.clone()));
            self.eliminated.push(enemy.name);
        }
    }

    fn move_body(&mut self) {
        let body = &mut self.body;

        let turn = body
            .pending_turn
            .clamp(-config::MAX_TURN_RATE, config::MAX_TURN_RATE);
        body.heading = wrap_heading(body.heading + turn);
        body.pending_turn -= turn;

        let gun_turn = body
            .pending_gun_turn
            .clamp(-config::MAX_GUN_TURN_RATE, config::MAX_GUN_TURN_RATE);
        body.gun_heading = wrap_heading(body.gun_heading + gun_turn);
        body.pending_gun_turn -= gun_turn;

        let travel = body.pending_ahead.clamp(0.0, config::MAX_ROBOT_SPEED);
        body.pending_ahead -= travel;
        let next = geometry::project(body.position, body.heading, travel);
        body.position = self.config.bounds.clamp(next);
    }

    fn move_enemies(&mut self) {
        let bounds = self.config.bounds;
        for enemy in &mut self.enemies {
            enemy.heading = wrap_heading(
                enemy.heading + self.rng.gen_range(-ENEMY_TURN_JITTER..=ENEMY_TURN_JITTER),
            );
            enemy.velocity = (enemy.velocity
                + self.rng.gen_range(-ENEMY_ACCEL_JITTER..=ENEMY_ACCEL_JITTER))
            .clamp(-config::MAX_ROBOT_SPEED, config::MAX_ROBOT_SPEED);

            let next = geometry::project(enemy.position, enemy.heading, enemy.velocity);
            if bounds.contains(next) {
                enemy.position = next;
            } else {
                enemy.heading = wrap_heading(enemy.heading + 180.0);
                enemy.position = bounds.clamp(next);
            }
        }
    }
}

// What a scan of `enemy` reports; None when it sits exactly on top of us
fn observe(me: &SelfState, enemy: &Enemy) -> Option<TargetObservation> {
    let distance = me.position.distance(&enemy.position);
    if !(distance > 0.0) {
        return None;
    }
    Some(TargetObservation {
        name: enemy.name.clone(),
        bearing: relative_angle(geometry::compass_bearing(me.position, enemy.position) - me.heading),
        distance,
        heading: enemy.heading,
        velocity: enemy.velocity,
    })
}
