//! Navigation and targeting core for an arena combat agent.
//!
//! Geometry, wall proximity, wall avoidance, per-target speed tracking and
//! firing heuristics. The host engine owns the simulation loop; it feeds
//! state and events into an [`Agent`] and executes the [`Command`]s it emits.

pub mod logging;

pub mod agent;
pub mod avoidance;
pub mod config;
pub mod error;
pub mod geometry;
pub mod harness;
pub mod stats;
pub mod targeting;
pub mod tracker;
pub mod types;
pub mod walls;

pub use agent::{Agent, HostEvent};
pub use avoidance::AvoidancePolicy;
pub use config::CoreConfig;
pub use error::CoreError;
pub use stats::BulletStats;
pub use targeting::{FiringSolution, TargetingStrategy, TargetingStrategyKind};
pub use tracker::{SharedTracker, VelocityTracker};
pub use types::{ArenaBounds, Command, Point, SelfState, TargetObservation, Wall};
pub use walls::WallProximity;
