// Core errors: degenerate geometry, invalid host input, bad configuration

use thiserror::Error;

/// Errors raised by the navigation core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Bearing is undefined between coincident points")]
    CoincidentPoints,
    #[error("Invalid arena bounds {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
    #[error("Position ({x:.2}, {y:.2}) lies outside the arena")]
    PositionOutOfBounds { x: f64, y: f64 },
    #[error("Heading {heading} is not a finite angle")]
    InvalidHeading { heading: f64 },
    #[error("Unknown targeting strategy '{0}'")]
    UnknownStrategy(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
