//! Wall proximity along arbitrary headings.
//!
//! The probe distance is derived from the governing margin of the quadrant a
//! heading falls in and the heading folded into [0, 45] degrees:
//! `c = sqrt(a^2 + (a * tan(theta))^2)`.

use crate::types::{ArenaBounds, Point, SelfState, Wall, wrap_heading};

/// Raw distances from a position to each of the four walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallMargins {
    pub right: f64,
    pub left: f64,
    pub up: f64,
    pub down: f64,
}

impl WallMargins {
    pub fn measure(position: Point, bounds: &ArenaBounds) -> Self {
        WallMargins {
            right: bounds.width - position.x,
            left: position.x,
            up: bounds.height - position.y,
            down: position.y,
        }
    }

    /// Smaller of the two margins adjacent to the quadrant holding `heading`.
    /// Quadrants are closed at their upper edge, so 90 belongs to the first.
    pub fn governing(&self, heading: f64) -> f64 {
        if heading > 0.0 && heading <= 90.0 {
            self.right.min(self.up)
        } else if heading > 90.0 && heading <= 180.0 {
            self.right.min(self.down)
        } else if heading > 180.0 && heading <= 270.0 {
            self.down.min(self.left)
        } else {
            self.left.min(self.up)
        }
    }

    pub fn smallest(&self) -> f64 {
        self.left.min(self.right).min(self.up).min(self.down)
    }
}

/// Folds a heading into [0, 45] by stepping down in quarter turns.
/// Exactly 45 is left in place.
pub fn fold_incidence(heading: f64) -> f64 {
    let mut theta = heading;
    while theta > 45.0 {
        theta -= 90.0;
    }
    theta.abs()
}

/// Heading range guarding one side test. The first band containing the
/// heading decides; bands overlap on [70, 110) and [250, 290).
struct HeadingBand {
    from: f64,
    to: f64,
    test: fn(&WallMargins) -> bool,
}

fn in_east_half(m: &WallMargins) -> bool {
    m.left > m.right
}

fn in_north_half(m: &WallMargins) -> bool {
    m.down > m.up
}

fn in_west_half(m: &WallMargins) -> bool {
    m.left < m.right
}

fn in_south_half(m: &WallMargins) -> bool {
    m.down < m.up
}

const LEFT_SIDE_BANDS: [HeadingBand; 4] = [
    HeadingBand {
        from: 0.0,
        to: 110.0,
        test: in_east_half,
    },
    HeadingBand {
        from: 70.0,
        to: 180.0,
        test: in_north_half,
    },
    HeadingBand {
        from: 180.0,
        to: 290.0,
        test: in_west_half,
    },
    HeadingBand {
        from: 250.0,
        to: 360.0,
        test: in_south_half,
    },
];

/// Wall proximity for one position, heading and arena
#[derive(Debug, Clone, Copy)]
pub struct WallProximity {
    heading: f64,
    margins: WallMargins,
}

impl WallProximity {
    pub fn new(state: &SelfState) -> Self {
        Self::from_parts(state.position, state.heading, &state.bounds)
    }

    pub fn from_parts(position: Point, heading: f64, bounds: &ArenaBounds) -> Self {
        WallProximity {
            heading: wrap_heading(heading),
            margins: WallMargins::measure(position, bounds),
        }
    }

    pub fn margins(&self) -> &WallMargins {
        &self.margins
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Distance to the wall along an arbitrary probe heading
    pub fn probe(&self, heading: f64) -> f64 {
        let heading = wrap_heading(heading);
        let a = self.margins.governing(heading);
        let theta = fold_incidence(heading).to_radians();
        let b = theta.tan() * a;
        let c = (a * a + b * b).sqrt();
        crate::debug_walls!(
            "probe heading {:.2}: governing {:.2}, folded {:.2}, distance {:.2}",
            heading,
            a,
            theta.to_degrees(),
            c
        );
        c
    }

    /// Distance to the wall straight ahead
    pub fn distance_to_wall(&self) -> f64 {
        self.probe(self.heading)
    }

    /// Distance to the wall a quarter turn to the left
    pub fn distance_left_beam(&self) -> f64 {
        self.probe(self.heading - 90.0)
    }

    /// Distance to the wall a quarter turn to the right
    pub fn distance_right_beam(&self) -> f64 {
        self.probe(self.heading + 90.0)
    }

    /// Nearest wall by raw margin. Ties resolve LEFT, RIGHT, UP, DOWN.
    pub fn closest_wall(&self) -> Wall {
        let m = &self.margins;
        let min = m.smallest();
        [
            (Wall::Left, m.left),
            (Wall::Right, m.right),
            (Wall::Up, m.up),
            (Wall::Down, m.down),
        ]
        .into_iter()
        .find(|(_, margin)| *margin == min)
        .map(|(wall, _)| wall)
        .unwrap_or(Wall::Left)
    }

    /// Heading-banded guess at whether the closer walls are on the left.
    /// Returns false when no band contains the heading.
    pub fn closest_wall_is_on_left_side(&self) -> bool {
        LEFT_SIDE_BANDS
            .iter()
            .find(|band| self.heading >= band.from && self.heading < band.to)
            .map(|band| (band.test)(&self.margins))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn proximity(x: f64, y: f64, heading: f64, width: f64, height: f64) -> WallProximity {
        let bounds = ArenaBounds::new(width, height).unwrap();
        WallProximity::from_parts(Point::new(x, y), heading, &bounds)
    }

    #[test]
    fn test_margins() {
        let bounds = ArenaBounds::new(800.0, 600.0).unwrap();
        let m = WallMargins::measure(Point::new(100.0, 250.0), &bounds);
        assert_eq!(m.left, 100.0);
        assert_eq!(m.right, 700.0);
        assert_eq!(m.down, 250.0);
        assert_eq!(m.up, 350.0);
    }

    #[test]
    fn test_governing_margin_quadrants() {
        let m = WallMargins {
            right: 10.0,
            left: 40.0,
            up: 20.0,
            down: 30.0,
        };
        assert_eq!(m.governing(45.0), 10.0);
        assert_eq!(m.governing(90.0), 10.0);
        assert_eq!(m.governing(135.0), 10.0);
        assert_eq!(m.governing(180.0), 10.0);
        assert_eq!(m.governing(225.0), 30.0);
        assert_eq!(m.governing(270.0), 30.0);
        assert_eq!(m.governing(300.0), 20.0);
        assert_eq!(m.governing(0.0), 20.0);
    }

    #[test]
    fn test_fold_incidence() {
        assert_eq!(fold_incidence(0.0), 0.0);
        assert_eq!(fold_incidence(45.0), 45.0);
        assert_eq!(fold_incidence(46.0), 44.0);
        assert_eq!(fold_incidence(90.0), 0.0);
        assert_eq!(fold_incidence(120.0), 30.0);
        assert_eq!(fold_incidence(350.0), 10.0);
    }

    #[test]
    fn test_distance_to_wall_at_fold_boundary() {
        // Heading exactly 45 is not folded: c = 50 * sqrt(2)
        let walls = proximity(50.0, 50.0, 45.0, 100.0, 100.0);
        assert_approx_eq!(walls.distance_to_wall(), 50.0 * 2.0_f64.sqrt(), 1e-9);
    }

    #[test]
    fn test_distance_to_wall_axis_aligned() {
        let walls = proximity(200.0, 100.0, 90.0, 800.0, 600.0);
        // Heading 90 governs on min(right, up) = min(600, 500)
        assert_approx_eq!(walls.distance_to_wall(), 500.0);
        let walls = proximity(200.0, 100.0, 0.0, 800.0, 600.0);
        assert_approx_eq!(walls.distance_to_wall(), 200.0);
    }

    #[test]
    fn test_beams() {
        // Heading 90: left beam is 0 (wraps into the last quadrant), right beam is 180
        let walls = proximity(200.0, 100.0, 90.0, 800.0, 600.0);
        assert_approx_eq!(walls.distance_left_beam(), 200.0);
        assert_approx_eq!(walls.distance_right_beam(), 100.0);

        // Heading 10: left beam wraps to 280
        let walls = proximity(200.0, 100.0, 10.0, 800.0, 600.0);
        let expected = 200.0 / 10.0_f64.to_radians().cos();
        assert_approx_eq!(walls.distance_left_beam(), expected, 1e-9);
    }

    #[test]
    fn test_closest_wall() {
        assert_eq!(proximity(10.0, 50.0, 0.0, 100.0, 100.0).closest_wall(), Wall::Left);
        assert_eq!(proximity(95.0, 50.0, 0.0, 100.0, 100.0).closest_wall(), Wall::Right);
        assert_eq!(proximity(50.0, 97.0, 0.0, 100.0, 100.0).closest_wall(), Wall::Up);
        assert_eq!(proximity(50.0, 3.0, 0.0, 100.0, 100.0).closest_wall(), Wall::Down);
    }

    #[test]
    fn test_closest_wall_ties() {
        // All four margins equal at the centre
        assert_eq!(proximity(100.0, 100.0, 0.0, 200.0, 200.0).closest_wall(), Wall::Left);
        // Right and up tie
        assert_eq!(proximity(90.0, 90.0, 0.0, 100.0, 100.0).closest_wall(), Wall::Right);
        // Up and down tie
        assert_eq!(proximity(50.0, 10.0, 0.0, 200.0, 20.0).closest_wall(), Wall::Up);
    }

    #[test]
    fn test_left_side_first_band_wins() {
        // Heading 90 lies in both the first and second bands; the first decides
        let walls = proximity(80.0, 10.0, 90.0, 100.0, 100.0);
        assert!(walls.closest_wall_is_on_left_side());
        let walls = proximity(20.0, 90.0, 90.0, 100.0, 100.0);
        assert!(!walls.closest_wall_is_on_left_side());
    }

    #[test]
    fn test_left_side_remaining_bands() {
        // 150: second band, north half
        assert!(proximity(50.0, 80.0, 150.0, 100.0, 100.0).closest_wall_is_on_left_side());
        // 200: third band, west half
        assert!(proximity(20.0, 50.0, 200.0, 100.0, 100.0).closest_wall_is_on_left_side());
        // 280: third band still wins over the fourth
        assert!(!proximity(80.0, 20.0, 280.0, 100.0, 100.0).closest_wall_is_on_left_side());
        // 300: fourth band, south half
        assert!(proximity(80.0, 20.0, 300.0, 100.0, 100.0).closest_wall_is_on_left_side());
    }
}
