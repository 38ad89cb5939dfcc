//! Arena-relative geometry: distances, bearings and angle normalization.
//!
//! Headings and bearings are in degrees, measured clockwise from the +y axis,
//! so a bearing of 90 points along +x. All functions here are pure.

use crate::error::CoreError;
use crate::types::{ArenaBounds, Point, wrap_heading};

/// Euclidean distance between two points
pub fn distance(p: Point, q: Point) -> f64 {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance of a point from the arena origin
pub fn distance_from_origin(p: Point) -> f64 {
    distance(Point::ORIGIN, p)
}

/// Bearing from `from` to `to`, derived from the arcsine of the x offset.
///
/// The quadrant table only corrects three of the four quadrants. A target
/// with positive x offset and negative y offset (south-east) keeps the raw
/// arcsine value, so it reports the mirrored north-east bearing. Callers
/// depend on that exact output, so it is kept as is.
pub fn bearing_absolute(from: Point, to: Point) -> Result<f64, CoreError> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let hypotenuse = distance(from, to);
    if !(hypotenuse > 0.0) {
        return Err(CoreError::CoincidentPoints);
    }
    let arc_sin = (dx / hypotenuse).clamp(-1.0, 1.0).asin().to_degrees();

    let bearing = if dx > 0.0 && dy > 0.0 {
        arc_sin
    } else if dx < 0.0 && dy > 0.0 {
        360.0 + arc_sin
    } else if dx < 0.0 && dy < 0.0 {
        180.0 - arc_sin
    } else {
        arc_sin
    };
    crate::debug_geometry!(
        "bearing ({:.2}, {:.2}) -> ({:.2}, {:.2}) = {:.3}",
        from.x,
        from.y,
        to.x,
        to.y,
        bearing
    );
    Ok(bearing)
}

/// [`bearing_absolute`] followed by a half-turn clamp: values above 180 lose
/// 180 and values below -180 gain 180. This is not a true normalization
/// (a bearing of 270 comes out as 90), use [`relative_angle`] for that.
pub fn bearing_relative_normalized(from: Point, to: Point) -> Result<f64, CoreError> {
    let mut bearing = bearing_absolute(from, to)?;
    if bearing > 180.0 {
        bearing -= 180.0;
    }
    if bearing < -180.0 {
        bearing += 180.0;
    }
    Ok(bearing)
}

/// True compass bearing from `from` to `to` in [0, 360), correct in all four
/// quadrants. Coincident points give 0.
pub fn compass_bearing(from: Point, to: Point) -> f64 {
    wrap_heading((to.x - from.x).atan2(to.y - from.y).to_degrees())
}

/// Normalizes any angle into (-180, 180]. Non-finite input yields 0.
pub fn relative_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut angle = angle % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Point reached by travelling `distance` from `origin` along `heading`
pub fn project(origin: Point, heading: f64, distance: f64) -> Point {
    let rad = heading.to_radians();
    Point {
        x: origin.x + rad.sin() * distance,
        y: origin.y + rad.cos() * distance,
    }
}

/// Centre of the battlefield, rounded to whole coordinates
pub fn center_of_battlefield(bounds: &ArenaBounds) -> Point {
    Point {
        x: (bounds.width / 2.0).round(),
        y: (bounds.height / 2.0).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_distance() {
        let p = Point::new(3.0, 4.0);
        let q = Point::new(-1.0, 1.0);
        assert_eq!(distance(p, p), 0.0);
        assert_approx_eq!(distance(Point::ORIGIN, p), 5.0);
        assert_eq!(distance(p, q), distance(q, p));
        assert_approx_eq!(distance_from_origin(p), 5.0);
    }

    #[test]
    fn test_bearing_quadrants() {
        let origin = Point::new(100.0, 100.0);
        // North-east
        assert_approx_eq!(bearing_absolute(origin, Point::new(110.0, 110.0)).unwrap(), 45.0);
        // North-west
        assert_approx_eq!(bearing_absolute(origin, Point::new(90.0, 110.0)).unwrap(), 315.0);
        // South-west
        assert_approx_eq!(bearing_absolute(origin, Point::new(90.0, 90.0)).unwrap(), 225.0);
    }

    #[test]
    fn test_bearing_south_east_keeps_raw_arcsine() {
        // dx = 3, dy = -4: asin(3/5) with no quadrant correction
        let bearing = bearing_absolute(Point::ORIGIN, Point::new(3.0, -4.0)).unwrap();
        assert_approx_eq!(bearing, 36.869_897_645_844_02, 1e-9);
    }

    #[test]
    fn test_bearing_on_axes() {
        let origin = Point::new(50.0, 50.0);
        assert_approx_eq!(bearing_absolute(origin, Point::new(50.0, 80.0)).unwrap(), 0.0);
        assert_approx_eq!(bearing_absolute(origin, Point::new(80.0, 50.0)).unwrap(), 90.0);
        assert_approx_eq!(bearing_absolute(origin, Point::new(20.0, 50.0)).unwrap(), -90.0);
        assert_approx_eq!(bearing_absolute(origin, Point::new(50.0, 20.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_bearing_coincident_points() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(bearing_absolute(p, p), Err(CoreError::CoincidentPoints));
        assert_eq!(bearing_relative_normalized(p, p), Err(CoreError::CoincidentPoints));
    }

    #[test]
    fn test_bearing_relative_half_turn_clamp() {
        let origin = Point::new(100.0, 100.0);
        // 315 absolute comes out as 135, not -45
        let bearing = bearing_relative_normalized(origin, Point::new(90.0, 110.0)).unwrap();
        assert_approx_eq!(bearing, 135.0);
        // 45 is left alone
        let bearing = bearing_relative_normalized(origin, Point::new(110.0, 110.0)).unwrap();
        assert_approx_eq!(bearing, 45.0);
    }

    #[test]
    fn test_compass_bearing() {
        let origin = Point::new(100.0, 100.0);
        assert_approx_eq!(compass_bearing(origin, Point::new(100.0, 110.0)), 0.0);
        assert_approx_eq!(compass_bearing(origin, Point::new(110.0, 100.0)), 90.0);
        assert_approx_eq!(compass_bearing(origin, Point::new(100.0, 90.0)), 180.0);
        assert_approx_eq!(compass_bearing(origin, Point::new(90.0, 100.0)), 270.0);
        // Agrees with bearing_absolute where the quadrant table is complete
        assert_approx_eq!(compass_bearing(origin, Point::new(90.0, 90.0)), 225.0);
        assert_approx_eq!(compass_bearing(origin, Point::new(90.0, 110.0)), 315.0);
        // South-east is reported as such
        assert_approx_eq!(compass_bearing(origin, Point::new(110.0, 90.0)), 135.0);
        assert_eq!(compass_bearing(origin, origin), 0.0);
    }

    #[test]
    fn test_relative_angle_range() {
        assert_approx_eq!(relative_angle(190.0), -170.0);
        assert_approx_eq!(relative_angle(-190.0), 170.0);
        assert_approx_eq!(relative_angle(720.0), 0.0);
        assert_eq!(relative_angle(180.0), 180.0);
        assert_eq!(relative_angle(-180.0), 180.0);
        assert_eq!(relative_angle(-540.0), 180.0);
        assert_eq!(relative_angle(f64::NAN), 0.0);

        let mut x = -1234.5;
        while x < 1234.5 {
            let once = relative_angle(x);
            assert!(once > -180.0 && once <= 180.0, "{} -> {}", x, once);
            assert_eq!(relative_angle(once), once);
            x += 17.25;
        }
    }

    #[test]
    fn test_project_and_center() {
        let p = project(Point::new(10.0, 10.0), 90.0, 5.0);
        assert_approx_eq!(p.x, 15.0);
        assert_approx_eq!(p.y, 10.0);

        let bounds = ArenaBounds::new(801.0, 600.0).unwrap();
        let center = center_of_battlefield(&bounds);
        assert_eq!(center, Point::new(401.0, 300.0));
    }
}
