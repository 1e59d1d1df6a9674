//! Angles on the wheel.
//!
//! Angles are degrees, `0°` at the top (12 o'clock) and increasing clockwise,
//! the way an SVG canvas with its y axis pointing down draws them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::date::day_of_year;

/// A point on the drawing plane.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Reduces any angle into `[0, 360)`.
///
/// ```
/// use celtic_wheel::geometry::normalize_angle;
///
/// assert_eq!(270.0, normalize_angle(-90.0));
/// assert_eq!(0.0, normalize_angle(720.0));
/// ```
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs.
    if a >= 360.0 { 0.0 } else { a }
}

/// Angle of the day `date` falls on, for a year of `total_days` days,
/// rotated back by `start_angle`.
///
/// `total_days` has to match the year of `date`; this is not checked.
pub fn date_to_angle(date: &DateTime<Utc>, total_days: u32, start_angle: f64) -> f64 {
    let day = day_of_year(date) as f64;
    normalize_angle((day - 1.0) * 360.0 / total_days as f64 - start_angle)
}

/// Point at `radius` and `angle_deg` around `(cx, cy)`.
///
/// ```
/// use celtic_wheel::geometry::polar_to_cartesian;
///
/// let top = polar_to_cartesian(10.0, 0.0, 0.0, 0.0);
/// assert!(top.x.abs() < 1e-9 && (top.y + 10.0).abs() < 1e-9);
/// ```
pub fn polar_to_cartesian(radius: f64, angle_deg: f64, cx: f64, cy: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point {
        x: cx + radius * rad.cos(),
        y: cy + radius * rad.sin(),
    }
}

/// Clockwise angular distance from `from` to `to`, in `[0, 360)`.
pub fn span(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// SVG path of a ring slice between two radii, sweeping clockwise from `a0`
/// to `a1` and wrapping through 0° when needed.
pub fn annular_sector_path(r_inner: f64, r_outer: f64, a0: f64, a1: f64) -> String {
    let large = (span(a0, a1) > 180.0) as u8;
    let po0 = polar_to_cartesian(r_outer, a0, 0.0, 0.0);
    let po1 = polar_to_cartesian(r_outer, a1, 0.0, 0.0);
    let pi1 = polar_to_cartesian(r_inner, a1, 0.0, 0.0);
    let pi0 = polar_to_cartesian(r_inner, a0, 0.0, 0.0);
    [
        format!("M {} {}", po0.x, po0.y),
        format!("A {r_outer} {r_outer} 0 {large} 1 {} {}", po1.x, po1.y),
        format!("L {} {}", pi1.x, pi1.y),
        format!("A {r_inner} {r_inner} 0 {large} 0 {} {}", pi0.x, pi0.y),
        "Z".to_owned(),
    ]
    .join(" ")
}

/// SVG path of a full circle made of two half arcs, starting at
/// `start_angle`. Used as a baseline for text running around the wheel.
pub fn circle_path(cx: f64, cy: f64, r: f64, start_angle: f64) -> String {
    let start = polar_to_cartesian(r, start_angle, cx, cy);
    let opposite = polar_to_cartesian(r, start_angle + 180.0, cx, cy);
    [
        format!("M {} {}", start.x, start.y),
        format!("A {r} {r} 0 1 1 {} {}", opposite.x, opposite.y),
        format!("A {r} {r} 0 1 1 {} {}", start.x, start.y),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn dates_to_angles() {
        let jan1 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(0.0, date_to_angle(&jan1, 365, 0.0));
        let day183 = Utc.with_ymd_and_hms(2023, 7, 2, 18, 0, 0).unwrap();
        assert!(close(182.0 * 360.0 / 365.0, date_to_angle(&day183, 365, 0.0)));
        // Rotating by the angle of the date itself puts it at the top.
        let a = date_to_angle(&day183, 365, 0.0);
        assert_eq!(0.0, date_to_angle(&day183, 365, a));
        assert!(close(360.0 - a, date_to_angle(&jan1, 365, a)));
    }

    #[test]
    fn polar_convention() {
        let p = polar_to_cartesian(5.0, 90.0, 0.0, 0.0);
        assert!(close(5.0, p.x) && close(0.0, p.y));
        let p = polar_to_cartesian(5.0, 180.0, 1.0, 1.0);
        assert!(close(1.0, p.x) && close(6.0, p.y));
    }

    #[test]
    fn sector_large_arc_flag() {
        let small = annular_sector_path(10.0, 20.0, 350.0, 80.0);
        assert!(small.contains("A 20 20 0 0 1"), "{small}");
        assert!(small.contains("A 10 10 0 0 0"), "{small}");
        let large = annular_sector_path(10.0, 20.0, 80.0, 350.0);
        assert!(large.contains("A 20 20 0 1 1"), "{large}");
        assert!(large.starts_with("M ") && large.ends_with(" Z"));
    }

    #[test]
    fn circle_path_starts_at_angle() {
        let path = circle_path(0.0, 0.0, 10.0, 90.0);
        assert!(path.starts_with("M 10 "), "{path}");
        assert_eq!(2, path.matches("A 10 10 0 1 1").count());
    }

    proptest! {
        #[test]
        fn normalize_in_range_and_idempotent(x in -1.0e7f64..1.0e7) {
            let a = normalize_angle(x);
            prop_assert!((0.0..360.0).contains(&a));
            prop_assert_eq!(a, normalize_angle(a));
        }

        #[test]
        fn date_angle_in_range(day in 0i64..366, start in -720.0f64..720.0) {
            let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + chrono::Duration::days(day);
            let a = date_to_angle(&date, 366, start);
            prop_assert!((0.0..360.0).contains(&a));
        }

        #[test]
        fn spans_of_a_cycle_cover_circle(mut cuts in proptest::collection::vec(0.0f64..360.0, 4)) {
            cuts.sort_by(f64::total_cmp);
            let total: f64 = (0..4).map(|i| span(cuts[i], cuts[(i + 1) % 4])).sum();
            // Degenerate when all four cuts coincide.
            if cuts[0] != cuts[3] {
                prop_assert!((total - 360.0).abs() < 1e-6);
            }
        }
    }
}
