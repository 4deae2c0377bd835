/// Vector helpers used to build every silhouette procedurally.
///
/// Heading convention: `r = 0` points up the screen (negative y) and a
/// growing angle turns left, so one unit along heading `r` is
/// `(-sin r, -cos r)`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub const TAU: f64 = PI * 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Rotate about the origin, same sense as entity headings.
    pub fn rotate(self, angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        Point::new(self.x * c + self.y * s, -self.x * s + self.y * c)
    }

    /// Point at `length` along `heading` from the origin.
    pub fn along(heading: f64, length: f64) -> Point {
        Point::new(-length * heading.sin(), -length * heading.cos())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BACKGROUND: Rgb = Rgb(0x11, 0x11, 0x11);

    /// Per-channel integer interpolation after `taken` of `steps` steps.
    /// The fractional part is truncated toward zero on every channel.
    pub fn lerp_steps(start: Rgb, end: Rgb, steps: u32, taken: u32) -> Rgb {
        if steps == 0 {
            return start;
        }
        let channel = |a: u8, b: u8| -> u8 {
            let delta = (f64::from(b) - f64::from(a)) / f64::from(steps) * f64::from(taken);
            (i32::from(a) + delta as i32).clamp(0, 255) as u8
        };
        Rgb(
            channel(start.0, end.0),
            channel(start.1, end.1),
            channel(start.2, end.2),
        )
    }

    /// Blend toward the background by `alpha / 255`.
    pub fn faded(self, alpha: u8) -> Rgb {
        let mix = |fg: u8, bg: u8| -> u8 {
            let a = f64::from(alpha) / 255.0;
            (f64::from(fg) * a + f64::from(bg) * (1.0 - a)).round() as u8
        };
        let bg = Rgb::BACKGROUND;
        Rgb(mix(self.0, bg.0), mix(self.1, bg.1), mix(self.2, bg.2))
    }
}

/// Non-negative remainder, so positions never wrap to a negative coordinate.
pub fn wrap(value: f64, modulus: f64) -> f64 {
    let r = value.rem_euclid(modulus);
    // rem_euclid can round up to the modulus itself for tiny negatives
    if r >= modulus {
        0.0
    } else {
        r
    }
}

pub fn wrap_angle(angle: f64) -> f64 {
    wrap(angle, TAU)
}

// ── Polygon builders (local coordinates, centred on the entity) ─────────────

pub const SHIP_LENGTH: f64 = 30.0;
const SHIP_SIDES: f64 = 10.0;
pub const SHIP_NOSE: f64 = 2.0 * SHIP_LENGTH / 3.0;
const SHIP_REAR: f64 = SHIP_LENGTH / 6.0;

/// Ship hull: left wing, notch, right wing, nose.
pub fn ship_outline(r: f64) -> Vec<Point> {
    let (s, c) = r.sin_cos();
    let nose = Point::along(r, SHIP_NOSE);
    let rear = Point::new(SHIP_REAR * s, SHIP_REAR * c);
    let tail = Point::new(SHIP_LENGTH / 3.0 * s, SHIP_LENGTH / 3.0 * c);
    let p1 = tail.translate(SHIP_SIDES * c, -SHIP_SIDES * s);
    let p2 = tail.translate(-SHIP_SIDES * c, SHIP_SIDES * s);
    vec![p1, rear, p2, nose]
}

/// Wing tips of the hull, where exhaust is emitted.
pub fn ship_wing_tips(r: f64) -> [Point; 2] {
    let hull = ship_outline(r);
    [hull[0], hull[2]]
}

pub fn square(radius: f64, spin: f64) -> Vec<Point> {
    (0..4)
        .map(|i| Point::along(spin + f64::from(i) * PI / 2.0, radius))
        .collect()
}

/// Arrowhead used by triangle enemies: nose, two barbs and a notch behind
/// the centre.
pub fn arrowhead(radius: f64, r: f64) -> Vec<Point> {
    let (s, c) = r.sin_cos();
    vec![
        Point::along(r, radius),
        Point::along(r + 2.0 * PI / 3.0, radius),
        Point::new(radius * s / 4.0, radius * c / 4.0),
        Point::along(r + 4.0 * PI / 3.0, radius),
    ]
}

/// Five-pointed star, outer and inner vertices alternating.
pub fn star(outer: f64, inner: f64, spin: f64) -> Vec<Point> {
    (0..10)
        .map(|i| {
            let length = if i % 2 == 0 { outer } else { inner };
            Point::along(spin + f64::from(i) * PI / 5.0, length)
        })
        .collect()
}

/// Heading that points from `from` toward `to`.
pub fn heading_towards(from: Point, to: Point) -> f64 {
    wrap_angle((from.x - to.x).atan2(from.y - to.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn along_zero_points_up() {
        let p = Point::along(0.0, 10.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn heading_towards_matches_movement() {
        let from = Point::new(100.0, 100.0);
        let to = Point::new(150.0, 40.0);
        let r = heading_towards(from, to);
        let step = Point::along(r, 1.0);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len = (dx * dx + dy * dy).sqrt();
        assert!((step.x - dx / len).abs() < 1e-9);
        assert!((step.y - dy / len).abs() < 1e-9);
    }

    #[test]
    fn wrap_never_returns_modulus() {
        assert_eq!(wrap(-1e-18, 800.0), 0.0);
        assert_eq!(wrap(805.0, 800.0), 5.0);
        assert_eq!(wrap(-5.0, 800.0), 795.0);
    }
}
