use geometry_cometry::behavior::new_enemy;
use geometry_cometry::collision::*;
use geometry_cometry::entities::*;
use geometry_cometry::geometry::{Point, Rgb};
use geometry_cometry::tuning;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn disc(x: f64, y: f64, radius: f64) -> Entity {
    Entity {
        id: 1,
        kind: EntityKind::Shot {
            owner: ShotOwner::Player,
        },
        x,
        y,
        r: 0.0,
        vel: 0.0,
        radius,
        color: Rgb::WHITE,
        alive: true,
    }
}

fn pentagram_at(x: f64, y: f64) -> Entity {
    // Fresh enemies start with zero spin.
    new_enemy(
        EnemyKind::Pentagram,
        x,
        y,
        tuning::PENTAGRAM_OUTER,
        Vec::new(),
        &mut seeded_rng(),
    )
}

#[test]
fn rect_intersection() {
    let a = Rect { x: 0, y: 0, w: 10, h: 10 };
    let b = Rect { x: 5, y: 5, w: 10, h: 10 };
    assert_eq!(a.intersection(&b), Some(Rect { x: 5, y: 5, w: 5, h: 5 }));

    // Touching edges share no pixel.
    let c = Rect { x: 10, y: 0, w: 5, h: 5 };
    assert_eq!(a.intersection(&c), None);
}

#[test]
fn far_apart_never_collide() {
    assert!(!collides(&disc(100.0, 100.0, 10.0), &disc(300.0, 100.0, 10.0)));
}

#[test]
fn overlapping_discs_collide() {
    assert!(collides(&disc(100.0, 100.0, 10.0), &disc(112.0, 100.0, 10.0)));
    assert!(collides(&disc(112.0, 100.0, 10.0), &disc(100.0, 100.0, 10.0)));
}

#[test]
fn diagonal_corners_do_not_collide() {
    // Bounding squares overlap at the corners, the circles do not.
    assert!(!collides(&disc(100.0, 100.0, 10.0), &disc(116.0, 116.0, 10.0)));
}

#[test]
fn shot_between_star_arms_misses() {
    let star = pentagram_at(200.0, 200.0);
    // Along an inner vertex, past the notch.
    let gap = Point::along(std::f64::consts::PI / 5.0, 24.0);
    let shot = disc(200.0 + gap.x, 200.0 + gap.y, tuning::shot::RADIUS);
    assert!(bounding_rect(&star).intersection(&bounding_rect(&shot)).is_some());
    assert!(!collides(&shot, &star));
}

#[test]
fn shot_on_star_arm_hits() {
    let star = pentagram_at(200.0, 200.0);
    let arm = Point::along(0.0, 18.0);
    let shot = disc(200.0 + arm.x, 200.0 + arm.y, tuning::shot::RADIUS);
    assert!(collides(&shot, &star));
}

#[test]
fn ring_has_a_hole() {
    let ring = Silhouette::rasterise(
        &Shape::Ring {
            radius: 30.0,
            width: 5.0,
        },
        0,
        60,
    );
    assert!(!ring.get(30, 30));
    assert!(ring.get(30, 2));
    assert!(!ring.get(-1, 0));
}

#[test]
fn filled_circle_area() {
    let mask = Silhouette::rasterise(&Shape::Circle { radius: 10.0 }, 0, 20);
    assert_eq!(mask.side(), 20);
    // π·r² ≈ 314
    assert!((300..=330).contains(&mask.count()));
}

#[test]
fn outlined_polygon_is_hollow() {
    let square = vec![
        Point::new(-10.0, -10.0),
        Point::new(10.0, -10.0),
        Point::new(10.0, 10.0),
        Point::new(-10.0, 10.0),
    ];
    let filled = Silhouette::rasterise(&Shape::Polygon(square.clone()), 0, 24);
    let stroked = Silhouette::rasterise(&Shape::Polygon(square), 2, 24);
    assert!(filled.get(12, 12));
    assert!(!stroked.get(12, 12));
    assert!(stroked.get(2, 12));
    assert!(stroked.count() < filled.count());
}

#[test]
fn sprite_side_is_even() {
    assert_eq!(sprite_side(&disc(0.0, 0.0, 4.0)), 8);
    assert_eq!(sprite_side(&disc(0.0, 0.0, 10.5)), 22);
    assert_eq!(sprite_side(&disc(0.0, 0.0, 3.2)), 8);
}
