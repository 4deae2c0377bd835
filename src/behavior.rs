/// Per-kind behaviour table.
///
/// Every entity is the same flat record; its kind tag selects a
/// [`Behavior`] holding how it moves, what silhouette it has and what it
/// leaves behind when destroyed.

use rand::{Rng, RngCore};

use crate::entities::{Enemy, EnemyKind, Entity, EntityKind, Shape, ShotOwner};
use crate::geometry::{self, wrap, Point};
use crate::tuning::{self, exhaust, ship, shield, shot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Reappear on the opposite edge.
    Wrap,
    /// Wrap with a margin so the sprite fully leaves before reappearing.
    WrapInset,
    /// Die on leaving the visible area.
    Bounded,
    /// No motion of its own.
    Anchored,
}

pub struct Behavior {
    pub movement: Movement,
    /// Silhouette and outline width (0 = filled).
    pub shape: fn(&Entity) -> (Shape, u32),
    /// Children spawned when the entity is destroyed (ids unassigned).
    pub on_death: fn(&Entity, &mut dyn RngCore) -> Vec<Entity>,
}

pub fn behavior(kind: &EntityKind) -> Behavior {
    match kind {
        EntityKind::Ship { .. } => Behavior {
            movement: Movement::WrapInset,
            shape: ship_shape,
            on_death: no_children,
        },
        EntityKind::Shield { .. } => Behavior {
            movement: Movement::Anchored,
            shape: shield_shape,
            on_death: no_children,
        },
        EntityKind::Shot { .. } | EntityKind::Shrapnel => Behavior {
            movement: Movement::Bounded,
            shape: disc_shape,
            on_death: no_children,
        },
        EntityKind::Exhaust { .. } => Behavior {
            movement: Movement::Bounded,
            shape: exhaust_shape,
            on_death: no_children,
        },
        EntityKind::Powerup { .. } => Behavior {
            movement: Movement::Anchored,
            shape: disc_shape,
            on_death: no_children,
        },
        EntityKind::Enemy(enemy) => match enemy.kind {
            EnemyKind::Square | EnemyKind::HardenedSquare => Behavior {
                movement: Movement::Wrap,
                shape: square_shape,
                on_death: fracture,
            },
            EnemyKind::Circle | EnemyKind::HardenedCircle => Behavior {
                movement: Movement::Wrap,
                shape: disc_shape,
                on_death: no_children,
            },
            EnemyKind::Triangle | EnemyKind::ShootingTriangle => Behavior {
                movement: Movement::Wrap,
                shape: arrow_shape,
                on_death: no_children,
            },
            EnemyKind::Pentagram => Behavior {
                movement: Movement::Wrap,
                shape: star_shape,
                on_death: no_children,
            },
        },
    }
}

/// Move one tick along the heading under the given policy.
///
/// Returns false when a bounded entity has left the area and must die.
pub fn advance(entity: &mut Entity, movement: Movement, width: f64, height: f64) -> bool {
    if movement == Movement::Anchored || entity.vel == 0.0 {
        return true;
    }
    let step = Point::along(entity.r, entity.vel);
    let x = entity.x + step.x;
    let y = entity.y + step.y;
    match movement {
        Movement::Wrap => {
            entity.x = wrap(x, width);
            entity.y = wrap(y, height);
            true
        }
        Movement::WrapInset => {
            let o = ship::WARP_OFFSET;
            entity.x = o + wrap(x - o, width - 2.0 * o);
            entity.y = o + wrap(y - o, height - 2.0 * o);
            true
        }
        Movement::Bounded => {
            entity.x = x;
            entity.y = y;
            (0.0..=width - 1.0).contains(&x) && (0.0..=height - 1.0).contains(&y)
        }
        Movement::Anchored => true,
    }
}

fn no_children(_: &Entity, _: &mut dyn RngCore) -> Vec<Entity> {
    Vec::new()
}

/// Break a square into the first step of its breakdown list; the children
/// carry the remaining steps.
fn fracture(entity: &Entity, rng: &mut dyn RngCore) -> Vec<Entity> {
    let Some(enemy) = entity.enemy() else {
        return Vec::new();
    };
    let Some((first, rest)) = enemy.breakdown.split_first() else {
        return Vec::new();
    };
    (0..first.count)
        .map(|_| new_enemy(enemy.kind, entity.x, entity.y, first.radius, rest.to_vec(), rng))
        .collect()
}

/// A fresh enemy with a random heading and speed from its profile.
pub fn new_enemy(
    kind: EnemyKind,
    x: f64,
    y: f64,
    radius: f64,
    breakdown: Vec<crate::entities::Breakdown>,
    rng: &mut dyn RngCore,
) -> Entity {
    let profile = tuning::profile(kind);
    let spin_rate = match kind {
        EnemyKind::Square | EnemyKind::HardenedSquare => {
            rng.gen_range(0.0..tuning::SQUARE_SPIN_MAX)
        }
        EnemyKind::Pentagram => rng.gen_range(0.0..tuning::PENTAGRAM_SPIN_MAX),
        _ => 0.0,
    };
    Entity {
        id: 0,
        kind: EntityKind::Enemy(Enemy {
            kind,
            lives: profile.lives,
            breakdown,
            spin: 0.0,
            spin_rate,
            busy: false,
        }),
        x,
        y,
        r: rng.gen_range(0.0..geometry::TAU),
        vel: rng.gen_range(profile.speed.0..=profile.speed.1),
        radius,
        color: profile.color_start,
        alive: true,
    }
}

// ── Shapes ──────────────────────────────────────────────────────────────────

fn ship_shape(entity: &Entity) -> (Shape, u32) {
    (Shape::Polygon(geometry::ship_outline(entity.r)), ship::OUTLINE)
}

fn shield_shape(_: &Entity) -> (Shape, u32) {
    (
        Shape::Ring {
            radius: shield::RADIUS,
            width: shield::WIDTH,
        },
        0,
    )
}

fn disc_shape(entity: &Entity) -> (Shape, u32) {
    (Shape::Circle { radius: entity.radius }, 0)
}

fn exhaust_shape(entity: &Entity) -> (Shape, u32) {
    // Drawn trailing behind the direction of travel.
    let tail = Point::along(entity.r, -exhaust::LENGTH);
    (
        Shape::Line {
            from: Point::new(0.0, 0.0),
            to: tail,
        },
        1,
    )
}

fn square_shape(entity: &Entity) -> (Shape, u32) {
    let spin = entity.enemy().map_or(0.0, |e| e.spin);
    (Shape::Polygon(geometry::square(entity.radius, spin)), 0)
}

fn arrow_shape(entity: &Entity) -> (Shape, u32) {
    (Shape::Polygon(geometry::arrowhead(entity.radius, entity.r)), 0)
}

fn star_shape(entity: &Entity) -> (Shape, u32) {
    let spin = entity.enemy().map_or(0.0, |e| e.spin);
    (
        Shape::Polygon(geometry::star(
            tuning::PENTAGRAM_OUTER,
            tuning::PENTAGRAM_INNER,
            spin,
        )),
        0,
    )
}

/// Muzzle points of an enemy, with the heading each shot leaves on.
pub fn muzzles(entity: &Entity) -> Vec<(Point, f64)> {
    let Some(enemy) = entity.enemy() else {
        return Vec::new();
    };
    match enemy.kind {
        EnemyKind::ShootingTriangle => vec![(Point::along(entity.r, entity.radius), entity.r)],
        EnemyKind::Pentagram => (0..5)
            .map(|i| {
                let heading = enemy.spin + f64::from(i) * 2.0 * std::f64::consts::PI / 5.0;
                (Point::along(heading, tuning::PENTAGRAM_OUTER), heading)
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn shot_color(owner: ShotOwner) -> crate::geometry::Rgb {
    match owner {
        ShotOwner::Player => shot::PLAYER_COLOR,
        ShotOwner::Hostile => shot::HOSTILE_COLOR,
    }
}
