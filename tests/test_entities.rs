use std::collections::HashSet;

use geometry_cometry::behavior::{advance, behavior, muzzles, new_enemy, Movement};
use geometry_cometry::entities::*;
use geometry_cometry::geometry::Rgb;
use geometry_cometry::tuning;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn moving(x: f64, y: f64, r: f64, vel: f64) -> Entity {
    Entity {
        id: 1,
        kind: EntityKind::Shrapnel,
        x,
        y,
        r,
        vel,
        radius: 3.0,
        color: Rgb::WHITE,
        alive: true,
    }
}

// ── Plain data ────────────────────────────────────────────────────────────────

#[test]
fn defaults() {
    assert_eq!(Special::default(), Special::None);
    assert!(!InputSnapshot::default().fire);
    let settings = Settings::default();
    assert!(!settings.debug);
    assert!(settings.effects);
}

#[test]
fn enemy_kinds_are_listed_once() {
    let seen: HashSet<EnemyKind> = EnemyKind::ALL.into_iter().collect();
    assert_eq!(seen.len(), 7);
    assert_eq!(EnemyKind::ALL[0], EnemyKind::Triangle);
    assert_eq!(EnemyKind::ALL[6], EnemyKind::Pentagram);
}

#[test]
fn entity_clone_is_independent() {
    let original = moving(1.0, 2.0, 0.0, 1.0);
    let mut cloned = original.clone();
    cloned.x = 50.0;
    cloned.alive = false;
    assert_eq!(original.x, 1.0);
    assert!(original.alive);
}

// ── Colours ───────────────────────────────────────────────────────────────────

#[test]
fn lerp_midpoint() {
    let c = Rgb::lerp_steps(Rgb(0x00, 0x99, 0xFF), Rgb(0xCC, 0xFF, 0xFF), 2, 1);
    assert_eq!(c, Rgb(0x66, 0xCC, 0xFF));
}

#[test]
fn lerp_truncates_toward_zero() {
    // 10 - 10/3 = 6.67, kept at 7
    assert_eq!(Rgb::lerp_steps(Rgb(10, 0, 0), Rgb(0, 0, 0), 3, 1), Rgb(7, 0, 0));
    // 0 + 10/3 = 3.33, kept at 3
    assert_eq!(Rgb::lerp_steps(Rgb(0, 0, 0), Rgb(10, 0, 0), 3, 1), Rgb(3, 0, 0));
}

#[test]
fn lerp_ends_and_zero_steps() {
    let (a, b) = (Rgb(0x99, 0x00, 0x99), Rgb(0x99, 0x00, 0x00));
    assert_eq!(Rgb::lerp_steps(a, b, 3, 0), a);
    assert_eq!(Rgb::lerp_steps(a, b, 3, 3), b);
    assert_eq!(Rgb::lerp_steps(a, b, 0, 3), a);
}

#[test]
fn faded_blends_into_background() {
    let c = Rgb(0xFF, 0x00, 0x66);
    assert_eq!(c.faded(255), c);
    assert_eq!(c.faded(0), Rgb::BACKGROUND);
}

// ── Behaviour table ───────────────────────────────────────────────────────────

#[test]
fn movement_policies() {
    let ship = EntityKind::Ship { last_shot_ms: None };
    assert_eq!(behavior(&ship).movement, Movement::WrapInset);
    let shot = EntityKind::Shot {
        owner: ShotOwner::Hostile,
    };
    assert_eq!(behavior(&shot).movement, Movement::Bounded);
    let powerup = EntityKind::Powerup {
        kind: PowerupKind::Burst,
    };
    assert_eq!(behavior(&powerup).movement, Movement::Anchored);
}

#[test]
fn wrap_moves_to_the_opposite_edge() {
    // r = π/2 heads left.
    let mut e = moving(1.0, 50.0, std::f64::consts::FRAC_PI_2, 3.0);
    assert!(advance(&mut e, Movement::Wrap, 800.0, 580.0));
    assert!((e.x - 798.0).abs() < 1e-9);
    assert!((e.y - 50.0).abs() < 1e-9);
}

#[test]
fn bounded_reports_leaving() {
    let mut e = moving(1.0, 50.0, std::f64::consts::FRAC_PI_2, 3.0);
    assert!(!advance(&mut e, Movement::Bounded, 800.0, 580.0));

    let mut inside = moving(400.0, 50.0, std::f64::consts::FRAC_PI_2, 3.0);
    assert!(advance(&mut inside, Movement::Bounded, 800.0, 580.0));
}

#[test]
fn anchored_never_moves() {
    let mut e = moving(10.0, 10.0, 0.0, 5.0);
    assert!(advance(&mut e, Movement::Anchored, 800.0, 580.0));
    assert_eq!((e.x, e.y), (10.0, 10.0));
}

#[test]
fn new_enemy_takes_profile() {
    let e = new_enemy(EnemyKind::ShootingTriangle, 5.0, 6.0, 28.0, Vec::new(), &mut seeded_rng());
    let p = tuning::profile(EnemyKind::ShootingTriangle);
    let data = e.enemy().expect("enemy data");
    assert_eq!(data.lives, p.lives);
    assert_eq!(e.color, p.color_start);
    assert!(e.vel >= p.speed.0 && e.vel <= p.speed.1);
    assert!(!data.busy);
}

#[test]
fn breakdown_runs_through_every_step() {
    let rule = vec![
        Breakdown { radius: 14.0, count: 2 },
        Breakdown { radius: 8.0, count: 2 },
    ];
    let mut rng = seeded_rng();
    let parent = new_enemy(EnemyKind::HardenedSquare, 100.0, 100.0, 23.0, rule, &mut rng);

    let on_death = behavior(&parent.kind).on_death;
    let children = on_death(&parent, &mut rng);
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(child.radius, 14.0);
        assert_eq!((child.x, child.y), (100.0, 100.0));
        let data = child.enemy().expect("enemy data");
        assert_eq!(data.kind, EnemyKind::HardenedSquare);
        assert_eq!(data.lives, 3);
        assert_eq!(data.breakdown, vec![Breakdown { radius: 8.0, count: 2 }]);
    }

    let grandchildren = on_death(&children[0], &mut rng);
    assert_eq!(grandchildren.len(), 2);
    assert!(grandchildren.iter().all(|g| g.radius == 8.0));
    assert!(on_death(&grandchildren[0], &mut rng).is_empty());
}

#[test]
fn circles_leave_nothing_behind() {
    let mut rng = seeded_rng();
    let circle = new_enemy(EnemyKind::Circle, 0.0, 0.0, 20.0, Vec::new(), &mut rng);
    assert!((behavior(&circle.kind).on_death)(&circle, &mut rng).is_empty());
}

#[test]
fn pentagram_fires_from_every_point() {
    let star = new_enemy(
        EnemyKind::Pentagram,
        0.0,
        0.0,
        tuning::PENTAGRAM_OUTER,
        Vec::new(),
        &mut seeded_rng(),
    );
    let shots = muzzles(&star);
    assert_eq!(shots.len(), 5);
    for (at, _) in &shots {
        assert!((at.x.hypot(at.y) - tuning::PENTAGRAM_OUTER).abs() < 1e-9);
    }
}

#[test]
fn only_shooters_have_muzzles() {
    let mut rng = seeded_rng();
    let shooter = new_enemy(EnemyKind::ShootingTriangle, 0.0, 0.0, 28.0, Vec::new(), &mut rng);
    assert_eq!(muzzles(&shooter).len(), 1);
    let plain = new_enemy(EnemyKind::Triangle, 0.0, 0.0, 28.0, Vec::new(), &mut rng);
    assert!(muzzles(&plain).is_empty());
}
