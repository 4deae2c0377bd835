/// Gameplay constants, one table per kind of thing.
///
/// Distances are pixels in an 800×600 world, speeds are pixels per tick,
/// delays are milliseconds unless marked as ticks.

use std::f64::consts::PI;

use crate::entities::{Breakdown, EnemyKind, PowerupKind, Special};
use crate::geometry::Rgb;

pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;
/// Height of the status panel below the play area.
pub const PANEL_HEIGHT: f64 = 20.0;

pub const STARTING_LIVES: u32 = 3;
pub const DEATH_DELAY_MS: u64 = 1500;
pub const KILLS_PER_STAGE: u32 = 25;
pub const STAR_COUNT: usize = 1000;

// ── Ship ────────────────────────────────────────────────────────────────────

pub mod ship {
    use super::*;

    pub const COLOR: Rgb = Rgb::WHITE;
    pub const OUTLINE: u32 = 3;
    /// Half-extent of the sprite square (the nose length).
    pub const RADIUS: f64 = crate::geometry::SHIP_NOSE;
    pub const MAX_SPEED: f64 = 3.0;
    pub const ACCEL: f64 = 0.3;
    pub const DECEL: f64 = 0.06;
    pub const TURN: f64 = PI / 50.0;
    /// The ship must cross this far past an edge before reappearing.
    pub const WARP_OFFSET: f64 = 10.0;
    pub const SHOT_DELAY_MS: u64 = 150;
    pub const SHOT_MAX: usize = 3;
    pub const RAPID_DELAY_MS: u64 = 65;
    pub const EXHAUST_COLOR: Rgb = Rgb(0xCC, 0xCC, 0xCC);
    pub const EXHAUST_LIFESPAN: u32 = 7;
    pub const SHRAPNEL: (u32, u32) = (20, 30);
    pub const SHRAPNEL_RADIUS: f64 = 12.0;
}

// ── Projectiles & particles ─────────────────────────────────────────────────

pub mod shot {
    use super::*;

    pub const RADIUS: f64 = 4.0;
    pub const SPEED: f64 = 8.0;
    pub const PLAYER_COLOR: Rgb = Rgb(0xFF, 0x00, 0x66);
    pub const HOSTILE_COLOR: Rgb = Rgb(0x00, 0xFF, 0x99);
    pub const HOSTILE_SPEED: f64 = 5.0;
    pub const HOSTILE_POINTS: u32 = 10;
    pub const BURST_PER_TICK: (u32, u32) = (2, 5);
    pub const BURST_SPEED: (u32, u32) = (6, 16);
}

pub mod shrapnel {
    pub const SPEED: (u32, u32) = (8, 18);
    pub const DEFAULT_COUNT: (u32, u32) = (6, 16);
    pub const DEFAULT_RADIUS: f64 = 3.0;
}

pub mod exhaust {
    use super::*;

    pub const LENGTH: f64 = 3.0;
    pub const SPEED: f64 = 1.5;
    /// Random spread either side of the exhaust heading.
    pub const SPREAD: f64 = PI / 3.0;
}

pub mod shield {
    pub const RADIUS: f64 = crate::geometry::SHIP_LENGTH;
    pub const WIDTH: f64 = 5.0;
    /// Sprite alpha before the fade starts.
    pub const ALPHA: u8 = 0xCC;
    pub const FADE_TICKS: u32 = 150;
}

// ── Powerups ────────────────────────────────────────────────────────────────

pub mod powerup {
    use super::*;

    pub const RADIUS: f64 = 18.0;
    pub const COLOR: Rgb = Rgb(0x00, 0xFF, 0x00);
    pub const LIFE_MS: (f64, f64) = (2250.0, 5250.0);
    pub const EDGE_INSET: f64 = 50.0;
    pub const EXHAUST_OFFSET: f64 = 4.0;
    pub const EXHAUST_LIFESPAN: u32 = 12;
    pub const SHRAPNEL: (u32, u32) = (15, 25);
    pub const SHRAPNEL_RADIUS: f64 = 7.0;
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Shield,
        PowerupKind::RapidFire,
        PowerupKind::Burst,
        PowerupKind::OneUp,
    ];

    /// Letter printed on the powerup; kinds without one never spawn.
    pub const fn code(kind: PowerupKind) -> Option<char> {
        match kind {
            PowerupKind::Shield => Some('S'),
            PowerupKind::RapidFire => Some('R'),
            PowerupKind::Burst => Some('B'),
            PowerupKind::OneUp => None,
        }
    }

    pub const fn name(kind: PowerupKind) -> &'static str {
        match kind {
            PowerupKind::Shield => "Shields",
            PowerupKind::RapidFire => "Rapid Fire",
            PowerupKind::Burst => "Burst",
            PowerupKind::OneUp => "1-Up",
        }
    }
}

// ── Specials ────────────────────────────────────────────────────────────────

/// How long a special lasts before its teardown starts.
pub const fn special_delay_ms(special: Special) -> u64 {
    match special {
        Special::None => 0,
        Special::InitialShield => 250,
        Special::Shield => 5000,
        Special::RapidFire => 8500,
        Special::Burst => 1500,
    }
}

pub const fn special_name(special: Special) -> &'static str {
    match special {
        Special::None => "None",
        Special::InitialShield => "Initial Shields",
        Special::Shield => "Shields",
        Special::RapidFire => "Rapid Fire",
        Special::Burst => "Burst",
    }
}

// ── Enemies ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub lives: u32,
    pub color_start: Rgb,
    pub color_end: Rgb,
    pub speed: (f64, f64),
    pub points: u32,
}

pub const SQUARE_RADIUS: f64 = 34.0;
pub const SQUARE_BREAKDOWN: [Breakdown; 2] = [
    Breakdown { radius: 23.0, count: 2 },
    Breakdown { radius: 14.0, count: 4 },
];
/// Upper bound of a square's cosmetic spin per tick.
pub const SQUARE_SPIN_MAX: f64 = PI / 30.0;
pub const CIRCLE_RADIUS: (u32, u32) = (10, 30);
pub const TRIANGLE_RADIUS: f64 = 28.0;
pub const PENTAGRAM_OUTER: f64 = 30.0;
pub const PENTAGRAM_INNER: f64 = 12.0;
pub const PENTAGRAM_SPIN_MAX: f64 = PI / 90.0;
pub const SHOOTER_RELOAD_MS: u64 = 500;
/// One in this many ticks a ready shooter fires.
pub const SHOOTER_ODDS: u32 = 75;

pub const fn profile(kind: EnemyKind) -> EnemyProfile {
    match kind {
        EnemyKind::Square => EnemyProfile {
            lives: 1,
            color_start: Rgb(0x22, 0x22, 0xFF),
            color_end: Rgb(0x22, 0x22, 0xFF),
            speed: (1.0, 4.0),
            points: 50,
        },
        EnemyKind::HardenedSquare => EnemyProfile {
            lives: 3,
            color_start: Rgb(0x00, 0x99, 0xFF),
            color_end: Rgb(0xCC, 0xFF, 0xFF),
            speed: (1.0, 4.0),
            points: 100,
        },
        EnemyKind::Circle => EnemyProfile {
            lives: 3,
            color_start: Rgb(0xFF, 0x66, 0x99),
            color_end: Rgb(0x99, 0x66, 0x99),
            speed: (2.0, 4.5),
            points: 75,
        },
        EnemyKind::HardenedCircle => EnemyProfile {
            lives: 6,
            color_start: Rgb(0x99, 0x00, 0x99),
            color_end: Rgb(0x99, 0x00, 0x00),
            speed: (2.0, 4.5),
            points: 150,
        },
        EnemyKind::Triangle => EnemyProfile {
            lives: 3,
            color_start: Rgb(0x99, 0xFF, 0x33),
            color_end: Rgb(0x99, 0x99, 0x33),
            speed: (1.4, 2.0),
            points: 100,
        },
        EnemyKind::ShootingTriangle => EnemyProfile {
            lives: 5,
            color_start: Rgb(0xCC, 0x66, 0x33),
            color_end: Rgb(0x66, 0x00, 0x33),
            speed: (1.6, 1.8),
            points: 200,
        },
        EnemyKind::Pentagram => EnemyProfile {
            lives: 10,
            color_start: Rgb(0xFF, 0x00, 0x33),
            color_end: Rgb(0xFF, 0xCC, 0x33),
            speed: (1.0, 4.0),
            points: 500,
        },
    }
}

/// Steering of the triangle family: `(aim tolerance, turn per tick)`.
pub const fn steering(kind: EnemyKind) -> Option<(f64, f64)> {
    match kind {
        EnemyKind::Triangle => Some((PI / 6.0, PI / 150.0)),
        EnemyKind::ShootingTriangle => Some((PI / 16.0, PI / 175.0)),
        _ => None,
    }
}
