/// All game entity types. Pure data, no logic.

use crate::geometry::{Point, Rgb};
use crate::sound::SoundCue;
use crate::timers::TimerQueue;

pub type EntityId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Triangle,
    Square,
    Circle,
    ShootingTriangle,
    HardenedSquare,
    HardenedCircle,
    Pentagram,
}

impl EnemyKind {
    /// Spawn order, also the order of the debug spawn keys 1..=7.
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Triangle,
        EnemyKind::Square,
        EnemyKind::Circle,
        EnemyKind::ShootingTriangle,
        EnemyKind::HardenedSquare,
        EnemyKind::HardenedCircle,
        EnemyKind::Pentagram,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Shield,
    RapidFire,
    Burst,
    OneUp,
}

/// The mutually exclusive timed power currently in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Special {
    #[default]
    None,
    InitialShield,
    Shield,
    RapidFire,
    Burst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOwner {
    Player,
    Hostile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldStyle {
    Initial,
    Full,
}

/// One step of a fracture: `count` children of `radius` each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakdown {
    pub radius: f64,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub lives: u32,
    /// Remaining fracture steps; empty for enemies that do not break up.
    pub breakdown: Vec<Breakdown>,
    /// Cosmetic rotation of squares and pentagrams.
    pub spin: f64,
    pub spin_rate: f64,
    /// Set while a shooting enemy waits out its reload timer.
    pub busy: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Ship { last_shot_ms: Option<u64> },
    /// `fade` counts ticks since the fade-out began; 0 while fully shown.
    Shield { style: ShieldStyle, fade: u32 },
    Shot { owner: ShotOwner },
    Shrapnel,
    Exhaust { age: u32, lifespan: u32 },
    Powerup { kind: PowerupKind },
    Enemy(Enemy),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    /// Heading in radians.
    pub r: f64,
    /// Scalar speed along the heading; negative moves backwards.
    pub vel: f64,
    /// Half the side of the square the silhouette is drawn in.
    pub radius: f64,
    pub color: Rgb,
    pub alive: bool,
}

impl Entity {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }
}

// ── Timers ──────────────────────────────────────────────────────────────────

/// Deferred actions the frame loop schedules on its timer queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnShip,
    ClearSpecial,
    FadeShield,
    MarkNotBusy(EntityId),
    ExpirePowerup(EntityId),
    EndGame,
}

// ── Input ───────────────────────────────────────────────────────────────────

/// Held intents, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub special: bool,
}

/// Discrete one-shot events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    /// Blow up the ship and end the round.
    Abandon,
    SpawnEnemy(EnemyKind),
    SpawnPowerup,
    RespawnShip,
}

// ── Rendering ───────────────────────────────────────────────────────────────

/// Silhouette descriptor in entity-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(Vec<Point>),
    Circle { radius: f64 },
    Ring { radius: f64, width: f64 },
    Line { from: Point, to: Point },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub color: Rgb,
    /// 0 fills the shape, anything else strokes it this wide.
    pub outline: u32,
    pub x: f64,
    pub y: f64,
    pub alpha: u8,
    /// Glyph stamped over the centre (powerup codes).
    pub label: Option<char>,
}

// ── Master game state ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// No automatic spawning or respawning; debug spawn events are honoured.
    pub debug: bool,
    /// Shrapnel and exhaust particles.
    pub effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            effects: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
}

/// The entire game state for one play session. Cloneable so the per-frame
/// update can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ship: Option<Entity>,
    pub shield: Option<Entity>,
    /// Enemies and hostile shots.
    pub enemies: Vec<Entity>,
    pub powerups: Vec<Entity>,
    /// Player shots.
    pub shots: Vec<Entity>,
    /// Shrapnel and exhaust.
    pub particles: Vec<Entity>,
    pub timers: TimerQueue<TimerEvent>,
    pub special: Special,
    pub cargo_bay: Option<PowerupKind>,
    pub score: u32,
    pub lives: u32,
    pub stage: u32,
    pub kills: u32,
    pub deaths: u32,
    /// Cues raised during the last tick.
    pub sounds: Vec<SoundCue>,
    pub stars: Vec<Star>,
    pub settings: Settings,
    pub status: GameStatus,
    pub frame: u64,
    pub now_ms: u64,
    pub width: f64,
    pub play_height: f64,
    pub next_id: EntityId,
}
