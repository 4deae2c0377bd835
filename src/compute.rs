/// Game-logic functions for one play session.
///
/// `tick` is the per-frame entry point: it takes the current `GameState`,
/// the frame's input and the session clock, and returns the next state. All
/// randomness comes through the injected RNG, so a seeded RNG replays a
/// session exactly. The smaller helpers (`spawn_ship`, `fire`,
/// `activate_special`, ...) mutate a state in place and are what `tick`
/// is built from.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::behavior::{self, advance, behavior, muzzles, new_enemy, Movement};
use crate::collision::collides;
use crate::entities::{
    DrawCommand, EnemyKind, Entity, EntityId, EntityKind, GameState, GameStatus, InputEvent,
    InputSnapshot, PowerupKind, Settings, ShieldStyle, ShotOwner, Special, Star, TimerEvent,
};
use crate::geometry::{self, heading_towards, wrap_angle, Point, Rgb, TAU};
use crate::sound::SoundCue;
use crate::timers::TimerQueue;
use crate::tuning::{
    self, exhaust, powerup, ship, shield, shot, shrapnel, DEATH_DELAY_MS, KILLS_PER_STAGE,
    STARTING_LIVES,
};

use std::f64::consts::PI;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: empty field, starfield, and a ship under its
/// initial shield.
pub fn init_state(settings: Settings, now_ms: u64, rng: &mut impl Rng) -> GameState {
    let rng: &mut dyn RngCore = rng;
    let width = tuning::WORLD_WIDTH;
    let play_height = tuning::WORLD_HEIGHT - tuning::PANEL_HEIGHT;
    let mut state = GameState {
        ship: None,
        shield: None,
        enemies: Vec::new(),
        powerups: Vec::new(),
        shots: Vec::new(),
        particles: Vec::new(),
        timers: TimerQueue::new(),
        special: Special::None,
        cargo_bay: None,
        score: 0,
        lives: STARTING_LIVES,
        stage: 1,
        kills: 0,
        deaths: 0,
        sounds: Vec::new(),
        stars: starfield(width, play_height, rng),
        settings,
        status: GameStatus::Playing,
        frame: 0,
        now_ms,
        width,
        play_height,
        next_id: 1,
    };
    spawn_ship(&mut state, rng);
    info!("new session started (debug={}, effects={})", settings.debug, settings.effects);
    state
}

/// One star in ten is tinted.
fn starfield(width: f64, height: f64, rng: &mut dyn RngCore) -> Vec<Star> {
    const TINTS: [Rgb; 3] = [Rgb(0xFF, 0, 0), Rgb(0, 0, 0xFF), Rgb(0, 0xFF, 0)];
    (0..tuning::STAR_COUNT)
        .map(|i| Star {
            x: f64::from(rng.gen_range(0..width as u32)),
            y: f64::from(rng.gen_range(0..height as u32)),
            color: if i % 10 == 0 {
                TINTS.choose(rng).copied().unwrap_or(Rgb::WHITE)
            } else {
                Rgb::WHITE
            },
        })
        .collect()
}

fn alloc_id(state: &mut GameState) -> EntityId {
    let id = state.next_id;
    state.next_id += 1;
    id
}

fn with_id(state: &mut GameState, mut entity: Entity) -> Entity {
    entity.id = alloc_id(state);
    entity
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Place a new ship in the middle of the play area, replacing any old one
/// without an explosion, and grant the initial shield.
pub fn spawn_ship(state: &mut GameState, rng: &mut dyn RngCore) {
    let ship = Entity {
        id: alloc_id(state),
        kind: EntityKind::Ship { last_shot_ms: None },
        x: state.width / 2.0,
        y: state.play_height / 2.0,
        r: rng.gen_range(0.0..TAU),
        vel: 0.0,
        radius: ship::RADIUS,
        color: ship::COLOR,
        alive: true,
    };
    debug!("ship {} spawned at ({}, {})", ship.id, ship.x, ship.y);
    state.ship = Some(ship);
    state.shield = None;
    state.special = Special::None;
    activate_special(state, Some(Special::InitialShield));
}

pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, x: f64, y: f64, rng: &mut dyn RngCore) {
    let (radius, breakdown) = match kind {
        EnemyKind::Square | EnemyKind::HardenedSquare => {
            (tuning::SQUARE_RADIUS, tuning::SQUARE_BREAKDOWN.to_vec())
        }
        EnemyKind::Circle | EnemyKind::HardenedCircle => {
            let (lo, hi) = tuning::CIRCLE_RADIUS;
            (f64::from(rng.gen_range(lo..=hi)), Vec::new())
        }
        EnemyKind::Triangle | EnemyKind::ShootingTriangle => (tuning::TRIANGLE_RADIUS, Vec::new()),
        EnemyKind::Pentagram => (tuning::PENTAGRAM_OUTER, Vec::new()),
    };
    let enemy = new_enemy(kind, x, y, radius, breakdown, rng);
    let enemy = with_id(state, enemy);
    debug!("{:?} {} spawned at ({:.0}, {:.0})", kind, enemy.id, x, y);
    state.enemies.push(enemy);
}

/// Drop a powerup of a random coded kind; it explodes by itself after a
/// random lifetime.
pub fn spawn_powerup(state: &mut GameState, x: f64, y: f64, rng: &mut dyn RngCore) {
    let kinds: Vec<PowerupKind> = powerup::ALL
        .into_iter()
        .filter(|k| powerup::code(*k).is_some())
        .collect();
    let Some(kind) = kinds.choose(rng).copied() else {
        return;
    };
    let id = alloc_id(state);
    let life = rng.gen_range(powerup::LIFE_MS.0..powerup::LIFE_MS.1) as u64;
    state
        .timers
        .schedule(state.now_ms, life, TimerEvent::ExpirePowerup(id));
    state.powerups.push(Entity {
        id,
        kind: EntityKind::Powerup { kind },
        x,
        y,
        r: 0.0,
        vel: 0.0,
        radius: powerup::RADIUS,
        color: powerup::COLOR,
        alive: true,
    });
    debug!("{:?} powerup {} spawned", kind, id);
}

fn random_play_position(state: &GameState, inset: f64, rng: &mut dyn RngCore) -> (f64, f64) {
    let x = rng.gen_range(inset..=(state.width - 1.0 - inset));
    let y = rng.gen_range(inset..=(state.play_height - 1.0 - inset));
    (x.floor(), y.floor())
}

fn spawn_shot(
    state: &mut GameState,
    at: Point,
    r: f64,
    speed: f64,
    owner: ShotOwner,
) {
    let entity = Entity {
        id: alloc_id(state),
        kind: EntityKind::Shot { owner },
        x: at.x,
        y: at.y,
        r,
        vel: speed,
        radius: shot::RADIUS,
        color: behavior::shot_color(owner),
        alive: true,
    };
    match owner {
        ShotOwner::Player => state.shots.push(entity),
        // Hostile shots count as enemies: they can be shot down.
        ShotOwner::Hostile => state.enemies.push(entity),
    }
}

fn spawn_exhaust(
    state: &mut GameState,
    at: Point,
    r: f64,
    color: Rgb,
    lifespan: u32,
    rng: &mut dyn RngCore,
) {
    let r = r + rng.gen_range(-exhaust::SPREAD..exhaust::SPREAD);
    let entity = Entity {
        id: alloc_id(state),
        kind: EntityKind::Exhaust { age: 0, lifespan },
        x: at.x,
        y: at.y,
        r,
        vel: exhaust::SPEED,
        radius: exhaust::LENGTH,
        color,
        alive: true,
    };
    state.particles.push(entity);
}

/// Scatter shrapnel from `entity`. Only the ship explodes when effects are
/// off.
fn explode(state: &mut GameState, entity: &Entity, rng: &mut dyn RngCore) {
    let is_ship = matches!(entity.kind, EntityKind::Ship { .. });
    if !state.settings.effects && !is_ship {
        return;
    }
    let ((lo, hi), radius) = match entity.kind {
        EntityKind::Ship { .. } => (ship::SHRAPNEL, ship::SHRAPNEL_RADIUS),
        EntityKind::Powerup { .. } => (powerup::SHRAPNEL, powerup::SHRAPNEL_RADIUS),
        _ => (shrapnel::DEFAULT_COUNT, shrapnel::DEFAULT_RADIUS),
    };
    for _ in 0..rng.gen_range(lo..=hi) {
        let speed = rng.gen_range(shrapnel::SPEED.0..=shrapnel::SPEED.1);
        let piece = Entity {
            id: alloc_id(state),
            kind: EntityKind::Shrapnel,
            x: entity.x,
            y: entity.y,
            r: rng.gen_range(0.0..TAU),
            vel: f64::from(speed),
            radius,
            color: entity.color,
            alive: true,
        };
        state.particles.push(piece);
    }
}

// ── Ship controls ────────────────────────────────────────────────────────────

fn ship_mut(state: &mut GameState) -> Option<&mut Entity> {
    state.ship.as_mut().filter(|s| s.alive)
}

pub fn thrust_forward(state: &mut GameState, rng: &mut dyn RngCore) {
    let Some(ship) = ship_mut(state) else {
        return;
    };
    ship.vel = (ship.vel + ship::ACCEL).min(ship::MAX_SPEED);
    let exhaust_r = wrap_angle(ship.r + PI);
    emit_ship_exhaust(state, exhaust_r, rng);
}

pub fn thrust_reverse(state: &mut GameState, rng: &mut dyn RngCore) {
    let Some(ship) = ship_mut(state) else {
        return;
    };
    ship.vel = (ship.vel - ship::ACCEL).max(-ship::MAX_SPEED);
    let exhaust_r = ship.r;
    emit_ship_exhaust(state, exhaust_r, rng);
}

/// Coast toward a standstill without overshooting zero.
pub fn decelerate(state: &mut GameState) {
    if let Some(ship) = ship_mut(state) {
        if ship.vel > 0.0 {
            ship.vel = (ship.vel - ship::DECEL).max(0.0);
        } else if ship.vel < 0.0 {
            ship.vel = (ship.vel + ship::DECEL).min(0.0);
        }
    }
}

fn emit_ship_exhaust(state: &mut GameState, r: f64, rng: &mut dyn RngCore) {
    if !state.settings.effects {
        return;
    }
    let Some(ship) = state.ship.as_ref() else {
        return;
    };
    let origin = ship.position();
    let tips = geometry::ship_wing_tips(ship.r);
    for tip in tips {
        let at = origin.translate(tip.x, tip.y);
        spawn_exhaust(state, at, r, ship::EXHAUST_COLOR, ship::EXHAUST_LIFESPAN, rng);
    }
}

pub fn turn_left(state: &mut GameState) {
    if let Some(ship) = ship_mut(state) {
        ship.r = wrap_angle(ship.r + ship::TURN);
    }
}

pub fn turn_right(state: &mut GameState) {
    if let Some(ship) = ship_mut(state) {
        ship.r = wrap_angle(ship.r - ship::TURN);
    }
}

/// Fire from the ship's nose if the rate limit allows. Normal fire needs
/// both the shot delay to have passed and a free shot slot; rapid fire only
/// needs its shorter delay.
pub fn fire(state: &mut GameState, rapid: bool) -> bool {
    let now = state.now_ms;
    let in_flight = state.shots.iter().filter(|s| s.alive).count();
    let Some(ship) = ship_mut(state) else {
        return false;
    };
    let EntityKind::Ship { last_shot_ms } = &mut ship.kind else {
        return false;
    };
    let since = last_shot_ms.map(|last| now.saturating_sub(last));
    let ready = if rapid {
        since.map_or(true, |t| t > ship::RAPID_DELAY_MS)
    } else {
        in_flight < ship::SHOT_MAX && since.map_or(true, |t| t > ship::SHOT_DELAY_MS)
    };
    if !ready {
        return false;
    }
    *last_shot_ms = Some(now);
    let nose = Point::along(ship.r, geometry::SHIP_NOSE);
    let at = ship.position().translate(nose.x, nose.y);
    let r = ship.r;
    spawn_shot(state, at, r, shot::SPEED, ShotOwner::Player);
    state.sounds.push(SoundCue::Laser);
    true
}

/// A ring of random shots around the ship, once per tick while bursting.
fn burst(state: &mut GameState, rng: &mut dyn RngCore) {
    let Some(origin) = state.ship.as_ref().map(Entity::position) else {
        return;
    };
    let (lo, hi) = shot::BURST_PER_TICK;
    for _ in 0..rng.gen_range(lo..=hi) {
        let r = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(shot::BURST_SPEED.0..=shot::BURST_SPEED.1);
        spawn_shot(state, origin, r, f64::from(speed), ShotOwner::Player);
    }
}

// ── Special powers ───────────────────────────────────────────────────────────

const fn special_for(kind: PowerupKind) -> Option<Special> {
    match kind {
        PowerupKind::Shield => Some(Special::Shield),
        PowerupKind::RapidFire => Some(Special::RapidFire),
        PowerupKind::Burst => Some(Special::Burst),
        PowerupKind::OneUp => None,
    }
}

/// Start a special power. With `None`, the cargo bay's item is used and the
/// bay is emptied. Only one special may be active: while one is, this does
/// nothing and returns false.
pub fn activate_special(state: &mut GameState, item: Option<Special>) -> bool {
    if state.special != Special::None {
        return false;
    }
    let item = match item {
        Some(item) => item,
        None => match state.cargo_bay.take().and_then(special_for) {
            Some(item) => item,
            None => return false,
        },
    };
    if item == Special::None {
        return false;
    }

    state.special = item;
    let delay = tuning::special_delay_ms(item);
    match item {
        Special::InitialShield | Special::Shield => {
            let (style, color) = if item == Special::InitialShield {
                (ShieldStyle::Initial, ship::COLOR)
            } else {
                (ShieldStyle::Full, shot::PLAYER_COLOR)
            };
            let (x, y) = state
                .ship
                .as_ref()
                .map_or((state.width / 2.0, state.play_height / 2.0), |s| (s.x, s.y));
            let entity = Entity {
                id: alloc_id(state),
                kind: EntityKind::Shield { style, fade: 0 },
                x,
                y,
                r: 0.0,
                vel: 0.0,
                radius: shield::RADIUS,
                color,
                alive: true,
            };
            state.shield = Some(entity);
            state
                .timers
                .schedule(state.now_ms, delay, TimerEvent::FadeShield);
        }
        _ => {
            state
                .timers
                .schedule(state.now_ms, delay, TimerEvent::ClearSpecial);
        }
    }
    debug!("special {} active", tuning::special_name(item));
    true
}

pub fn clear_special(state: &mut GameState) {
    if state.special != Special::None {
        debug!("special {} over", tuning::special_name(state.special));
    }
    state.special = Special::None;
}

// ── Timers ───────────────────────────────────────────────────────────────────

fn apply_timer_event(state: &mut GameState, event: TimerEvent, rng: &mut dyn RngCore) {
    match event {
        TimerEvent::SpawnShip => spawn_ship(state, rng),
        TimerEvent::ClearSpecial => clear_special(state),
        TimerEvent::FadeShield => {
            if let Some(EntityKind::Shield { fade, .. }) = state.shield.as_mut().map(|s| &mut s.kind) {
                if *fade == 0 {
                    *fade = 1;
                }
            }
        }
        TimerEvent::MarkNotBusy(id) => {
            if let Some(EntityKind::Enemy(enemy)) = state
                .enemies
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| &mut e.kind)
            {
                enemy.busy = false;
            }
        }
        TimerEvent::ExpirePowerup(id) => {
            if let Some(i) = state.powerups.iter().position(|p| p.id == id && p.alive) {
                let gone = state.powerups.remove(i);
                explode(state, &gone, rng);
            }
        }
        TimerEvent::EndGame => {
            info!("game over with {} points", state.score);
            state.status = GameStatus::GameOver;
        }
    }
}

/// Fire every pending timer immediately, including any scheduled by the
/// events being fired, until the queue is empty.
pub fn force_timers(state: &mut GameState, rng: &mut dyn RngCore) {
    while !state.timers.is_empty() {
        for event in state.timers.flush_all() {
            apply_timer_event(state, event, rng);
        }
    }
}

fn check_timers(state: &mut GameState, rng: &mut dyn RngCore) {
    for event in state.timers.dispatch_due(state.now_ms) {
        apply_timer_event(state, event, rng);
    }
}

// ── Damage ───────────────────────────────────────────────────────────────────

/// Land one hit on `state.enemies[index]`, travelling along `heading`.
/// Returns true when the hit destroyed it.
fn hit_enemy(
    state: &mut GameState,
    index: usize,
    heading: f64,
    rng: &mut dyn RngCore,
) -> bool {
    let ship_at = state.ship.as_ref().map(Entity::position);
    let Some(target) = state.enemies.get_mut(index) else {
        return false;
    };
    if !target.alive {
        return false;
    }
    let position = target.position();
    let destroyed = match &mut target.kind {
        EntityKind::Enemy(enemy) => {
            match enemy.kind {
                EnemyKind::Circle | EnemyKind::Pentagram => target.r = heading,
                EnemyKind::HardenedCircle => target.r = wrap_angle(heading + PI),
                EnemyKind::Triangle | EnemyKind::ShootingTriangle => {
                    if let (Some(ship_at), Some((_, turn))) = (ship_at, tuning::steering(enemy.kind)) {
                        // Knocked back, away from the ship.
                        let jitter = rng.gen_range(-turn..turn);
                        target.r = wrap_angle(heading_towards(ship_at, position) + jitter);
                    }
                }
                EnemyKind::Square | EnemyKind::HardenedSquare => {}
            }
            enemy.lives = enemy.lives.saturating_sub(1);
            if enemy.lives > 0 {
                let profile = tuning::profile(enemy.kind);
                target.color = Rgb::lerp_steps(
                    profile.color_start,
                    profile.color_end,
                    profile.lives - 1,
                    profile.lives - enemy.lives,
                );
            }
            enemy.lives == 0
        }
        // Hostile shots go down in one hit.
        _ => true,
    };

    let snapshot = target.clone();
    if destroyed {
        target.alive = false;
        destroy_enemy(state, &snapshot, rng);
    } else {
        explode(state, &snapshot, rng);
    }
    destroyed
}

/// Explosion, fracture children, score.
fn destroy_enemy(state: &mut GameState, enemy: &Entity, rng: &mut dyn RngCore) {
    let points = match enemy.enemy() {
        Some(e) => tuning::profile(e.kind).points,
        None => shot::HOSTILE_POINTS,
    };
    if enemy.enemy().is_some() {
        explode(state, enemy, rng);
    }
    let children = (behavior(&enemy.kind).on_death)(enemy, rng);
    for child in children {
        let child = with_id(state, child);
        state.enemies.push(child);
    }
    state.score += points;
    state.kills += 1;
    state.stage = 1 + state.kills / KILLS_PER_STAGE;
    state.sounds.push(SoundCue::Explode);
}

fn kill_ship(state: &mut GameState, rng: &mut dyn RngCore) {
    let Some(mut dead) = state.ship.take() else {
        return;
    };
    dead.alive = false;
    explode(state, &dead, rng);
    state.sounds.push(SoundCue::Explode);
    state.deaths += 1;
    state.lives = state.lives.saturating_sub(1);
    force_timers(state, rng);
    info!("ship lost, {} lives left", state.lives);
    if state.lives == 0 {
        state
            .timers
            .schedule(state.now_ms, DEATH_DELAY_MS, TimerEvent::EndGame);
    } else if !state.settings.debug {
        state
            .timers
            .schedule(state.now_ms, DEATH_DELAY_MS, TimerEvent::SpawnShip);
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame at session time `now_ms`.
pub fn tick(
    state: &GameState,
    input: &InputSnapshot,
    events: &[InputEvent],
    now_ms: u64,
    rng: &mut impl Rng,
) -> GameState {
    let rng: &mut dyn RngCore = rng;
    let mut next = state.clone();
    next.now_ms = now_ms;
    next.sounds.clear();

    // ── 1. One-shot events ──────────────────────────────────────────────────
    for event in events {
        handle_event(&mut next, *event, rng);
        if next.status == GameStatus::Quit {
            return next;
        }
    }
    if input.special && next.ship.is_some() {
        activate_special(&mut next, None);
    }

    // ── 2. Timers, then movement ────────────────────────────────────────────
    check_timers(&mut next, rng);
    update_entities(&mut next, rng);

    // ── 3. Controls ─────────────────────────────────────────────────────────
    if next.ship.is_some() {
        if input.forward {
            thrust_forward(&mut next, rng);
        }
        if input.reverse {
            thrust_reverse(&mut next, rng);
        }
        if !input.forward && !input.reverse {
            decelerate(&mut next);
        }
        if input.left {
            turn_left(&mut next);
        }
        if input.right {
            turn_right(&mut next);
        }
        if input.fire {
            fire(&mut next, false);
        }
        if next.special == Special::RapidFire {
            fire(&mut next, true);
        }
        if next.special == Special::Burst {
            burst(&mut next, rng);
        }
    }

    // ── 4. Collisions, then spawning ────────────────────────────────────────
    resolve_collisions(&mut next, rng);
    if !next.settings.debug {
        spawn_policy(&mut next, rng);
    }

    next.frame += 1;
    next
}

fn handle_event(state: &mut GameState, event: InputEvent, rng: &mut dyn RngCore) {
    match event {
        InputEvent::Quit => state.status = GameStatus::Quit,
        InputEvent::Abandon => {
            if let Some(dead) = state.ship.take() {
                explode(state, &dead, rng);
                state.sounds.push(SoundCue::Explode);
            }
            let pending = state.timers.flush_all();
            debug!("round abandoned, {} timers dropped", pending.len());
            state
                .timers
                .schedule(state.now_ms, DEATH_DELAY_MS, TimerEvent::EndGame);
        }
        InputEvent::SpawnEnemy(kind) if state.settings.debug => {
            let (x, y) = random_play_position(state, 0.0, rng);
            spawn_enemy(state, kind, x, y, rng);
        }
        InputEvent::SpawnPowerup if state.settings.debug => {
            let (x, y) = random_play_position(state, powerup::EDGE_INSET, rng);
            spawn_powerup(state, x, y, rng);
        }
        InputEvent::RespawnShip if state.settings.debug => {
            for handle in state.timers.find(|e| *e == TimerEvent::SpawnShip) {
                state.timers.cancel(handle);
            }
            spawn_ship(state, rng);
        }
        InputEvent::SpawnEnemy(_) | InputEvent::SpawnPowerup | InputEvent::RespawnShip => {}
    }
}

fn update_entities(state: &mut GameState, rng: &mut dyn RngCore) {
    let (width, height) = (state.width, state.play_height);

    if let Some(ship) = state.ship.as_mut() {
        advance(ship, Movement::WrapInset, width, height);
    }
    update_shield(state);

    // Enemies: spin, steer, shoot, move.
    let ship_at = state.ship.as_ref().map(Entity::position);
    let mut volleys: Vec<(EntityId, Vec<(Point, f64)>)> = Vec::new();
    for enemy in state.enemies.iter_mut() {
        let movement = behavior(&enemy.kind).movement;
        let here = enemy.position();
        if let EntityKind::Enemy(data) = &mut enemy.kind {
            data.spin = wrap_angle(data.spin + data.spin_rate);
            if let (Some(target), Some((tolerance, turn))) = (ship_at, tuning::steering(data.kind)) {
                enemy.r = steer(here, enemy.r, target, tolerance, turn);
            }
            let armed = matches!(data.kind, EnemyKind::ShootingTriangle | EnemyKind::Pentagram);
            if armed
                && ship_at.is_some()
                && !data.busy
                && rng.gen_range(1..=tuning::SHOOTER_ODDS) == tuning::SHOOTER_ODDS
            {
                data.busy = true;
                let origin = enemy.position();
                let shots = muzzles(enemy)
                    .into_iter()
                    .map(|(p, r)| (origin.translate(p.x, p.y), r))
                    .collect();
                volleys.push((enemy.id, shots));
            }
        }
        enemy.alive = advance(enemy, movement, width, height) && enemy.alive;
    }
    for (id, shots) in volleys {
        for (at, r) in shots {
            spawn_shot(state, at, r, shot::HOSTILE_SPEED, ShotOwner::Hostile);
        }
        state
            .timers
            .schedule(state.now_ms, tuning::SHOOTER_RELOAD_MS, TimerEvent::MarkNotBusy(id));
    }

    for s in state.shots.iter_mut() {
        s.alive = advance(s, Movement::Bounded, width, height) && s.alive;
    }
    for p in state.particles.iter_mut() {
        let inside = advance(p, Movement::Bounded, width, height);
        if let EntityKind::Exhaust { age, lifespan } = &mut p.kind {
            *age += 1;
            if *age > *lifespan {
                p.alive = false;
            }
        }
        p.alive = inside && p.alive;
    }

    // Powerups hover, trailing exhaust in a random direction.
    if state.settings.effects {
        let hovering: Vec<(Point, Rgb)> = state
            .powerups
            .iter()
            .map(|p| (p.position(), p.color))
            .collect();
        for (centre, color) in hovering {
            let r = rng.gen_range(0.0..TAU);
            let offset = Point::along(r, -(powerup::RADIUS + powerup::EXHAUST_OFFSET));
            let at = centre.translate(offset.x, offset.y);
            spawn_exhaust(state, at, wrap_angle(r + PI), color, powerup::EXHAUST_LIFESPAN, rng);
        }
    }

    state.enemies.retain(|e| e.alive);
    state.shots.retain(|s| s.alive);
    state.particles.retain(|p| p.alive);
}

/// Turn toward `target` by `turn` unless already aimed within `tolerance`.
pub fn steer(from: Point, r: f64, target: Point, tolerance: f64, turn: f64) -> f64 {
    // Offset between the heading and the bearing *away* from the target:
    // exactly PI when aimed dead on.
    let offset = wrap_angle(heading_towards(from, target) - PI - r);
    if (PI - tolerance) < offset && offset < (PI + tolerance) {
        return r;
    }
    if offset <= PI {
        wrap_angle(r - turn)
    } else {
        wrap_angle(r + turn)
    }
}

/// Keep the shield on the ship and run its fade-out.
fn update_shield(state: &mut GameState) {
    let Some(ship_at) = state.ship.as_ref().map(Entity::position) else {
        state.shield = None;
        return;
    };
    let mut faded_out = false;
    if let Some(s) = state.shield.as_mut() {
        s.x = ship_at.x;
        s.y = ship_at.y;
        if let EntityKind::Shield { fade, .. } = &mut s.kind {
            if *fade > 0 {
                if shield_alpha(*fade) > 0 {
                    *fade += 1;
                } else {
                    faded_out = true;
                }
            }
        }
    }
    if faded_out {
        state.shield = None;
        clear_special(state);
    }
}

/// Shield opacity after `fade` ticks of fading.
pub fn shield_alpha(fade: u32) -> u8 {
    let full = f64::from(shield::ALPHA);
    let lost = (full / f64::from(shield::FADE_TICKS) * f64::from(fade)) as i64;
    (i64::from(shield::ALPHA) - lost).clamp(0, 255) as u8
}

// ── Collisions ───────────────────────────────────────────────────────────────

fn resolve_collisions(state: &mut GameState, rng: &mut dyn RngCore) {
    // Shots -> enemies: one enemy per shot, one shot per enemy per tick.
    let mut hit_this_tick: Vec<EntityId> = Vec::new();
    for si in 0..state.shots.len() {
        let shot = state.shots[si].clone();
        if !shot.alive {
            continue;
        }
        let target = state.enemies.iter().position(|e| {
            e.alive && !hit_this_tick.contains(&e.id) && collides(&shot, e)
        });
        if let Some(ei) = target {
            hit_this_tick.push(state.enemies[ei].id);
            hit_enemy(state, ei, shot.r, rng);
            state.shots[si].alive = false;
        }
    }

    // Ship -> enemies, unless shielded.
    let shielded = matches!(state.special, Special::InitialShield | Special::Shield);
    if let Some(ship) = state.ship.clone().filter(|_| !shielded) {
        let crash = state
            .enemies
            .iter()
            .position(|e| e.alive && collides(&ship, e));
        if let Some(ei) = crash {
            let wreck = state.enemies[ei].clone();
            state.enemies[ei].alive = false;
            destroy_enemy(state, &wreck, rng);
            kill_ship(state, rng);
        }
    }

    // Full shield -> enemies.
    if state.special == Special::Shield {
        if let (Some(ship), Some(shield)) = (state.ship.clone(), state.shield.clone()) {
            for ei in 0..state.enemies.len() {
                let enemy = &state.enemies[ei];
                if enemy.alive && collides(&shield, enemy) {
                    hit_enemy(state, ei, ship.r, rng);
                }
            }
        }
    }

    // Ship -> powerups.
    if let Some(ship) = state.ship.clone() {
        for p in state.powerups.iter_mut() {
            if p.alive && collides(&ship, p) {
                p.alive = false;
                if let EntityKind::Powerup { kind } = p.kind {
                    if kind == PowerupKind::OneUp {
                        state.lives += 1;
                    } else {
                        state.cargo_bay = Some(kind);
                    }
                    debug!("collected {:?}", kind);
                }
            }
        }
    }

    state.enemies.retain(|e| e.alive);
    state.shots.retain(|s| s.alive);
    state.powerups.retain(|p| p.alive);
}

// ── Spawn policy ─────────────────────────────────────────────────────────────

const ENEMY_SPAWN_ODDS: u32 = 350;
const POWERUP_SPAWN_ODDS: u32 = 1500;
const CROWD_LIMIT: usize = 3;

fn spawn_policy(state: &mut GameState, rng: &mut dyn RngCore) {
    let crowd = state.enemies.len();
    if crowd == 0 || (crowd < CROWD_LIMIT && rng.gen_range(0..=ENEMY_SPAWN_ODDS) == 0) {
        if let Some(kind) = EnemyKind::ALL.choose(rng).copied() {
            let (x, y) = random_play_position(state, 0.0, rng);
            spawn_enemy(state, kind, x, y, rng);
        }
    }
    if state.powerups.is_empty() && rng.gen_range(0..=POWERUP_SPAWN_ODDS) == 0 {
        let (x, y) = random_play_position(state, powerup::EDGE_INSET, rng);
        spawn_powerup(state, x, y, rng);
    }
}

// ── Rendering export ─────────────────────────────────────────────────────────

fn command_for(entity: &Entity, alpha: u8) -> DrawCommand {
    let (shape, outline) = (behavior(&entity.kind).shape)(entity);
    let label = match entity.kind {
        EntityKind::Powerup { kind } => powerup::code(kind),
        _ => None,
    };
    DrawCommand {
        shape,
        color: entity.color,
        outline,
        x: entity.x,
        y: entity.y,
        alpha,
        label,
    }
}

/// Everything to draw this frame, back to front.
pub fn draw_commands(state: &GameState) -> Vec<DrawCommand> {
    let mut out: Vec<DrawCommand> = state
        .particles
        .iter()
        .chain(state.powerups.iter())
        .chain(state.enemies.iter())
        .chain(state.shots.iter())
        .chain(state.ship.iter())
        .map(|e| command_for(e, shield::ALPHA))
        .collect();
    if let Some(s) = state.shield.as_ref() {
        let alpha = match s.kind {
            EntityKind::Shield { fade, .. } => shield_alpha(fade),
            _ => shield::ALPHA,
        };
        out.push(command_for(s, alpha));
    }
    out
}
