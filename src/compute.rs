//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG and log events.

use rand::Rng;
use tracing::{debug, info};

use crate::collision::collides;
use crate::config::GameConfig;
use crate::entities::{
    ActiveEffects, BossPhase, Bounds, Bullet, Enemy, EnemyKind, GameState, GameStatus, Input,
    Motion, Particle, Player, PowerUp, PowerUpKind, Ship, FRAME_MS, MOVE_PATTERNS,
    PARTICLE_LIFE, POWER_UP_KINDS, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::levels::{level_config_clamped, FINAL_LEVEL, LEVEL_TRANSITION_MS};
use crate::movement::{
    advance_bullet, advance_enemy_bullet, advance_power_up, aimed_shot, bullet_in_bounds,
    enemy_bullet_in_bounds, enemy_in_bounds, power_up_in_bounds, step_boss, step_pattern,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

const PLAYER_START: (f32, f32) = (482.0, 650.0);
const PLAYER_SIZE: f32 = 60.0;
const PLAYER_SPEED: f32 = 5.0;

const FIRE_RATE_MS: u64 = 250;
const BULLET_WIDTH: f32 = 4.0;
const BULLET_HEIGHT: f32 = 12.0;
const BULLET_SPEED: f32 = 8.0;
/// Angles of the three spread-shot bullets, radians from vertical.
const SPREAD_ANGLES: [f32; 3] = [-0.3, 0.0, 0.3];

const POWER_UP_SIZE: f32 = 30.0;
const POWER_UP_SPEED: f32 = 2.0;
/// Scheduled drops appear above the screen at x in `[0, POWER_UP_DROP_SPAN)`.
const POWER_UP_DROP_SPAN: f32 = WORLD_WIDTH - POWER_UP_SIZE;
/// A kill drops a pickup when a uniform roll exceeds this.
const DROP_THRESHOLD: f32 = 0.85;

const SPREAD_SHOT_MS: u64 = 10_000;
const RAPID_FIRE_MS: u64 = 8_000;
const SHIELD_MS: u64 = 5_000;
/// Post-hit grace period.
const INVULNERABLE_MS: u64 = 1_000;

const KILL_SPARKS: usize = 20;
const BOSS_SPARKS: usize = 50;
const RAM_SPARKS: usize = 30;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a ship, a starting level, and config.
pub fn init_state(ship: Ship, level: u32, config: &GameConfig) -> GameState {
    let level_cfg = level_config_clamped(level);
    GameState {
        player: Player {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            lives: config.starting_lives,
        },
        ship,
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        power_ups: Vec::new(),
        effects: ActiveEffects::default(),
        score: 0,
        level: level_cfg.number,
        enemies_killed: 0,
        enemy_spawn_rate_ms: level_cfg.spawn_rate_ms,
        last_enemy_spawn_ms: 0,
        power_up_interval_ms: config.power_up_interval_ms,
        last_power_up_spawn_ms: 0,
        last_shot_ms: None,
        boss_spawned: false,
        max_lives: config.max_lives,
        clock_ms: 0,
        frame: 0,
        status: GameStatus::Playing,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Move the player by `speed` along every held direction, clamped to the
/// world.
pub fn move_player(state: &GameState, input: &Input) -> GameState {
    let p = &state.player;
    let mut dx = 0.0;
    let mut dy = 0.0;
    if input.left {
        dx -= p.speed;
    }
    if input.right {
        dx += p.speed;
    }
    if input.up {
        dy -= p.speed;
    }
    if input.down {
        dy += p.speed;
    }
    GameState {
        player: Player {
            x: (p.x + dx).clamp(0.0, WORLD_WIDTH - p.width),
            y: (p.y + dy).clamp(0.0, WORLD_HEIGHT - p.height),
            ..p.clone()
        },
        ..state.clone()
    }
}

/// Game time that must pass between shots.
pub fn fire_interval_ms(effects: &ActiveEffects) -> u64 {
    if effects.rapid_fire() {
        FIRE_RATE_MS / 2
    } else {
        FIRE_RATE_MS
    }
}

/// Fire from the ship's nose, gated by the fire rate. Spread shot fires
/// three diverging bullets instead of one.
pub fn player_shoot(state: &GameState) -> GameState {
    if let Some(last) = state.last_shot_ms {
        if state.clock_ms.saturating_sub(last) < fire_interval_ms(&state.effects) {
            return state.clone();
        }
    }

    let x = state.player.x + state.player.width / 2.0 - BULLET_WIDTH / 2.0;
    let y = state.player.y;
    let angles: &[f32] = if state.effects.spread_shot() {
        &SPREAD_ANGLES
    } else {
        &[0.0]
    };

    let mut bullets = state.bullets.clone();
    bullets.extend(angles.iter().map(|&angle| Bullet {
        x,
        y,
        width: BULLET_WIDTH,
        height: BULLET_HEIGHT,
        speed: BULLET_SPEED,
        angle,
    }));

    GameState {
        bullets,
        last_shot_ms: Some(state.clock_ms),
        ..state.clone()
    }
}

/// Esc handler: Playing and Paused swap; any other status is left alone.
pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        ref other => other.clone(),
    };
    GameState {
        status,
        ..state.clone()
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

fn boss() -> Enemy {
    Enemy {
        x: 452.0,
        y: -120.0,
        width: 120.0,
        height: 120.0,
        speed: 0.5,
        kind: EnemyKind::Boss,
        health: 100,
        max_health: 100,
        points: 1000,
        can_shoot: true,
        shoot_timer_ms: 0,
        shoot_interval_ms: 2000,
        motion: Motion::Boss {
            phase: BossPhase::Drift,
            phase_timer_ms: 0,
        },
    }
}

/// Roll a regular enemy for the given difficulty. Higher difficulty widens
/// the odds of fighters and heavies and scales every stat.
fn roll_enemy(rng: &mut impl Rng, difficulty: f32) -> Enemy {
    let r: f32 = rng.gen();
    let d = difficulty;

    let (kind, size, health, speed, points, can_shoot) = if r > 0.95 - d * 0.05 {
        (EnemyKind::Heavy, 80.0 + d * 5.0, 5.0 * d, 1.0 + d * 0.3, 100, true)
    } else if r > 0.7 - d * 0.1 {
        (EnemyKind::Fighter, 55.0 + d * 3.0, 2.0 * d, 2.0 + d * 0.4, 30, true)
    } else {
        (EnemyKind::SmallDrone, 45.0 + d * 2.0, d, 3.0 + d * 0.5, 10, false)
    };
    let health = (health.floor() as u32).max(1);

    let pattern = MOVE_PATTERNS[rng.gen_range(0..MOVE_PATTERNS.len())];
    let x = rng.gen_range(0.0..WORLD_WIDTH - size);
    let shoot_interval_ms = 2000 + rng.gen_range(0..2000);
    let amplitude = 50.0 + rng.gen::<f32>() * 100.0;
    let frequency = 0.02 + rng.gen::<f32>() * 0.03;
    let initial_x = rng.gen_range(0.0..WORLD_WIDTH - size);
    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    Enemy {
        x,
        y: -size,
        width: size,
        height: size,
        speed,
        kind,
        health,
        max_health: health,
        points,
        can_shoot,
        shoot_timer_ms: 0,
        shoot_interval_ms,
        motion: Motion::Pattern {
            pattern,
            move_timer_ms: 0,
            amplitude,
            frequency,
            initial_x,
            direction,
        },
    }
}

/// Spawn the next enemy for the current level. A boss level produces its
/// boss first; after that it keeps sending regular escorts.
pub fn spawn_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    let cfg = level_config_clamped(state.level);
    let mut enemies = state.enemies.clone();
    let mut boss_spawned = state.boss_spawned;

    if cfg.boss_level && !state.boss_spawned {
        info!(level = state.level, "boss incoming");
        enemies.push(boss());
        boss_spawned = true;
    } else {
        enemies.push(roll_enemy(rng, cfg.difficulty));
    }

    GameState {
        enemies,
        boss_spawned,
        ..state.clone()
    }
}

fn roll_power_up(rng: &mut impl Rng, x: f32, y: f32) -> PowerUp {
    PowerUp {
        x,
        y,
        width: POWER_UP_SIZE,
        height: POWER_UP_SIZE,
        speed: POWER_UP_SPEED,
        kind: POWER_UP_KINDS[rng.gen_range(0..POWER_UP_KINDS.len())],
    }
}

/// Drop a random pickup with its top-left corner at `(x, y)`.
pub fn spawn_power_up(state: &GameState, rng: &mut impl Rng, x: f32, y: f32) -> GameState {
    let mut power_ups = state.power_ups.clone();
    power_ups.push(roll_power_up(rng, x, y));
    GameState {
        power_ups,
        ..state.clone()
    }
}

fn explode(particles: &mut Vec<Particle>, rng: &mut impl Rng, cx: f32, cy: f32, count: usize) {
    particles.extend((0..count).map(|_| Particle {
        x: cx,
        y: cy,
        vx: (rng.gen::<f32>() - 0.5) * 8.0,
        vy: (rng.gen::<f32>() - 0.5) * 8.0,
        life: PARTICLE_LIFE,
        hue: 10.0 + rng.gen::<f32>() * 60.0,
        lightness: 50.0 + rng.gen::<f32>() * 30.0,
    }));
}

/// Burst `count` sparks outward from `(cx, cy)`.
pub fn create_explosion(
    state: &GameState,
    rng: &mut impl Rng,
    cx: f32,
    cy: f32,
    count: usize,
) -> GameState {
    let mut particles = state.particles.clone();
    explode(&mut particles, rng, cx, cy, count);
    GameState {
        particles,
        ..state.clone()
    }
}

// ── Power-ups ────────────────────────────────────────────────────────────────

fn grant(effects: &mut ActiveEffects, lives: &mut u32, max_lives: u32, kind: PowerUpKind) {
    match kind {
        PowerUpKind::SpreadShot => effects.spread_shot_ms = SPREAD_SHOT_MS,
        PowerUpKind::RapidFire => effects.rapid_fire_ms = RAPID_FIRE_MS,
        PowerUpKind::Shield => effects.shield_ms = SHIELD_MS,
        PowerUpKind::ExtraLife => *lives = (*lives + 1).min(max_lives),
    }
}

/// Activate a collected pickup. Timed effects restart their full duration.
pub fn apply_power_up(state: &GameState, kind: PowerUpKind) -> GameState {
    let mut effects = state.effects.clone();
    let mut lives = state.player.lives;
    grant(&mut effects, &mut lives, state.max_lives, kind);
    GameState {
        effects,
        player: Player {
            lives,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

// ── Damage ───────────────────────────────────────────────────────────────────

/// Apply one hit to the player unless shielded or still recovering.
fn hit_player(state: &mut GameState) {
    if state.effects.invulnerable() || state.status != GameStatus::Playing {
        return;
    }
    state.player.lives = state.player.lives.saturating_sub(1);
    state.effects.invulnerable_ms = INVULNERABLE_MS;
    debug!(lives = state.player.lives, "player hit");
    if state.player.lives == 0 {
        info!(score = state.score, level = state.level, "game over");
        state.status = GameStatus::GameOver;
    }
}

// ── Level progression ────────────────────────────────────────────────────────

/// Enter the level after the current one.
pub fn start_next_level(state: &GameState) -> GameState {
    let level = (state.level + 1).min(FINAL_LEVEL);
    let cfg = level_config_clamped(level);
    info!(level, name = cfg.name, "level start");
    GameState {
        level,
        enemies_killed: 0,
        enemy_spawn_rate_ms: cfg.spawn_rate_ms,
        boss_spawned: false,
        status: GameStatus::Playing,
        ..state.clone()
    }
}

fn check_level_progress(state: &mut GameState) {
    if state.status != GameStatus::Playing {
        return;
    }
    let cfg = level_config_clamped(state.level);
    if state.enemies_killed < cfg.enemies_required {
        return;
    }
    if state.level < FINAL_LEVEL {
        info!(level = state.level, score = state.score, "level cleared");
        state.status = GameStatus::LevelTransition {
            remaining_ms: LEVEL_TRANSITION_MS,
        };
    } else {
        info!(score = state.score, "victory");
        state.status = GameStatus::Victory;
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame of `FRAME_MS` game time. All
/// randomness comes through `rng` so callers control determinism.
///
/// Only `Playing` advances the world; a level transition counts down and
/// then enters the next level; every other status returns the state as is.
pub fn tick(state: &GameState, input: &Input, rng: &mut impl Rng) -> GameState {
    match state.status {
        GameStatus::Playing => {}
        GameStatus::LevelTransition { remaining_ms } => {
            let remaining_ms = remaining_ms.saturating_sub(FRAME_MS);
            return if remaining_ms == 0 {
                start_next_level(state)
            } else {
                GameState {
                    status: GameStatus::LevelTransition { remaining_ms },
                    ..state.clone()
                }
            };
        }
        GameStatus::Paused | GameStatus::GameOver | GameStatus::Victory => {
            return state.clone();
        }
    }

    // ── 1. Clock & effect timers ─────────────────────────────────────────────
    let mut next = GameState {
        clock_ms: state.clock_ms + FRAME_MS,
        frame: state.frame + 1,
        effects: ActiveEffects {
            spread_shot_ms: state.effects.spread_shot_ms.saturating_sub(FRAME_MS),
            rapid_fire_ms: state.effects.rapid_fire_ms.saturating_sub(FRAME_MS),
            shield_ms: state.effects.shield_ms.saturating_sub(FRAME_MS),
            invulnerable_ms: state.effects.invulnerable_ms.saturating_sub(FRAME_MS),
        },
        ..state.clone()
    };

    // ── 2. Player input ──────────────────────────────────────────────────────
    next = move_player(&next, input);
    if input.fire {
        next = player_shoot(&next);
    }

    // ── 3. Projectiles ───────────────────────────────────────────────────────
    next.bullets = next
        .bullets
        .iter()
        .map(advance_bullet)
        .filter(bullet_in_bounds)
        .collect();
    next.enemy_bullets = next
        .enemy_bullets
        .iter()
        .map(advance_enemy_bullet)
        .filter(enemy_bullet_in_bounds)
        .collect();

    // ── 4. Scheduled spawns ──────────────────────────────────────────────────
    if next.clock_ms - next.last_enemy_spawn_ms > next.enemy_spawn_rate_ms {
        next = spawn_enemy(&next, rng);
        next.last_enemy_spawn_ms = next.clock_ms;
    }
    if next.clock_ms - next.last_power_up_spawn_ms > next.power_up_interval_ms {
        let x = rng.gen_range(0.0..POWER_UP_DROP_SPAN);
        next = spawn_power_up(&next, rng, x, -POWER_UP_SIZE);
        next.last_power_up_spawn_ms = next.clock_ms;
    }

    // ── 5. Power-up pickups ──────────────────────────────────────────────────
    let falling: Vec<PowerUp> = next.power_ups.iter().map(advance_power_up).collect();
    let mut power_ups = Vec::with_capacity(falling.len());
    for p in falling {
        if collides(&next.player, &p) {
            debug!(kind = ?p.kind, "power-up collected");
            grant(&mut next.effects, &mut next.player.lives, next.max_lives, p.kind);
        } else if power_up_in_bounds(&p) {
            power_ups.push(p);
        }
    }
    next.power_ups = power_ups;

    // ── 6. Enemies: movement, fire, hits, rams ───────────────────────────────
    let boss_level = level_config_clamped(next.level).boss_level;
    let enemies = std::mem::take(&mut next.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());

    for enemy in &enemies {
        let mut e = if enemy.is_boss() {
            let (boss, volley) = step_boss(enemy, &next.player, next.clock_ms);
            next.enemy_bullets.extend(volley);
            boss
        } else {
            let moved = step_pattern(enemy);
            let (shooter, shot) = aimed_shot(&moved, &next.player);
            next.enemy_bullets.extend(shot);
            shooter
        };

        // Newest bullets first; each overlapping bullet is spent for 1 damage.
        let mut destroyed = false;
        for i in (0..next.bullets.len()).rev() {
            if !collides(&next.bullets[i], &e) {
                continue;
            }
            next.bullets.remove(i);
            e.health = e.health.saturating_sub(1);
            if e.health == 0 {
                destroyed = true;
                break;
            }
        }

        if destroyed {
            let (cx, cy) = e.rect().center();
            let sparks = if e.is_boss() { BOSS_SPARKS } else { KILL_SPARKS };
            explode(&mut next.particles, rng, cx, cy, sparks);
            next.score += e.points;
            if !boss_level || e.is_boss() {
                next.enemies_killed += 1;
            }
            debug!(kind = ?e.kind, points = e.points, "enemy destroyed");
            if rng.gen::<f32>() > DROP_THRESHOLD {
                next.power_ups.push(roll_power_up(rng, cx, cy));
            }
            continue;
        }

        if collides(&next.player, &e) {
            let (cx, cy) = e.rect().center();
            explode(&mut next.particles, rng, cx, cy, RAM_SPARKS);
            hit_player(&mut next);
            if !e.is_boss() {
                continue;
            }
        }

        if enemy_in_bounds(&e) {
            survivors.push(e);
        }
    }
    next.enemies = survivors;

    // ── 7. Enemy bullets ↔ player ────────────────────────────────────────────
    for i in (0..next.enemy_bullets.len()).rev() {
        if collides(&next.player, &next.enemy_bullets[i]) {
            next.enemy_bullets.remove(i);
            hit_player(&mut next);
        }
    }

    // ── 8. Particles ─────────────────────────────────────────────────────────
    next.particles = next
        .particles
        .iter()
        .filter(|p| p.life > 1)
        .map(|p| Particle {
            x: p.x + p.vx,
            y: p.y + p.vy,
            life: p.life - 1,
            ..p.clone()
        })
        .collect();

    // ── 9. Level goal ────────────────────────────────────────────────────────
    check_level_progress(&mut next);

    next
}
