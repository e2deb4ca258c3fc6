//! Per-frame motion of enemies, the boss and projectiles.
//!
//! Every function here takes an entity by reference and returns its
//! next-frame copy, mirroring the transitions in [`crate::compute`].

use crate::entities::{
    BossPhase, Bullet, Enemy, EnemyBullet, Motion, MovePattern, Player, PowerUp, CULL_Y,
    FRAME_MS, WORLD_WIDTH,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Zigzag enemies swap horizontal direction every half of this period.
const ZIGZAG_PERIOD_MS: u64 = 500;

/// Time the boss spends in each phase.
pub const BOSS_PHASE_MS: u64 = 1000;
/// Rightmost x the boss sweeps to before turning around.
const BOSS_SWEEP_LIMIT: f32 = 904.0;
/// The boss descends until its top edge reaches this line.
pub const BOSS_CRUISE_Y: f32 = 100.0;
const BOSS_DESCENT: f32 = 0.3;
/// Angular offset between the boss's three shots.
const BOSS_SPREAD: f32 = 0.2;

/// Regular enemies only fire while their top edge is inside `(0, FIRE_CEILING)`.
const FIRE_CEILING: f32 = 300.0;

const ENEMY_BULLET_SIZE: f32 = 8.0;
const ENEMY_BULLET_SPEED: f32 = 3.0;
const BOSS_BULLET_SIZE: f32 = 12.0;
const BOSS_BULLET_SPEED: f32 = 4.0;

// ── Regular enemies ──────────────────────────────────────────────────────────

/// Advance a patterned enemy by one frame. Bosses are returned unchanged;
/// they move through [`step_boss`].
pub fn step_pattern(enemy: &Enemy) -> Enemy {
    let Motion::Pattern {
        pattern,
        move_timer_ms,
        amplitude,
        frequency,
        initial_x,
        direction,
    } = enemy.motion
    else {
        return enemy.clone();
    };

    let move_timer_ms = move_timer_ms + FRAME_MS;
    let right_edge = WORLD_WIDTH - enemy.width;
    let y = enemy.y + enemy.speed;
    let mut x = enemy.x;
    let mut direction = direction;

    match pattern {
        MovePattern::Straight => {}
        MovePattern::Zigzag => {
            if move_timer_ms % ZIGZAG_PERIOD_MS < ZIGZAG_PERIOD_MS / 2 {
                x += enemy.speed * direction;
            } else {
                x -= enemy.speed * direction;
            }
            if x < 0.0 || x > right_edge {
                direction = -direction;
            }
        }
        MovePattern::Sine => {
            x = (initial_x + (y * frequency).sin() * amplitude).clamp(0.0, right_edge.max(0.0));
        }
        MovePattern::Diagonal => {
            x += enemy.speed * direction;
            if x < 0.0 || x > right_edge {
                direction = -direction;
            }
        }
    }

    Enemy {
        x,
        y,
        motion: Motion::Pattern {
            pattern,
            move_timer_ms,
            amplitude,
            frequency,
            initial_x,
            direction,
        },
        ..enemy.clone()
    }
}

/// Run a regular enemy's shot timer for one frame. Fires one bullet aimed at
/// the player's top-left corner when the interval elapses.
pub fn aimed_shot(enemy: &Enemy, player: &Player) -> (Enemy, Option<EnemyBullet>) {
    if !enemy.can_shoot || enemy.y <= 0.0 || enemy.y >= FIRE_CEILING {
        return (enemy.clone(), None);
    }

    let shoot_timer_ms = enemy.shoot_timer_ms + FRAME_MS;
    if shoot_timer_ms <= enemy.shoot_interval_ms {
        return (
            Enemy {
                shoot_timer_ms,
                ..enemy.clone()
            },
            None,
        );
    }

    let angle = (player.y - enemy.y).atan2(player.x - enemy.x);
    let bullet = EnemyBullet {
        x: enemy.x + enemy.width / 2.0,
        y: enemy.y + enemy.height,
        width: ENEMY_BULLET_SIZE,
        height: ENEMY_BULLET_SIZE,
        speed: ENEMY_BULLET_SPEED,
        angle,
    };
    (
        Enemy {
            shoot_timer_ms: 0,
            ..enemy.clone()
        },
        Some(bullet),
    )
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Advance the boss by one frame: phase cycling, movement, and the
/// three-way aimed volley.
pub fn step_boss(boss: &Enemy, player: &Player, clock_ms: u64) -> (Enemy, Vec<EnemyBullet>) {
    let Motion::Boss {
        phase,
        phase_timer_ms,
    } = boss.motion
    else {
        return (boss.clone(), Vec::new());
    };

    let mut phase = phase;
    let mut phase_timer_ms = phase_timer_ms + FRAME_MS;
    let mut shoot_timer_ms = boss.shoot_timer_ms + FRAME_MS;

    if phase_timer_ms > BOSS_PHASE_MS {
        phase = phase.next();
        phase_timer_ms = 0;
    }

    let mut x = boss.x;
    let mut speed = boss.speed;
    match phase {
        BossPhase::Drift => {
            x += (clock_ms as f32 * 0.001).sin() * 2.0;
        }
        BossPhase::Sweep => {
            x += speed * 2.0;
            if x > BOSS_SWEEP_LIMIT || x < 0.0 {
                speed = -speed;
            }
        }
        BossPhase::Hold => {}
    }
    let y = (boss.y + BOSS_DESCENT).min(BOSS_CRUISE_Y);

    let mut volley = Vec::new();
    if shoot_timer_ms > boss.shoot_interval_ms {
        shoot_timer_ms = 0;
        let aim = (player.y - y).atan2(player.x - x);
        for i in -1..=1 {
            volley.push(EnemyBullet {
                x: x + boss.width / 2.0,
                y: y + boss.height,
                width: BOSS_BULLET_SIZE,
                height: BOSS_BULLET_SIZE,
                speed: BOSS_BULLET_SPEED,
                angle: aim + i as f32 * BOSS_SPREAD,
            });
        }
    }

    (
        Enemy {
            x,
            y,
            speed,
            shoot_timer_ms,
            motion: Motion::Boss {
                phase,
                phase_timer_ms,
            },
            ..boss.clone()
        },
        volley,
    )
}

// ── Projectiles ──────────────────────────────────────────────────────────────

pub fn advance_bullet(b: &Bullet) -> Bullet {
    let x = if b.angle != 0.0 {
        b.x + b.angle.sin() * b.speed
    } else {
        b.x
    };
    Bullet {
        x,
        y: b.y - b.speed,
        ..b.clone()
    }
}

pub fn advance_enemy_bullet(b: &EnemyBullet) -> EnemyBullet {
    EnemyBullet {
        x: b.x + b.angle.cos() * b.speed,
        y: b.y + b.angle.sin() * b.speed,
        ..b.clone()
    }
}

pub fn advance_power_up(p: &PowerUp) -> PowerUp {
    PowerUp {
        y: p.y + p.speed,
        ..p.clone()
    }
}

// ── Culling ──────────────────────────────────────────────────────────────────

pub fn bullet_in_bounds(b: &Bullet) -> bool {
    b.y > -b.height && b.x > 0.0 && b.x < WORLD_WIDTH
}

pub fn enemy_bullet_in_bounds(b: &EnemyBullet) -> bool {
    b.y < CULL_Y && b.y > -b.height && b.x > 0.0 && b.x < WORLD_WIDTH
}

pub fn power_up_in_bounds(p: &PowerUp) -> bool {
    p.y < CULL_Y
}

pub fn enemy_in_bounds(e: &Enemy) -> bool {
    e.y < CULL_Y && e.y > -e.height
}
