use std::f32::consts::FRAC_PI_2;

use stellar_strike::entities::*;
use stellar_strike::movement::*;

fn patterned(pattern: MovePattern, x: f32, y: f32, direction: f32) -> Enemy {
    Enemy {
        x,
        y,
        width: 50.0,
        height: 50.0,
        speed: 3.0,
        kind: EnemyKind::Fighter,
        health: 2,
        max_health: 2,
        points: 30,
        can_shoot: true,
        shoot_timer_ms: 0,
        shoot_interval_ms: 2000,
        motion: Motion::Pattern {
            pattern,
            move_timer_ms: 0,
            amplitude: 100.0,
            frequency: 0.02,
            initial_x: x,
            direction,
        },
    }
}

fn boss(phase: BossPhase, x: f32, y: f32) -> Enemy {
    Enemy {
        x,
        y,
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
            phase,
            phase_timer_ms: 0,
        },
    }
}

fn player_at(x: f32, y: f32) -> Player {
    Player {
        x,
        y,
        width: 60.0,
        height: 60.0,
        speed: 5.0,
        lives: 3,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn direction_of(e: &Enemy) -> f32 {
    match e.motion {
        Motion::Pattern { direction, .. } => direction,
        Motion::Boss { .. } => panic!("not a patterned enemy"),
    }
}

fn phase_of(e: &Enemy) -> (BossPhase, u64) {
    match e.motion {
        Motion::Boss {
            phase,
            phase_timer_ms,
        } => (phase, phase_timer_ms),
        Motion::Pattern { .. } => panic!("not a boss"),
    }
}

// ── patterns ──────────────────────────────────────────────────────────────────

#[test]
fn straight_descends_only() {
    let e = step_pattern(&patterned(MovePattern::Straight, 100.0, 10.0, 1.0));
    assert_eq!((e.x, e.y), (100.0, 13.0));
    match e.motion {
        Motion::Pattern { move_timer_ms, .. } => assert_eq!(move_timer_ms, FRAME_MS),
        Motion::Boss { .. } => unreachable!(),
    }
}

#[test]
fn zigzag_swings_out_then_back() {
    let e = step_pattern(&patterned(MovePattern::Zigzag, 100.0, 10.0, 1.0));
    assert_eq!(e.x, 103.0); // 16 ms into the 500 ms period: outward half

    let mut late = patterned(MovePattern::Zigzag, 100.0, 10.0, 1.0);
    late.motion = Motion::Pattern {
        pattern: MovePattern::Zigzag,
        move_timer_ms: 240,
        amplitude: 100.0,
        frequency: 0.02,
        initial_x: 100.0,
        direction: 1.0,
    };
    assert_eq!(step_pattern(&late).x, 97.0); // 256 ms: return half
}

#[test]
fn zigzag_flips_at_left_edge() {
    let e = step_pattern(&patterned(MovePattern::Zigzag, 0.5, 10.0, -1.0));
    assert!(e.x < 0.0);
    assert_eq!(direction_of(&e), 1.0);
}

#[test]
fn sine_follows_descent() {
    let e = step_pattern(&patterned(MovePattern::Sine, 200.0, 0.0, 1.0));
    assert_eq!(e.y, 3.0);
    assert!(approx(e.x, 200.0 + (3.0f32 * 0.02).sin() * 100.0));
}

#[test]
fn sine_is_clamped_to_world() {
    // sin(3 * 0.02) > 0, so the swing pushes past the right edge.
    let e = step_pattern(&patterned(MovePattern::Sine, 970.0, 0.0, 1.0));
    assert_eq!(e.x, WORLD_WIDTH - 50.0);
}

#[test]
fn diagonal_bounces_off_right_edge() {
    let e = step_pattern(&patterned(MovePattern::Diagonal, 973.0, 10.0, 1.0));
    assert_eq!(e.x, 976.0);
    assert_eq!(direction_of(&e), -1.0);

    let back = step_pattern(&e);
    assert_eq!(back.x, 973.0);
}

#[test]
fn step_pattern_leaves_boss_alone() {
    let b = boss(BossPhase::Sweep, 300.0, 50.0);
    assert_eq!(step_pattern(&b), b);
}

// ── aimed shots ───────────────────────────────────────────────────────────────

#[test]
fn shooter_fires_when_interval_elapses() {
    let mut e = patterned(MovePattern::Straight, 100.0, 100.0, 1.0);
    e.shoot_timer_ms = 2000;
    let (e2, shot) = aimed_shot(&e, &player_at(100.0, 500.0));
    let shot = shot.expect("interval elapsed");
    assert_eq!(e2.shoot_timer_ms, 0);
    assert_eq!((shot.x, shot.y), (125.0, 150.0)); // bottom centre
    assert!(approx(shot.angle, FRAC_PI_2));
    assert_eq!((shot.width, shot.speed), (8.0, 3.0));
}

#[test]
fn shooter_charges_between_shots() {
    let e = patterned(MovePattern::Straight, 100.0, 100.0, 1.0);
    let (e2, shot) = aimed_shot(&e, &player_at(100.0, 500.0));
    assert!(shot.is_none());
    assert_eq!(e2.shoot_timer_ms, FRAME_MS);
}

#[test]
fn no_shots_outside_firing_band() {
    let player = player_at(100.0, 500.0);
    for y in [-10.0, 0.0, 300.0, 400.0] {
        let mut e = patterned(MovePattern::Straight, 100.0, y, 1.0);
        e.shoot_timer_ms = 5000;
        let (e2, shot) = aimed_shot(&e, &player);
        assert!(shot.is_none(), "y={y}");
        assert_eq!(e2.shoot_timer_ms, 5000, "timer frozen at y={y}");
    }
}

#[test]
fn drones_never_shoot() {
    let mut e = patterned(MovePattern::Straight, 100.0, 100.0, 1.0);
    e.can_shoot = false;
    e.shoot_timer_ms = 5000;
    assert!(aimed_shot(&e, &player_at(0.0, 0.0)).1.is_none());
}

// ── boss ──────────────────────────────────────────────────────────────────────

#[test]
fn boss_phases_cycle() {
    assert_eq!(BossPhase::Drift.next(), BossPhase::Sweep);
    assert_eq!(BossPhase::Sweep.next(), BossPhase::Hold);
    assert_eq!(BossPhase::Hold.next(), BossPhase::Drift);
}

#[test]
fn boss_advances_phase_after_a_second() {
    let mut b = boss(BossPhase::Drift, 300.0, 100.0);
    b.motion = Motion::Boss {
        phase: BossPhase::Drift,
        phase_timer_ms: BOSS_PHASE_MS,
    };
    let (b2, _) = step_boss(&b, &player_at(0.0, 600.0), 0);
    assert_eq!(phase_of(&b2), (BossPhase::Sweep, 0));
    assert_eq!(b2.x, 301.0); // sweeping at speed * 2
}

#[test]
fn boss_holds_still_in_hold_phase() {
    let b = boss(BossPhase::Hold, 300.0, 100.0);
    let (b2, _) = step_boss(&b, &player_at(0.0, 600.0), 12_345);
    assert_eq!(b2.x, 300.0);
    assert_eq!(phase_of(&b2), (BossPhase::Hold, FRAME_MS));
}

#[test]
fn boss_drift_follows_clock() {
    let b = boss(BossPhase::Drift, 300.0, 100.0);
    let (b2, _) = step_boss(&b, &player_at(0.0, 600.0), 1000);
    assert!(approx(b2.x, 300.0 + 1.0f32.sin() * 2.0));
}

#[test]
fn boss_sweep_turns_at_edges() {
    let b = boss(BossPhase::Sweep, 904.0, 100.0);
    let (b2, _) = step_boss(&b, &player_at(0.0, 600.0), 0);
    assert_eq!(b2.x, 905.0);
    assert_eq!(b2.speed, -0.5);

    let (b3, _) = step_boss(&b2, &player_at(0.0, 600.0), 0);
    assert_eq!(b3.x, 904.0);
}

#[test]
fn boss_descends_to_cruise_line() {
    let b = boss(BossPhase::Hold, 300.0, -120.0);
    let (b2, _) = step_boss(&b, &player_at(0.0, 600.0), 0);
    assert!(approx(b2.y, -119.7));

    let low = boss(BossPhase::Hold, 300.0, 99.9);
    let (b3, _) = step_boss(&low, &player_at(0.0, 600.0), 0);
    assert_eq!(b3.y, BOSS_CRUISE_Y);
}

#[test]
fn boss_fires_three_way_volley() {
    let mut b = boss(BossPhase::Hold, 300.0, 100.0);
    b.shoot_timer_ms = 2000;
    let player = player_at(300.0, 600.0);
    let (b2, volley) = step_boss(&b, &player, 0);
    assert_eq!(b2.shoot_timer_ms, 0);
    assert_eq!(volley.len(), 3);
    let aim = FRAC_PI_2; // straight down at the player
    for (shot, offset) in volley.iter().zip([-0.2f32, 0.0, 0.2]) {
        assert!(approx(shot.angle, aim + offset));
        assert_eq!((shot.x, shot.y), (360.0, 220.0));
        assert_eq!((shot.width, shot.speed), (12.0, 4.0));
    }
}

#[test]
fn boss_holds_fire_between_volleys() {
    let b = boss(BossPhase::Hold, 300.0, 100.0);
    let (b2, volley) = step_boss(&b, &player_at(0.0, 600.0), 0);
    assert!(volley.is_empty());
    assert_eq!(b2.shoot_timer_ms, FRAME_MS);
}

// ── projectiles & culling ─────────────────────────────────────────────────────

#[test]
fn projectiles_advance() {
    let b = Bullet {
        x: 10.0,
        y: 100.0,
        width: 4.0,
        height: 12.0,
        speed: 8.0,
        angle: 0.0,
    };
    assert_eq!(advance_bullet(&b).y, 92.0);

    let eb = EnemyBullet {
        x: 10.0,
        y: 100.0,
        width: 8.0,
        height: 8.0,
        speed: 3.0,
        angle: 0.0,
    };
    let moved = advance_enemy_bullet(&eb);
    assert_eq!((moved.x, moved.y), (13.0, 100.0));

    let p = PowerUp {
        x: 0.0,
        y: 0.0,
        width: 30.0,
        height: 30.0,
        speed: 2.0,
        kind: PowerUpKind::Shield,
    };
    assert_eq!(advance_power_up(&p).y, 2.0);
}

#[test]
fn culling_bounds() {
    let b = Bullet {
        x: 10.0,
        y: -11.0,
        width: 4.0,
        height: 12.0,
        speed: 8.0,
        angle: 0.0,
    };
    assert!(bullet_in_bounds(&b));
    assert!(!bullet_in_bounds(&Bullet { y: -12.0, ..b.clone() }));
    assert!(!bullet_in_bounds(&Bullet { x: 0.0, ..b.clone() }));
    assert!(!bullet_in_bounds(&Bullet { x: WORLD_WIDTH, ..b }));

    let mut e = patterned(MovePattern::Straight, 10.0, -49.0, 1.0);
    assert!(enemy_in_bounds(&e));
    e.y = -50.0;
    assert!(!enemy_in_bounds(&e));
    e.y = CULL_Y;
    assert!(!enemy_in_bounds(&e));
}
