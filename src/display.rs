//! Rendering layer. All terminal I/O for a running game lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands, scaling the 1024x768 world onto whatever
//! grid of cells the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use stellar_strike::entities::{
    Bounds, EnemyKind, GameState, GameStatus, PowerUpKind, Rect, Ship, WORLD_HEIGHT, WORLD_WIDTH,
};
use stellar_strike::levels::level_config_clamped;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_STAR: Color = Color::Grey;
const C_BULLET_PLAYER: Color = Color::Rgb { r: 0x00, g: 0xff, b: 0x88 };
const C_BULLET_ENEMY: Color = Color::Rgb { r: 0xff, g: 0x00, b: 0x55 };
const C_SHIP_BLUE: Color = Color::Rgb { r: 0x00, g: 0xd9, b: 0xff };
const C_SHIP_RED: Color = Color::Rgb { r: 0xff, g: 0x08, b: 0x44 };
const C_SHIELD: Color = Color::Rgb { r: 0x00, g: 0xd9, b: 0xff };
const C_HEALTH_FULL: Color = Color::Green;
const C_HEALTH_LOST: Color = Color::Red;

const STAR_COUNT: u64 = 130;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps world coordinates onto the bordered play area.
///
/// Row 0 is the HUD, row 1 and `height - 2` are the border, the last row
/// holds the controls hint. Columns 0 and `width - 1` are the side walls.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    fn cols(&self) -> f32 {
        self.width.saturating_sub(2).max(1) as f32
    }

    fn rows(&self) -> f32 {
        self.height.saturating_sub(4).max(1) as f32
    }

    fn col(&self, x: f32) -> i32 {
        1 + (x / WORLD_WIDTH * self.cols()).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        2 + (y / WORLD_HEIGHT * self.rows()).floor() as i32
    }

    fn in_play_area(&self, col: i32, row: i32) -> bool {
        col >= 1
            && col < self.width as i32 - 1
            && row >= 2
            && row < self.height as i32 - 2
    }

    /// Cell span of a world rectangle; always at least one cell.
    fn span(&self, r: Rect) -> (i32, i32, i32, i32) {
        let c0 = self.col(r.x);
        let r0 = self.row(r.y);
        let c1 = self.col(r.x + r.width).max(c0 + 1);
        let r1 = self.row(r.y + r.height).max(r0 + 1);
        (c0, r0, c1, r1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. `best` is the persisted high score.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
    best: u32,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_starfield(out, state, view)?;
    draw_border(out, view)?;

    for b in &state.bullets {
        fill(out, view, b.rect(), "│", C_BULLET_PLAYER)?;
    }
    for b in &state.enemy_bullets {
        fill(out, view, b.rect(), "•", C_BULLET_ENEMY)?;
    }
    for p in &state.power_ups {
        let (glyph, color) = power_up_look(p.kind);
        fill(out, view, p.rect(), glyph, color)?;
    }
    for e in &state.enemies {
        let (glyph, color) = enemy_look(e.kind);
        fill(out, view, e.rect(), glyph, color)?;
        if e.health < e.max_health || e.is_boss() {
            draw_health_bar(out, view, e.rect(), e.health, e.max_health, e.is_boss())?;
        }
    }
    for p in &state.particles {
        let (col, row) = (view.col(p.x), view.row(p.y));
        if view.in_play_area(col, row) {
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(style::SetForegroundColor(hsl(p.hue, 1.0, p.lightness / 100.0)))?;
            out.queue(Print(if p.life > 20 { "*" } else { "·" }))?;
        }
    }

    draw_player(out, state, view)?;
    draw_hud(out, state, view)?;
    draw_controls_hint(out, view)?;

    match state.status {
        GameStatus::Playing => {}
        GameStatus::Paused => draw_banner(
            out,
            view,
            &[
                ("PAUSED".to_string(), Color::Yellow),
                ("Esc - Resume   R - Restart   M - Main Menu".to_string(), Color::White),
            ],
        )?,
        GameStatus::LevelTransition { remaining_ms } => {
            let next = level_config_clamped(state.level + 1);
            draw_banner(
                out,
                view,
                &[
                    (format!("LEVEL {} COMPLETE", state.level), Color::Green),
                    (format!("Next: {}", next.name), Color::Cyan),
                    (format!("Starting in {}s", remaining_ms / 1000 + 1), Color::White),
                ],
            )?
        }
        GameStatus::GameOver => draw_final(out, state, view, best, "GAME  OVER", Color::Red)?,
        GameStatus::Victory => draw_final(out, state, view, best, "V I C T O R Y", Color::Green)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Looks ─────────────────────────────────────────────────────────────────────

fn enemy_look(kind: EnemyKind) -> (&'static str, Color) {
    match kind {
        EnemyKind::SmallDrone => ("▼", Color::Rgb { r: 0xff, g: 0x6b, b: 0x35 }),
        EnemyKind::Fighter => ("◆", Color::Rgb { r: 0xff, g: 0x08, b: 0x44 }),
        EnemyKind::Heavy => ("█", Color::Rgb { r: 0x8b, g: 0x00, b: 0xff }),
        EnemyKind::Boss => ("▓", Color::Rgb { r: 0xff, g: 0x00, b: 0xff }),
    }
}

fn power_up_look(kind: PowerUpKind) -> (&'static str, Color) {
    match kind {
        PowerUpKind::SpreadShot => ("★", Color::Rgb { r: 0xff, g: 0x6b, b: 0x35 }),
        PowerUpKind::RapidFire => ("!", Color::Rgb { r: 0xff, g: 0xd7, b: 0x00 }),
        PowerUpKind::Shield => ("◎", Color::Rgb { r: 0x00, g: 0xd9, b: 0xff }),
        PowerUpKind::ExtraLife => ("♥", Color::Rgb { r: 0xff, g: 0x08, b: 0x44 }),
    }
}

/// HSL (hue in degrees, saturation and lightness in `0..=1`) to RGB.
fn hsl(hue: f32, sat: f32, light: f32) -> Color {
    let c = (1.0 - (2.0 * light - 1.0).abs()) * sat;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = light - c / 2.0;
    let to_u8 = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
    }
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Paint every cell a world rectangle covers, clipped to the play area.
fn fill<W: Write>(
    out: &mut W,
    view: Viewport,
    rect: Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.span(rect);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        for col in c0..c1 {
            if view.in_play_area(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn draw_health_bar<W: Write>(
    out: &mut W,
    view: Viewport,
    rect: Rect,
    health: u32,
    max_health: u32,
    boss: bool,
) -> std::io::Result<()> {
    let (c0, r0, c1, _) = view.span(rect);
    let row = r0 - 1;
    let cells = c1 - c0;
    let filled = (cells as f32 * health as f32 / max_health.max(1) as f32).ceil() as i32;
    for (i, col) in (c0..c1).enumerate() {
        if !view.in_play_area(col, row) {
            continue;
        }
        let color = if (i as i32) < filled { C_HEALTH_FULL } else { C_HEALTH_LOST };
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print("▬"))?;
    }
    if boss {
        let label = format!("{}/{}", health, max_health);
        let col = c0 + (cells - label.len() as i32) / 2;
        if view.in_play_area(col, row - 1) {
            out.queue(cursor::MoveTo(col as u16, (row - 1) as u16))?;
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(label))?;
        }
    }
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_starfield<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    for i in 0..STAR_COUNT {
        let x = (i * 123) % WORLD_WIDTH as u64;
        let drift = state.clock_ms as f64 * 0.03 * (1 + i % 3) as f64;
        let y = ((i * 456) as f64 + drift) % WORLD_HEIGHT as f64;
        let (col, row) = (view.col(x as f32), view.row(y as f32));
        if view.in_play_area(col, row) {
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(if i % 3 == 2 { "+" } else { "." }))?;
        }
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Player ────────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    let color = match state.ship {
        Ship::Blue => C_SHIP_BLUE,
        Ship::Red => C_SHIP_RED,
    };
    let rect = state.player.rect();

    if state.effects.shielded() {
        let ring = Rect {
            x: rect.x - 10.0,
            y: rect.y - 10.0,
            width: rect.width + 20.0,
            height: rect.height + 20.0,
        };
        fill(out, view, ring, "░", C_SHIELD)?;
    }

    // Blink during the post-hit grace period.
    let blinking = state.effects.invulnerable_ms > 0 && (state.frame / 4) % 2 == 0;
    if !blinking {
        fill(out, view, rect, "▲", color)?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", state.score)))?;

    // Level and kill progress — centre
    let cfg = level_config_clamped(state.level);
    let level_str = format!(
        "[ L{} {} {}/{} ]",
        state.level, cfg.name, state.enemies_killed, cfg.enemies_required
    );
    let lx = (view.width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Active power-ups + lives — right side
    let mut tags = String::new();
    let fx = &state.effects;
    for (ms, tag) in [
        (fx.spread_shot_ms, "SPREAD"),
        (fx.rapid_fire_ms, "RAPID"),
        (fx.shield_ms, "SHIELD"),
    ] {
        if ms > 0 {
            tags.push_str(&format!("[{} {}s] ", tag, ms / 1000 + 1));
        }
    }
    let hearts: String = "♥".repeat(state.player.lives as usize);
    let lives_str = format!("Lives:{}", hearts);
    let right_len = tags.chars().count() + lives_str.chars().count();

    let rx = view.width.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑→↓ / WASD : Move   SPACE : Fire   ESC : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Centre a stack of coloured lines on the screen.
fn draw_banner<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_final<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
    best: u32,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let new_best = state.score > best;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>7} ★", state.score)
    } else {
        format!("Best Score:  {:>7}", best)
    };
    let lines = [
        ("╔══════════════════════╗".to_string(), color),
        (format!("║{:^22}║", title), color),
        ("╚══════════════════════╝".to_string(), color),
        (format!("Final Score: {:>7}", state.score), Color::Yellow),
        (
            format!("Reached level {}   Enemies: {}", state.level, state.enemies_killed),
            Color::Cyan,
        ),
        (best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again   M - Main Menu   Q - Quit".to_string(), Color::White),
    ];
    draw_banner(out, view, &lines)
}
