mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use display::Viewport;
use stellar_strike::compute::{init_state, tick, toggle_pause};
use stellar_strike::config::GameConfig;
use stellar_strike::entities::{GameState, GameStatus, Input, Ship};
use stellar_strike::levels::FINAL_LEVEL;
use stellar_strike::records::Records;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stellar_strike")]
#[command(about = "Single-screen arcade shooter for the terminal")]
struct Cli {
    /// JSON config file; unset fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the RNG for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Level to start on (practice mode).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=FINAL_LEVEL as i64))]
    level: u32,

    /// Log destination. The terminal belongs to the game, so logs go to a file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 60 FPS a window of 8 frames (≈130 ms) is refreshed by the OS key
/// repeat before it expires.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Fold the held-key map into this frame's controls.
fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Input {
    use KeyCode::{Char, Down, Left, Right, Up};
    Input {
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        fire: is_held(key_frame, &Char(' '), frame),
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

enum ShipChoice {
    Picked(Ship),
    Back,
    Quit,
}

/// Print centred lines starting a few rows above the middle of the screen.
fn draw_centered<W: Write>(out: &mut W, lines: &[(String, Color)]) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let start = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            start + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    records: &Records,
) -> std::io::Result<MenuResult> {
    let mut lines = vec![
        ("★  STELLAR  STRIKE  ★".to_string(), Color::Cyan),
        (String::new(), Color::Reset),
    ];
    if records.high_score > 0 {
        lines.push((format!("Best Score: {}", records.high_score), Color::Yellow));
        lines.push((
            format!(
                "Furthest level: {}   Victories: {}",
                records.furthest_level, records.victories
            ),
            Color::DarkGrey,
        ));
        lines.push((String::new(), Color::Reset));
    }
    lines.extend([
        ("[ENTER] Start Mission".to_string(), Color::Green),
        ("[Q]     Quit".to_string(), Color::Red),
        (String::new(), Color::Reset),
        ("Power-ups:".to_string(), Color::DarkGrey),
        ("★ Spread shot   ! Rapid fire".to_string(), Color::Yellow),
        ("◎ Shield        ♥ Extra life".to_string(), Color::Cyan),
        (String::new(), Color::Reset),
        (
            "←↑→↓ / WASD : Move   SPACE : Fire   ESC : Pause".to_string(),
            Color::DarkGrey,
        ),
    ]);
    draw_centered(out, &lines)?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit); // input thread gone
        };
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

fn show_ship_selection<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<ShipChoice> {
    let blue = Color::Rgb { r: 0x00, g: 0xd9, b: 0xff };
    let red = Color::Rgb { r: 0xff, g: 0x08, b: 0x44 };
    draw_centered(
        out,
        &[
            ("SELECT YOUR SHIP".to_string(), Color::White),
            (String::new(), Color::Reset),
            ("[1] ▲ Blue Falcon".to_string(), blue),
            ("[2] ▲ Red Phoenix".to_string(), red),
            (String::new(), Color::Reset),
            ("ESC : Back".to_string(), Color::DarkGrey),
        ],
    )?;

    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(ShipChoice::Quit);
        };
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
            match code {
                KeyCode::Char('1') | KeyCode::Char('b') | KeyCode::Char('B') => {
                    return Ok(ShipChoice::Picked(Ship::Blue));
                }
                KeyCode::Char('2') | KeyCode::Char('r') | KeyCode::Char('R') => {
                    return Ok(ShipChoice::Picked(Ship::Red));
                }
                KeyCode::Esc => return Ok(ShipChoice::Back),
                KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(ShipChoice::Quit),
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// How a run ended, from the player's point of view.
#[derive(Debug, PartialEq)]
enum RunEnd {
    Quit,
    MainMenu,
    PlayAgain,
}

/// What a single key press does outside of the held controls.
#[derive(Debug, PartialEq)]
enum PressAction {
    Nothing,
    TogglePause,
    End(RunEnd),
}

/// One-shot keys: Q / Ctrl-C quit anywhere, Esc pauses, M and R leave a
/// paused or finished run for the menu or a restart.
fn press_action(status: &GameStatus, code: &KeyCode, modifiers: KeyModifiers) -> PressAction {
    let leavable = matches!(
        status,
        GameStatus::Paused | GameStatus::GameOver | GameStatus::Victory
    );
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => PressAction::End(RunEnd::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            PressAction::End(RunEnd::Quit)
        }
        KeyCode::Esc => PressAction::TogglePause,
        KeyCode::Char('m') | KeyCode::Char('M') if leavable => PressAction::End(RunEnd::MainMenu),
        KeyCode::Char('r') | KeyCode::Char('R') if leavable => PressAction::End(RunEnd::PlayAgain),
        _ => PressAction::Nothing,
    }
}

/// Drive one run until the player leaves it.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and hand them to the simulation together.
/// This allows Space + arrows to be held at the same time with no interference.
/// Terminals with keyboard enhancement send `Release` events and keys are
/// dropped immediately; elsewhere they expire after `HOLD_WINDOW`.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_time: Duration,
    best: u32,
) -> std::io::Result<RunEnd> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match press_action(&state.status, &code, modifiers) {
                        PressAction::End(end) => return Ok(end),
                        PressAction::TogglePause => *state = toggle_pause(state),
                        PressAction::Nothing => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = held_input(&key_frame, frame);
        let before = state.status.clone();
        *state = tick(state, &input, rng);
        if state.status != before {
            info!(from = ?before, to = ?state.status, level = state.level, "status changed");
        }

        let (width, height) = terminal::size()?;
        display::render(out, state, Viewport { width, height }, best)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("stellar_strike.log"));
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    info!(?config, seed = ?cli.seed, level = cli.level, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &cli, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    config: &GameConfig,
) -> Result<()> {
    let records_path = config.records_path();
    let mut records = match Records::load(&records_path) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, path = %records_path.display(), "ignoring unreadable records");
            Records::default()
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = Duration::from_millis(config.frame_ms);

    'menu: loop {
        if let MenuResult::Quit = show_menu(out, rx, &records)? {
            break;
        }

        let ship = match show_ship_selection(out, rx)? {
            ShipChoice::Picked(ship) => ship,
            ShipChoice::Back => continue 'menu,
            ShipChoice::Quit => break 'menu,
        };

        // Play again keeps the chosen ship.
        loop {
            info!(?ship, level = cli.level, "run started");
            let mut state = init_state(ship, cli.level, config);
            let best = records.high_score;
            let end = game_loop(out, &mut state, rx, &mut rng, frame_time, best)?;
            info!(score = state.score, level = state.level, ?end, "run ended");

            // Persist records after every run
            if records.record_run(&state) {
                info!(high_score = records.high_score, "new high score");
            }
            records
                .save(&records_path)
                .with_context(|| format!("failed to save records: {}", records_path.display()))?;

            match end {
                RunEnd::Quit => break 'menu,
                RunEnd::MainMenu => continue 'menu,
                RunEnd::PlayAgain => {}
            }
        }
    }
    Ok(())
}
