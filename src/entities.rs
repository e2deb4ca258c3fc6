//! All game entity types — pure data, no logic.

// ── World ────────────────────────────────────────────────────────────────────

/// Width of the play field in world units.
pub const WORLD_WIDTH: f32 = 1024.0;
/// Height of the play field in world units.
pub const WORLD_HEIGHT: f32 = 768.0;
/// Entities falling past this line are discarded.
pub const CULL_Y: f32 = 800.0;
/// Game time advanced by one simulated frame, in milliseconds.
pub const FRAME_MS: u64 = 16;

/// Axis-aligned bounding box; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything with a collision box.
pub trait Bounds {
    fn rect(&self) -> Rect;
}

macro_rules! impl_bounds {
    ($($ty:ty),*) => {
        $(impl Bounds for $ty {
            fn rect(&self) -> Rect {
                Rect { x: self.x, y: self.y, width: self.width, height: self.height }
            }
        })*
    };
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ship {
    Blue,
    Red,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Units moved per frame in each held direction.
    pub speed: f32,
    pub lives: u32,
}

/// The controls held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// A player shot. Travels upward; a non-zero `angle` (radians from vertical)
/// adds sideways drift.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub angle: f32,
}

/// An enemy shot travelling along `angle` (radians, screen coordinates).
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub angle: f32,
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    SmallDrone,
    Fighter,
    /// The large regular enemy; not to be confused with the level-6 boss.
    Heavy,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePattern {
    Straight,
    Zigzag,
    Sine,
    Diagonal,
}

pub const MOVE_PATTERNS: [MovePattern; 4] = [
    MovePattern::Straight,
    MovePattern::Zigzag,
    MovePattern::Sine,
    MovePattern::Diagonal,
];

/// Boss movement phases, cycled in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    /// Sways left and right following a slow sine of the game clock.
    Drift,
    /// Sweeps across the screen, bouncing off the edges.
    Sweep,
    /// Holds its horizontal position.
    Hold,
}

impl BossPhase {
    pub fn next(self) -> BossPhase {
        match self {
            BossPhase::Drift => BossPhase::Sweep,
            BossPhase::Sweep => BossPhase::Hold,
            BossPhase::Hold => BossPhase::Drift,
        }
    }
}

/// How an enemy moves each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    Pattern {
        pattern: MovePattern,
        move_timer_ms: u64,
        /// Sine pattern: horizontal swing in world units.
        amplitude: f32,
        /// Sine pattern: radians per unit of descent.
        frequency: f32,
        /// Sine pattern: centre line of the swing.
        initial_x: f32,
        /// Zigzag / diagonal: +1.0 or -1.0.
        direction: f32,
    },
    Boss {
        phase: BossPhase,
        phase_timer_ms: u64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Descent per frame. The boss reuses it as its signed sweep speed.
    pub speed: f32,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    pub points: u32,
    pub can_shoot: bool,
    pub shoot_timer_ms: u64,
    pub shoot_interval_ms: u64,
    pub motion: Motion,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }
}

// ── Effects ──────────────────────────────────────────────────────────────────

/// One spark of an explosion. Colour is an HSL hue/lightness pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames left to live.
    pub life: u32,
    pub hue: f32,
    pub lightness: f32,
}

pub const PARTICLE_LIFE: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    SpreadShot,
    RapidFire,
    Shield,
    ExtraLife,
}

pub const POWER_UP_KINDS: [PowerUpKind; 4] = [
    PowerUpKind::SpreadShot,
    PowerUpKind::RapidFire,
    PowerUpKind::Shield,
    PowerUpKind::ExtraLife,
];

/// A falling pickup.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kind: PowerUpKind,
}

/// Remaining game time of each timed modifier; zero means inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub spread_shot_ms: u64,
    pub rapid_fire_ms: u64,
    pub shield_ms: u64,
    /// Grace period after taking a hit.
    pub invulnerable_ms: u64,
}

impl ActiveEffects {
    pub fn spread_shot(&self) -> bool {
        self.spread_shot_ms > 0
    }

    pub fn rapid_fire(&self) -> bool {
        self.rapid_fire_ms > 0
    }

    pub fn shielded(&self) -> bool {
        self.shield_ms > 0
    }

    pub fn invulnerable(&self) -> bool {
        self.shield_ms > 0 || self.invulnerable_ms > 0
    }
}

impl_bounds!(Player, Bullet, EnemyBullet, Enemy, PowerUp);

// ── Master game state ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    Paused,
    /// Between levels; the simulation is frozen until the countdown ends.
    LevelTransition { remaining_ms: u64 },
    GameOver,
    Victory,
}

/// The entire game state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub score: u32,
    /// Current level, 1-based.
    pub level: u32,
    /// Kills counted toward the current level's goal.
    pub enemies_killed: u32,
    pub enemy_spawn_rate_ms: u64,
    pub last_enemy_spawn_ms: u64,
    pub power_up_interval_ms: u64,
    pub last_power_up_spawn_ms: u64,
    /// Game-clock time of the last shot; `None` until the first one.
    pub last_shot_ms: Option<u64>,
    pub boss_spawned: bool,
    pub max_lives: u32,
    /// Game time elapsed while playing, in milliseconds.
    pub clock_ms: u64,
    pub frame: u64,
    pub status: GameStatus,
}
