//! Level progression table.

#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub number: u32,
    pub name: &'static str,
    /// Kills needed to clear the level.
    pub enemies_required: u32,
    /// Game time between enemy spawns.
    pub spawn_rate_ms: u64,
    pub boss_level: bool,
    /// Scales enemy size, health, speed and the odds of tougher archetypes.
    pub difficulty: f32,
}

pub const FINAL_LEVEL: u32 = 6;

/// Pause between a cleared level and the next one.
pub const LEVEL_TRANSITION_MS: u64 = 3000;

static LEVELS: [LevelConfig; FINAL_LEVEL as usize] = [
    LevelConfig {
        number: 1,
        name: "Asteroid Belt",
        enemies_required: 25,
        spawn_rate_ms: 1200,
        boss_level: false,
        difficulty: 1.0,
    },
    LevelConfig {
        number: 2,
        name: "Enemy Scouts",
        enemies_required: 40,
        spawn_rate_ms: 900,
        boss_level: false,
        difficulty: 1.3,
    },
    LevelConfig {
        number: 3,
        name: "Fighter Squadron",
        enemies_required: 55,
        spawn_rate_ms: 700,
        boss_level: false,
        difficulty: 1.6,
    },
    LevelConfig {
        number: 4,
        name: "Heavy Assault",
        enemies_required: 70,
        spawn_rate_ms: 550,
        boss_level: false,
        difficulty: 1.9,
    },
    LevelConfig {
        number: 5,
        name: "Elite Forces",
        enemies_required: 85,
        spawn_rate_ms: 400,
        boss_level: false,
        difficulty: 2.2,
    },
    LevelConfig {
        number: 6,
        name: "FINAL BOSS",
        enemies_required: 1,
        spawn_rate_ms: 5000,
        boss_level: true,
        difficulty: 3.0,
    },
];

/// Look up a 1-based level number.
pub fn level_config(level: u32) -> Option<&'static LevelConfig> {
    level
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i as usize))
}

/// Like [`level_config`], but clamps out-of-range numbers into the table.
pub fn level_config_clamped(level: u32) -> &'static LevelConfig {
    let i = level.clamp(1, FINAL_LEVEL) as usize - 1;
    &LEVELS[i]
}
