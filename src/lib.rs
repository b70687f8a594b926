//! Flying Words - an arcade vocabulary drill
//!
//! Core modules:
//! - `sim`: Simulation (entities, targeting, spawning, progression)
//! - `session`: Start/stop/pause lifecycle driving the simulation each frame
//! - `deck`: Cards, groups ("levels") and level scopes
//! - `view`: Presentation snapshot and DOM renderer
//! - `audio`: Procedural sound effects
//! - `settings`: Player preferences

pub mod audio;
pub mod deck;
pub mod deferred;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

pub use deck::{Card, Deck, GroupSource, LevelScope};
pub use session::{Session, SessionOutcome, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Base time between word spawns at speed 1
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Spawn interval never drops below this, whatever the speed
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 300.0;
    /// Speed setting bounds
    pub const MIN_SPEED: u8 = 1;
    pub const MAX_SPEED: u8 = 10;
    /// Multiplier gained per speed step above 1
    pub const SPEED_STEP: f32 = 0.11;

    /// Cards per group ("level")
    pub const GROUP_SIZE: usize = 5;

    /// Default playfield size (pixels)
    pub const DEFAULT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_HEIGHT: f32 = 720.0;
    /// Vertical margins kept clear for the score panel and input bar
    pub const SAFE_TOP: f32 = 120.0;
    pub const SAFE_BOTTOM: f32 = 120.0;

    /// Plane defaults - the plane never leaves this column
    pub const PLANE_X: f32 = 100.0;
    /// Projectiles leave the plane this far ahead of its centre
    pub const MUZZLE_OFFSET: f32 = 20.0;
    /// Fraction of the remaining distance covered per tick
    pub const PLANE_EASING: f32 = 0.1;
    pub const TILT_EASING: f32 = 0.1;
    /// Tilt is held while the plane is further than this from its target
    pub const TILT_HOLD_DISTANCE: f32 = 5.0;
    /// Degrees
    pub const MAX_TILT: f32 = 20.0;

    /// Idle wander re-targets at most once per this interval
    pub const WANDER_INTERVAL_MS: f64 = 1000.0;
    /// Half-range of an idle wander step
    pub const WANDER_RANGE: f32 = 200.0;

    /// Word travel speed at speed 1 (pixels per tick)
    pub const WORD_SPEED_BASE: f32 = 1.5;
    /// Words spawn this far past the right edge
    pub const WORD_SPAWN_OFFSET: f32 = 100.0;
    /// Words past this x are removed (solved words drifting off-screen)
    pub const WORD_DESPAWN_X: f32 = -100.0;

    /// Projectile speed (pixels per tick), also the hit radius
    pub const PROJECTILE_SPEED: f32 = 15.0;

    /// Particles spawned by a word explosion
    pub const EXPLOSION_PARTICLES: usize = 20;
    /// Chance per tick of a new wind streak
    pub const WIND_SPAWN_CHANCE: f32 = 0.3;
    /// Chance per tick of the plane leaving a trail puff
    pub const TRAIL_SPAWN_CHANCE: f32 = 0.5;
    /// Hit flash length in ticks (~60 ms at 60 Hz)
    pub const FLASH_TICKS: u8 = 4;

    /// Delay between a boundary breach and the game-over teardown
    pub const GAME_OVER_DELAY_MS: f64 = 500.0;
    /// Delay before the chime that follows an explosion
    pub const CHIME_DELAY_MS: f64 = 300.0;

    /// Nominal tick length used by the native demo clock
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Clamp a raw speed setting into the supported range
#[inline]
pub fn clamp_speed(raw: i32) -> u8 {
    raw.clamp(consts::MIN_SPEED as i32, consts::MAX_SPEED as i32) as u8
}

/// Multiplier applied to spawn rate and word speed for a speed setting
#[inline]
pub fn speed_multiplier(speed: u8) -> f32 {
    let speed = clamp_speed(speed as i32);
    1.0 + (speed - 1) as f32 * consts::SPEED_STEP
}
