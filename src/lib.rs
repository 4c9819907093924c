//! The Infinity Bounce - an endless vertical platform-bouncing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, platforms, collisions, session state)
//! - `renderer`: WebGPU rendering pipeline
//! - `input`: Held-key/touch input collection
//! - `layout`: Responsive canvas sizing
//! - `audio`: Sound capability interface and Web Audio backend

pub mod audio;
pub mod highscores;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use layout::Layout;
pub use settings::Settings;

/// Game configuration constants
///
/// Distances are in world units at scale 1.0 and velocities are per tick.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds of simulated time per tick
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Ball physics
    pub const GRAVITY: f32 = 0.72;
    pub const MOVE_SPEED: f32 = 10.0;
    /// Horizontal velocity multiplier per tick with no input held
    pub const HORIZONTAL_DECAY: f32 = 0.8;
    pub const BASE_JUMP_POWER: f32 = -16.0;
    pub const ROTATION_FACTOR: f32 = 0.05;
    pub const ROTATION_MIN_SPEED: f32 = 0.5;
    pub const BALL_SIZE: f32 = 48.0;

    /// Ball deformation animations (decay per tick)
    pub const WALL_SQUASH_DECAY: f32 = 0.9;
    pub const JUMP_ANIM_DECAY: f32 = 0.1;
    pub const BOUNCE_ANIM_DECAY: f32 = 0.15;

    /// Platform geometry
    pub const PLATFORM_HEIGHT: f32 = 25.0;
    pub const PLATFORM_GAP: f32 = 120.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 80.0;
    pub const PLATFORM_WIDTH_RANGE: f32 = 60.0;
    /// Platforms per archetype tier (and per scroll speed tier)
    pub const PLATFORMS_PER_TIER: u32 = 100;
    /// Every Nth platform carries a checkpoint marker
    pub const MARKER_INTERVAL: u32 = 10;
    pub const MARKER_BOX_SIZE: f32 = 45.0;
    /// Platforms generated when a session starts (plus the ground)
    pub const INITIAL_PLATFORMS: usize = 15;

    /// Session layout, measured up from the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 220.0;
    pub const BALL_START_OFFSET: f32 = 250.0;
    pub const PLATFORM_CURSOR_OFFSET: f32 = 200.0;
    /// Ball must be above this height (from the bottom) when jumping to start scrolling
    pub const SCROLL_START_OFFSET: f32 = 250.0;

    /// Landing tolerance band below a platform top
    pub const LANDING_TOLERANCE: f32 = 18.0;

    /// Camera scrolling
    pub const BASE_SCROLL_SPEED: f32 = 3.0;
    pub const SCROLL_TIER_GROWTH: f32 = 1.2;
    /// Generate when the topmost platform is this close to the viewport top
    pub const STREAM_AHEAD_MARGIN: f32 = 200.0;
    /// Evict platforms this far below the viewport bottom
    pub const EVICT_MARGIN: f32 = 100.0;
    /// Ball dies when its screen y goes above this much over the top
    pub const UPPER_DEATH_MARGIN: f32 = 100.0;

    /// Platform effects (seconds of continuous dwell)
    pub const SPIKE_ARM_SECS: f32 = 0.3;
    pub const SPIKE_KILL_SECS: f32 = 0.6;
    pub const GLASS_BREAK_SECS: f32 = 0.6;
    pub const GLASS_CRACK_SECS: f32 = 0.1;
    /// Ice drift reaches full strength after this long on the platform
    pub const SLIP_RAMP_SECS: f32 = 0.25;
    /// Random drift is `(r - SLIP_BIAS) * SLIP_STRENGTH`, so it leans rightward
    pub const SLIP_BIAS: f32 = 0.3;
    pub const SLIP_STRENGTH: f32 = 2.0;

    /// Scoring
    pub const BASE_PLATFORM_SCORE: u64 = 10;
    pub const COMBO_WINDOW_MS: f64 = 750.0;
    pub const BANNER_MS: f64 = 1000.0;

    /// Death
    pub const DYING_MS: f64 = 800.0;
    pub const DEATH_PARTICLES: usize = 40;
    pub const PARTICLE_SPREAD: f32 = 12.0;
    pub const PARTICLE_LIFT: f32 = 5.0;
    pub const PARTICLE_GRAVITY: f32 = 0.3;
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Touch buttons hold their direction this long
    pub const TOUCH_HOLD_MS: f64 = 100.0;
}

/// Nearest whole number of ticks for `ms` of simulated time
#[inline]
pub fn ms_to_ticks(ms: f64) -> u64 {
    (ms / consts::TICK_MS).round() as u64
}

/// Simulated milliseconds elapsed after `ticks` ticks
#[inline]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    ticks as f64 * consts::TICK_MS
}
