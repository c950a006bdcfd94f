//! Jelly Jump - A one-button platform hopper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, landings, combo/fever scoring, game phase)
//! - `tuning`: Data-driven game balance
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences
//! - `highscores`: Local leaderboard
//! - `audio`: Procedural Web Audio effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Every gameplay quantity is expressed per fixed simulation step. The driver
/// converts wall-clock frame time into a whole number of steps, so none of
/// these values depend on the display refresh rate.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest wall-clock frame delta we are willing to simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport (CSS pixels)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 400.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 700.0;

    /// Downward acceleration (px/step²)
    pub const GRAVITY: f32 = 0.5;
    /// First jump impulse (negative = up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Double jump impulse, weaker than the first
    pub const DOUBLE_JUMP_FORCE: f32 = -10.0;
    /// Jumps available before landing again
    pub const MAX_JUMPS: u8 = 2;

    /// Jelly edge length
    pub const ACTOR_SIZE: f32 = 30.0;
    /// Fraction of the jelly half-width used for landing overlap
    pub const HITBOX_SCALE: f32 = 0.6;
    /// How far the jelly may hang off a platform edge before it slips off
    pub const DETACH_TOLERANCE: f32 = 5.0;

    /// Platform geometry
    pub const PLATFORM_HEIGHT: f32 = 14.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 70.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 130.0;
    pub const BASE_PLATFORM_WIDTH: f32 = 200.0;
    /// Base platform top surface, measured up from the viewport bottom
    pub const BASE_PLATFORM_OFFSET: f32 = 120.0;
    /// Vertical distance between consecutive platforms at spawn time
    pub const PLATFORM_SPACING: f32 = 120.0;
    /// Platforms spawned above the base platform at game start
    pub const PLATFORM_COUNT: usize = 5;
    /// Horizontal speed range (px/step), sign chosen 50/50
    pub const PLATFORM_MIN_SPEED: f32 = 1.0;
    pub const PLATFORM_MAX_SPEED: f32 = 2.5;
    /// Platform speed grows by this much per point of raw score
    pub const SPEED_GROWTH_PER_POINT: f32 = 0.02;

    /// Platforms below `height + RECYCLE_MARGIN` get recycled
    pub const RECYCLE_MARGIN: f32 = 50.0;
    /// The jelly is lost below `height + FALL_MARGIN`
    pub const FALL_MARGIN: f32 = 100.0;
    /// World scrolls once the jelly rises above this fraction of the height
    pub const SCROLL_FRACTION: f32 = 0.6;

    /// Extra depth below a platform surface that still counts as a landing
    pub const LANDING_FORGIVENESS: f32 = 15.0;
    /// Max distance from platform center for a perfect landing
    pub const PERFECT_TOLERANCE: f32 = 15.0;
    /// Consecutive perfects needed for fever
    pub const FEVER_THRESHOLD: u32 = 3;
    /// Score multiplier while fever is active
    pub const FEVER_MULTIPLIER: u64 = 2;

    /// Cosmetic particle cap
    pub const MAX_PARTICLES: usize = 300;
}
