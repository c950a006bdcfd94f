//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platforms oldest first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod driver;
pub mod effects;
pub mod events;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{crossed_surface, find_landing, is_perfect};
pub use driver::Simulation;
pub use events::{GameEvent, Notification, Observer};
pub use scoring::{LandingOutcome, ScoreState};
pub use spawn::{initial_layout, recycle, spawn_platform};
pub use state::{
    Actor, FloatingText, GamePhase, GameState, Particle, Platform, Rgba, Viewport, FEVER_COLOR,
    JELLY_COLOR, PLATFORM_PALETTE,
};
pub use tick::{TickInput, tick};
