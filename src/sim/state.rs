//! Game state and core simulation types
//!
//! Screen coordinates throughout: x grows right, y grows down. The jelly's
//! position is its center; a platform's position is its top-left corner, so
//! `platform.pos.y` is the surface the jelly stands on.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::scoring::ScoreState;
use super::spawn;
use crate::consts::MAX_JUMPS;
use crate::tuning::Tuning;

/// RGBA color, linear 0-1
pub type Rgba = [f32; 4];

/// Platform colors, picked uniformly at spawn
pub const PLATFORM_PALETTE: [Rgba; 6] = [
    [0.96, 0.36, 0.45, 1.0], // strawberry
    [0.99, 0.72, 0.25, 1.0], // mango
    [0.45, 0.85, 0.55, 1.0], // lime
    [0.35, 0.70, 0.98, 1.0], // blueberry
    [0.72, 0.52, 0.98, 1.0], // grape
    [0.98, 0.55, 0.80, 1.0], // bubblegum
];

/// Jelly body color
pub const JELLY_COLOR: Rgba = [0.30, 0.95, 0.85, 1.0];
/// Jelly body color while fever is active
pub const FEVER_COLOR: Rgba = [1.0, 0.45, 0.15, 1.0];

/// Vertical speed above which the velocity stretch overrides the idle wobble
const STRETCH_SPEED_THRESHOLD: f32 = 1.0;
/// Per-step damping of the squash/stretch back toward 1
const SCALE_DAMPING: f32 = 0.85;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Jelly fell out, simulation frozen until restart
    GameOver,
}

/// Logical viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_VIEWPORT_WIDTH,
            crate::consts::DEFAULT_VIEWPORT_HEIGHT,
        )
    }
}

/// The player's jelly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Edge length of the (unsquashed) body
    pub size: f32,
    /// Jumps used since the last landing (0..=2)
    pub jumps: u8,
    /// Id of the platform the jelly stands on
    pub resting_on: Option<u32>,
    /// Cosmetic squash/stretch, (1, 1) at rest
    pub scale: Vec2,
    pub color: Rgba,
    /// Phase of the idle wobble
    #[serde(default)]
    pub wobble_time: f32,
}

impl Actor {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            jumps: 0,
            resting_on: None,
            scale: Vec2::ONE,
            color: JELLY_COLOR,
            wobble_time: 0.0,
        }
    }

    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Y of the jelly's lowest edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_size()
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.resting_on.is_none()
    }

    /// Try to jump with the given impulses
    ///
    /// The first jump since landing uses `first_force`, the second uses
    /// `double_force`. Returns false (and changes nothing) once both are spent.
    pub fn jump(&mut self, first_force: f32, double_force: f32) -> bool {
        if self.jumps >= MAX_JUMPS {
            return false;
        }
        let force = if self.jumps == 0 {
            first_force
        } else {
            double_force
        };
        self.resting_on = None;
        self.vel.y = force;
        self.jumps += 1;
        self.scale = Vec2::new(0.7, 1.35);
        true
    }

    /// Attach to a platform and snap onto its surface
    pub fn land(&mut self, platform: &Platform) {
        self.resting_on = Some(platform.id);
        self.vel.y = 0.0;
        self.jumps = 0;
        self.pos.y = platform.pos.y - self.half_size();
        self.scale = Vec2::new(1.4, 0.6);
    }

    /// Advance one step
    ///
    /// Airborne: gravity then integration. Resting: pinned to the platform
    /// surface, slipping off once the center leaves the platform span by more
    /// than `detach_tolerance`.
    pub fn update(&mut self, platforms: &[Platform], tuning: &Tuning) {
        match self.resting_on {
            Some(id) => match platforms.iter().find(|p| p.id == id) {
                Some(platform) => {
                    self.vel.y = 0.0;
                    self.pos.y = platform.pos.y - self.half_size();
                    let tol = tuning.detach_tolerance;
                    if self.pos.x < platform.pos.x - tol || self.pos.x > platform.right() + tol {
                        log::debug!("Jelly slipped off platform {}", id);
                        self.resting_on = None;
                    }
                }
                None => self.resting_on = None,
            },
            None => {
                self.vel.y += tuning.gravity;
                self.pos += self.vel;
            }
        }

        self.update_cosmetics();
    }

    /// Squash/stretch animation. Never read by physics or scoring.
    fn update_cosmetics(&mut self) {
        self.wobble_time += 0.1;
        let speed = self.vel.y.abs();
        if self.is_airborne() && speed > STRETCH_SPEED_THRESHOLD {
            let stretch = (1.0 + speed * 0.02).min(1.3);
            self.scale = Vec2::new(1.0 / stretch, stretch);
        } else {
            let idle = self.wobble_time.sin() * 0.02;
            let target = Vec2::new(1.0 + idle, 1.0 - idle);
            self.scale = target + (self.scale - target) * SCALE_DAMPING;
        }
    }
}

/// A horizontal platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner; `pos.y` is the walkable surface
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed (px/step), 0 for static platforms
    pub vel_x: f32,
    /// Set on the first landing only
    pub landed_on: bool,
    pub color: Rgba,
}

impl Platform {
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel_x != 0.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    /// 0-1, removed at 0
    pub life: f32,
    /// Life lost per step
    pub decay: f32,
    pub size: f32,
}

impl Particle {
    /// Advance one step, returns false once expired
    pub fn update(&mut self) -> bool {
        self.vel.y += 0.15;
        self.vel *= 0.98;
        self.pos += self.vel;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Rising text popup ("PERFECT!", "+2", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub vel_y: f32,
    pub color: Rgba,
    pub life: f32,
}

impl FloatingText {
    pub fn new(text: impl Into<String>, pos: Vec2, color: Rgba) -> Self {
        Self {
            text: text.into(),
            pos,
            vel_y: -1.5,
            color,
            life: 1.0,
        }
    }

    /// Advance one step, returns false once expired
    pub fn update(&mut self) -> bool {
        self.pos.y += self.vel_y;
        self.vel_y *= 0.96;
        self.life -= 0.02;
        self.life > 0.0
    }
}

/// Complete game state
///
/// Owned and mutated only by the simulation driver; everything else reads it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (platform layout)
    pub rng: Pcg32,
    /// Cosmetic RNG, kept apart so effects never shift the layout
    pub fx_rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub actor: Actor,
    /// Active platforms, oldest (bottom-most) first
    pub platforms: Vec<Platform>,
    pub score: ScoreState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    /// Screen shake intensity (0-1)
    pub screen_shake: f32,
    /// Cosmetic/audio events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state in the Start phase with the initial layout in place
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            actor: Actor::new(Vec2::ZERO, tuning.actor_size),
            tuning,
            viewport,
            phase: GamePhase::Start,
            platforms: Vec::new(),
            score: ScoreState::default(),
            time_ticks: 0,
            particles: Vec::new(),
            texts: Vec::new(),
            screen_shake: 0.0,
            events: Vec::new(),
            next_id: 1,
        };
        spawn::initial_layout(&mut state);
        state
    }

    /// Reset everything a run owns, keeping tuning and viewport
    ///
    /// Used for both the first start and every restart, so a restart with
    /// the same seed reproduces a fresh game exactly.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.fx_rng = Pcg32::seed_from_u64(self.seed ^ 0x9e37_79b9_7f4a_7c15);
        self.score = ScoreState::default();
        self.time_ticks = 0;
        self.particles.clear();
        self.texts.clear();
        self.screen_shake = 0.0;
        self.events.clear();
        self.next_id = 1;
        self.actor = Actor::new(Vec2::ZERO, self.tuning.actor_size);
        spawn::initial_layout(self);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Platform the jelly currently stands on
    pub fn resting_platform(&self) -> Option<&Platform> {
        let id = self.actor.resting_on?;
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Platform speed factor, grows linearly with raw score
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + self.score.raw as f32 * self.tuning.speed_growth_per_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn platform_at(id: u32, x: f32, y: f32, width: f32) -> Platform {
        Platform {
            id,
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_HEIGHT,
            vel_x: 0.0,
            landed_on: false,
            color: PLATFORM_PALETTE[0],
        }
    }

    #[test]
    fn test_jump_sequence() {
        let mut actor = Actor::new(Vec2::new(100.0, 100.0), ACTOR_SIZE);
        assert_eq!(actor.jumps, 0);

        assert!(actor.jump(JUMP_FORCE, DOUBLE_JUMP_FORCE));
        assert_eq!(actor.jumps, 1);
        assert_eq!(actor.vel.y, JUMP_FORCE);

        assert!(actor.jump(JUMP_FORCE, DOUBLE_JUMP_FORCE));
        assert_eq!(actor.jumps, 2);
        assert_eq!(actor.vel.y, DOUBLE_JUMP_FORCE);

        actor.vel.y = 3.0;
        assert!(!actor.jump(JUMP_FORCE, DOUBLE_JUMP_FORCE));
        assert_eq!(actor.jumps, 2);
        assert_eq!(actor.vel.y, 3.0);
    }

    #[test]
    fn test_jump_detaches() {
        let platform = platform_at(7, 50.0, 200.0, 100.0);
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), ACTOR_SIZE);
        actor.land(&platform);
        assert_eq!(actor.resting_on, Some(7));

        assert!(actor.jump(JUMP_FORCE, DOUBLE_JUMP_FORCE));
        assert!(actor.is_airborne());
    }

    #[test]
    fn test_land_snaps_and_resets() {
        let platform = platform_at(3, 50.0, 200.0, 100.0);
        let mut actor = Actor::new(Vec2::new(100.0, 190.0), ACTOR_SIZE);
        actor.jumps = 2;
        actor.vel.y = 6.0;

        actor.land(&platform);
        assert_eq!(actor.resting_on, Some(3));
        assert_eq!(actor.jumps, 0);
        assert_eq!(actor.vel.y, 0.0);
        assert_eq!(actor.bottom(), 200.0);
    }

    #[test]
    fn test_airborne_gravity() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::new(100.0, 100.0), ACTOR_SIZE);
        actor.update(&[], &tuning);
        assert_eq!(actor.vel.y, GRAVITY);
        assert_eq!(actor.pos.y, 100.0 + GRAVITY);
    }

    #[test]
    fn test_resting_pins_to_surface() {
        let tuning = Tuning::default();
        let mut platform = platform_at(1, 50.0, 300.0, 100.0);
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), ACTOR_SIZE);
        actor.land(&platform);

        platform.pos.y += 12.0;
        actor.update(std::slice::from_ref(&platform), &tuning);
        assert_eq!(actor.resting_on, Some(1));
        assert_eq!(actor.vel.y, 0.0);
        assert_eq!(actor.pos.y, 312.0 - ACTOR_SIZE / 2.0);
    }

    #[test]
    fn test_slips_off_edge() {
        let tuning = Tuning::default();
        let platform = platform_at(1, 50.0, 300.0, 100.0);
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), ACTOR_SIZE);
        actor.land(&platform);

        // Within tolerance: still standing
        actor.pos.x = 154.0;
        actor.update(std::slice::from_ref(&platform), &tuning);
        assert_eq!(actor.resting_on, Some(1));

        // Beyond tolerance: falls
        actor.pos.x = 156.0;
        actor.update(std::slice::from_ref(&platform), &tuning);
        assert!(actor.is_airborne());
    }

    #[test]
    fn test_missing_platform_detaches() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), ACTOR_SIZE);
        actor.resting_on = Some(42);
        actor.update(&[], &tuning);
        assert!(actor.is_airborne());
    }

    #[test]
    fn test_cosmetics_relax_toward_one() {
        let tuning = Tuning::default();
        let platform = platform_at(1, 50.0, 300.0, 100.0);
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), ACTOR_SIZE);
        actor.land(&platform);
        for _ in 0..60 {
            actor.update(std::slice::from_ref(&platform), &tuning);
        }
        assert!((actor.scale.x - 1.0).abs() < 0.05);
        assert!((actor.scale.y - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_particle_expires() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            color: JELLY_COLOR,
            life: 1.0,
            decay: 0.25,
            size: 3.0,
        };
        assert!(p.update());
        assert!(p.update());
        assert!(p.update());
        assert!(!p.update());
    }

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(1, Tuning::default(), Viewport::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.platforms.len(), PLATFORM_COUNT + 1);
        let base = state.resting_platform().expect("starts on the base platform");
        assert_eq!(base.id, state.platforms[0].id);
    }
}
