//! Cosmetic particles, popup text and screen shake
//!
//! Nothing here feeds back into physics or scoring. Randomness comes from the
//! state's `fx_rng` so changing the particle cap never changes the layout.

use glam::Vec2;
use rand::Rng;

use super::state::{FloatingText, GameState, Particle, Rgba};

/// Spray `count` particles out of `origin`
pub fn burst(state: &mut GameState, origin: Vec2, color: Rgba, count: usize, speed: f32) {
    let cap = state.tuning.max_particles;
    for _ in 0..count {
        if state.particles.len() >= cap {
            break;
        }
        let angle = state.fx_rng.random_range(0.0..std::f32::consts::TAU);
        let magnitude = state.fx_rng.random_range(0.3..=1.0) * speed;
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * magnitude,
            color,
            life: 1.0,
            decay: state.fx_rng.random_range(0.015..=0.04),
            size: state.fx_rng.random_range(2.0..=5.0),
        });
    }
}

/// Small puff kicked downward (jumps)
pub fn puff(state: &mut GameState, origin: Vec2, color: Rgba) {
    let cap = state.tuning.max_particles;
    for _ in 0..6 {
        if state.particles.len() >= cap {
            break;
        }
        let vx = state.fx_rng.random_range(-2.0..=2.0);
        let vy = state.fx_rng.random_range(0.5..=2.0);
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(vx, vy),
            color,
            life: 0.6,
            decay: 0.04,
            size: 2.5,
        });
    }
}

/// Rising popup text
pub fn popup(state: &mut GameState, text: impl Into<String>, pos: Vec2, color: Rgba) {
    state.texts.push(FloatingText::new(text, pos, color));
}

/// Add to screen shake, saturating at 1
pub fn shake(state: &mut GameState, amount: f32) {
    state.screen_shake = (state.screen_shake + amount).min(1.0);
}

/// Advance every cosmetic entity one step and drop the expired ones
pub fn update(state: &mut GameState) {
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    state.particles.retain_mut(Particle::update);
    state.texts.retain_mut(FloatingText::update);
}

/// Move cosmetics along with a world scroll so they stay put relative to platforms
pub fn scroll(state: &mut GameState, dy: f32) {
    for p in &mut state.particles {
        p.pos.y += dy;
    }
    for t in &mut state.texts {
        t.pos.y += dy;
    }
}
