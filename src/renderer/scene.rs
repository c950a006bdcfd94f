//! Scene assembly: game state in, colored triangles out
//!
//! Pure function of the state and settings so the frontend can call it once
//! per display frame without touching the simulation.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Actor, GameState, Particle, Platform};

/// Peak shake offset in game pixels
const SHAKE_PIXELS: f32 = 8.0;
/// Height of one background stripe
const BAND_HEIGHT: f32 = 80.0;

/// Build every vertex for one frame, back to front
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let offset = shake_offset(state, settings);
    let segments = settings.quality.circle_segments();

    let mut vertices = Vec::with_capacity(
        64 + state.platforms.len() * 12 + state.particles.len() * segments as usize * 3,
    );

    background(&mut vertices, state);
    for platform in &state.platforms {
        platform_quad(&mut vertices, platform, offset);
    }
    jelly(&mut vertices, &state.actor, offset, segments);
    if settings.particles {
        for particle in &state.particles {
            particle_dot(&mut vertices, particle, offset);
        }
    }

    vertices
}

/// Deterministic jitter from the tick count, scaled by the current shake
pub fn shake_offset(state: &GameState, settings: &Settings) -> Vec2 {
    if !settings.effective_screen_shake() || state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    let t = state.time_ticks as f32;
    Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * state.screen_shake * SHAKE_PIXELS
}

fn background(out: &mut Vec<Vertex>, state: &GameState) {
    let vp = state.viewport;
    let mut y = 0.0;
    let mut band = 0;
    while y < vp.height {
        if band % 2 == 1 {
            out.extend(shapes::rect(
                Vec2::new(0.0, y),
                Vec2::new(vp.width, BAND_HEIGHT),
                colors::BACKGROUND_BAND,
            ));
        }
        y += BAND_HEIGHT;
        band += 1;
    }
}

fn platform_quad(out: &mut Vec<Vertex>, platform: &Platform, offset: Vec2) {
    let top_left = platform.pos + offset;
    out.extend(shapes::rect(
        top_left,
        Vec2::new(platform.width, platform.height),
        platform.color,
    ));
    // Underside shade
    let shade = platform.height * 0.35;
    out.extend(shapes::rect(
        top_left + Vec2::new(0.0, platform.height - shade),
        Vec2::new(platform.width, shade),
        colors::PLATFORM_SHADE,
    ));
}

fn jelly(out: &mut Vec<Vertex>, actor: &Actor, offset: Vec2, segments: u32) {
    let center = actor.pos + offset;
    out.extend(shapes::jelly_body(
        center,
        actor.size,
        actor.scale,
        actor.color,
        segments,
    ));

    // Face follows the squashed body
    let w = actor.size * actor.scale.x;
    let h = actor.size * actor.scale.y;
    let base = center.y + actor.size * 0.5;
    let body_center = Vec2::new(center.x, base - h * 0.5);

    out.extend(shapes::ellipse(
        body_center + Vec2::new(-w * 0.2, -h * 0.25),
        Vec2::new(w * 0.12, h * 0.08),
        colors::JELLY_SHINE,
        segments,
    ));
    for side in [-1.0, 1.0] {
        out.extend(shapes::circle(
            body_center + Vec2::new(side * w * 0.18, -h * 0.02),
            actor.size * 0.07,
            colors::JELLY_EYE,
            segments.min(12),
        ));
    }
}

fn particle_dot(out: &mut Vec<Vertex>, particle: &Particle, offset: Vec2) {
    let mut color = particle.color;
    color[3] *= particle.life.clamp(0.0, 1.0);
    let size = particle.size * particle.life.clamp(0.2, 1.0);
    out.extend(shapes::rect(
        particle.pos + offset - Vec2::splat(size * 0.5),
        Vec2::splat(size),
        color,
    ));
}
