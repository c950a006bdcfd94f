//! Fixed timestep simulation tick
//!
//! Order within a Playing tick is fixed and observable:
//! jump intent → platforms move (carrying the jelly) → jelly physics →
//! world scroll → landing → scoring → recycle → fall-out check.
//! Cosmetics advance every tick in every phase.

use glam::Vec2;

use super::collision;
use super::effects;
use super::events::GameEvent;
use super::spawn;
use super::state::{FEVER_COLOR, GamePhase, GameState, JELLY_COLOR};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested since the last tick (key, click or tap)
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if state.phase == GamePhase::Playing {
        if input.jump {
            try_jump(state);
        }
        step_physics(state);
    }

    effects::update(state);
}

/// Spend a jump if one is left; silently ignored otherwise
fn try_jump(state: &mut GameState) {
    let double = state.actor.jumps > 0;
    let (first, second) = (state.tuning.jump_force, state.tuning.double_jump_force);
    if !state.actor.jump(first, second) {
        return;
    }

    state.events.push(GameEvent::Jump { double });
    let feet = Vec2::new(state.actor.pos.x, state.actor.bottom());
    let color = state.actor.color;
    effects::puff(state, feet, color);
}

fn step_physics(state: &mut GameState) {
    let multiplier = state.speed_multiplier();
    let width = state.viewport.width;

    // 1. Platforms slide, carrying the jelly, and bounce off the walls
    for platform in &mut state.platforms {
        if !platform.is_moving() {
            continue;
        }
        let dx = platform.vel_x * multiplier;
        platform.pos.x += dx;
        if state.actor.resting_on == Some(platform.id) {
            state.actor.pos.x += dx;
        }

        if platform.pos.x < 0.0 {
            platform.pos.x = 0.0;
            platform.vel_x = -platform.vel_x;
        } else if platform.right() > width {
            platform.pos.x = width - platform.width;
            platform.vel_x = -platform.vel_x;
        }
    }

    // 2. Jelly
    let mut prev_bottom = state.actor.bottom();
    state.actor.update(&state.platforms, &state.tuning);

    // 3. World scroll
    let overshoot = world_scroll(state);
    prev_bottom += overshoot;

    // 4. Landing
    if let Some(index) =
        collision::find_landing(&state.actor, prev_bottom, &state.platforms, &state.tuning)
    {
        land(state, index);
    }

    spawn::recycle(state);

    // 5. Fall-out
    if state.actor.pos.y > state.viewport.height + state.tuning.fall_margin {
        game_over(state);
    }
}

/// Keep the jelly below the scroll line by moving the world down instead
///
/// Returns how far the world moved this step.
fn world_scroll(state: &mut GameState) -> f32 {
    let threshold = state.viewport.height * state.tuning.scroll_fraction;
    if state.actor.pos.y >= threshold {
        return 0.0;
    }

    let overshoot = threshold - state.actor.pos.y;
    state.actor.pos.y = threshold;
    for platform in &mut state.platforms {
        platform.pos.y += overshoot;
    }
    effects::scroll(state, overshoot);
    overshoot
}

fn land(state: &mut GameState, index: usize) {
    state.actor.land(&state.platforms[index]);
    state.events.push(GameEvent::Land);

    let platform = &mut state.platforms[index];
    if platform.landed_on {
        return;
    }
    platform.landed_on = true;
    let platform_id = platform.id;

    let perfect = collision::is_perfect(
        &state.actor,
        &state.platforms[index],
        state.tuning.perfect_tolerance,
    );
    let outcome = state
        .score
        .register_landing(perfect, state.tuning.fever_threshold);
    log::debug!(
        "Landed on platform {} (perfect={}, raw={}, streak={})",
        platform_id,
        perfect,
        state.score.raw,
        state.score.streak
    );

    let feet = Vec2::new(state.actor.pos.x, state.actor.bottom());
    let head = state.actor.pos - Vec2::new(0.0, state.actor.size);

    if outcome.perfect {
        let color = state.actor.color;
        state.platforms[index].color = color;
        state.events.push(GameEvent::Perfect {
            streak: state.score.streak,
        });
        effects::burst(state, feet, color, 24, 6.0);
        effects::popup(state, "PERFECT!", head, color);
        effects::shake(state, 0.3);
    }

    if outcome.entered_fever {
        log::info!("Fever! streak={}", state.score.streak);
        state.actor.color = FEVER_COLOR;
        state.events.push(GameEvent::FeverStart);
        let text = format!("FEVER x{}", state.tuning.fever_multiplier);
        effects::popup(state, text, head - Vec2::new(0.0, 24.0), FEVER_COLOR);
        let center = state.actor.pos;
        effects::burst(state, center, FEVER_COLOR, 40, 8.0);
    } else if state.score.fever {
        let text = format!("+{}", state.tuning.fever_multiplier);
        effects::popup(state, text, head - Vec2::new(0.0, 24.0), FEVER_COLOR);
    }

    if outcome.left_fever {
        log::info!("Fever over");
        state.actor.color = JELLY_COLOR;
    }
}

fn game_over(state: &mut GameState) {
    log::info!(
        "Game over: score={} best_streak={}",
        state.score.displayed(state.tuning.fever_multiplier),
        state.score.best_streak
    );
    state.phase = GamePhase::GameOver;
    state.score.end_run(state.tuning.fever_multiplier);
    state.actor.resting_on = None;
    state.actor.color = JELLY_COLOR;
    state.events.push(GameEvent::Shatter);

    // Burst along the bottom edge where the jelly left the screen
    let origin = Vec2::new(state.actor.pos.x, state.viewport.height - 10.0);
    effects::burst(state, origin, JELLY_COLOR, 60, 10.0);
    state.screen_shake = 1.0;
}
