//! Platform spawning and recycling
//!
//! The active sequence keeps a constant length: every platform that scrolls
//! out the bottom is replaced by exactly one new platform above the topmost.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Actor, GameState, PLATFORM_PALETTE, Platform};
use crate::tuning::Tuning;

/// Roll a new platform with its surface at `y`
///
/// Width, x, color and speed are sampled uniformly; the speed sign is a coin
/// flip, so a platform is only static when the magnitude rolls exactly 0.
pub fn spawn_platform(
    rng: &mut Pcg32,
    id: u32,
    y: f32,
    viewport_width: f32,
    tuning: &Tuning,
) -> Platform {
    let width = rng.random_range(tuning.platform_min_width..=tuning.platform_max_width);
    let max_x = (viewport_width - width).max(0.0);
    let x = rng.random_range(0.0..=max_x);
    let color = PLATFORM_PALETTE[rng.random_range(0..PLATFORM_PALETTE.len())];
    let speed = rng.random_range(tuning.platform_min_speed..=tuning.platform_max_speed);
    let vel_x = if rng.random_bool(0.5) { speed } else { -speed };

    Platform {
        id,
        pos: Vec2::new(x, y),
        width,
        height: tuning.platform_height,
        vel_x,
        landed_on: false,
        color,
    }
}

/// Base platform plus `platform_count` platforms above it, jelly standing on the base
pub fn initial_layout(state: &mut GameState) {
    let tuning = state.tuning.clone();
    let viewport = state.viewport;
    state.platforms.clear();

    let base_y = viewport.height - tuning.base_platform_offset;
    let base = Platform {
        id: state.next_entity_id(),
        pos: Vec2::new((viewport.width - tuning.base_platform_width) / 2.0, base_y),
        width: tuning.base_platform_width,
        height: tuning.platform_height,
        vel_x: 0.0,
        // Standing start, never scores
        landed_on: true,
        color: PLATFORM_PALETTE[0],
    };

    let mut actor = Actor::new(Vec2::new(base.center_x(), 0.0), tuning.actor_size);
    actor.land(&base);
    actor.scale = Vec2::ONE;
    state.actor = actor;
    state.platforms.push(base);

    for i in 1..=tuning.platform_count {
        let y = base_y - i as f32 * tuning.platform_spacing;
        let id = state.next_entity_id();
        let platform = spawn_platform(&mut state.rng, id, y, viewport.width, &tuning);
        state.platforms.push(platform);
    }
}

/// Replace platforms that fell below the recycle line
///
/// Returns how many were recycled. Clearing the jelly's `resting_on` happens
/// in the same step as the removal so it never names a missing platform.
pub fn recycle(state: &mut GameState) -> usize {
    let limit = state.viewport.height + state.tuning.recycle_margin;
    let mut recycled = 0;

    for _ in 0..state.platforms.len() {
        let Some(oldest) = state.platforms.first() else {
            break;
        };
        if oldest.pos.y <= limit {
            break;
        }

        let removed = state.platforms.remove(0);
        if state.actor.resting_on == Some(removed.id) {
            state.actor.resting_on = None;
        }

        let top_y = state
            .platforms
            .last()
            .map_or(removed.pos.y, |p| p.pos.y);
        let id = state.next_entity_id();
        let platform = spawn_platform(
            &mut state.rng,
            id,
            top_y - state.tuning.platform_spacing,
            state.viewport.width,
            &state.tuning,
        );
        log::debug!(
            "Recycled platform {} -> spawned {} at y={:.1}",
            removed.id,
            platform.id,
            platform.pos.y
        );
        state.platforms.push(platform);
        recycled += 1;
    }

    recycled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Viewport;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_within_bounds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..500 {
            let p = spawn_platform(&mut rng, id, 100.0, DEFAULT_VIEWPORT_WIDTH, &tuning);
            assert!(p.width >= PLATFORM_MIN_WIDTH && p.width <= PLATFORM_MAX_WIDTH);
            assert!(p.pos.x >= 0.0);
            assert!(p.right() <= DEFAULT_VIEWPORT_WIDTH + 0.001);
            assert!(p.vel_x.abs() >= PLATFORM_MIN_SPEED && p.vel_x.abs() <= PLATFORM_MAX_SPEED);
            assert!(PLATFORM_PALETTE.contains(&p.color));
            assert!(!p.landed_on);
        }
    }

    #[test]
    fn test_spawn_both_directions() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let velocities: Vec<f32> = (0..100)
            .map(|id| spawn_platform(&mut rng, id, 0.0, DEFAULT_VIEWPORT_WIDTH, &tuning).vel_x)
            .collect();
        assert!(velocities.iter().any(|v| *v > 0.0));
        assert!(velocities.iter().any(|v| *v < 0.0));
    }

    #[test]
    fn test_zero_speed_range_is_static() {
        let tuning = Tuning {
            platform_min_speed: 0.0,
            platform_max_speed: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let p = spawn_platform(&mut rng, 1, 0.0, DEFAULT_VIEWPORT_WIDTH, &tuning);
        assert!(!p.is_moving());
    }

    #[test]
    fn test_initial_layout_spacing() {
        let state = GameState::new(5, Tuning::default(), Viewport::default());
        let base = &state.platforms[0];
        assert_eq!(base.width, BASE_PLATFORM_WIDTH);
        assert!(!base.is_moving());
        assert!(base.landed_on);
        assert_eq!(state.actor.resting_on, Some(base.id));
        assert_eq!(state.actor.pos.x, base.center_x());

        for pair in state.platforms.windows(2) {
            assert!((pair[0].pos.y - pair[1].pos.y - PLATFORM_SPACING).abs() < 0.001);
        }
    }

    #[test]
    fn test_recycle_keeps_length_and_spacing() {
        let mut state = GameState::new(9, Tuning::default(), Viewport::default());
        let len = state.platforms.len();
        let top_before = state.platforms.last().unwrap().pos.y;

        // Push the bottom two platforms past the recycle line
        for p in &mut state.platforms {
            p.pos.y += 2.0 * PLATFORM_SPACING + RECYCLE_MARGIN + 1.0;
        }
        let top_shifted = top_before + 2.0 * PLATFORM_SPACING + RECYCLE_MARGIN + 1.0;

        let recycled = recycle(&mut state);
        assert_eq!(recycled, 2);
        assert_eq!(state.platforms.len(), len);

        let top = state.platforms.last().unwrap().pos.y;
        assert!((top - (top_shifted - 2.0 * PLATFORM_SPACING)).abs() < 0.001);
    }

    #[test]
    fn test_recycle_clears_resting_reference() {
        let mut state = GameState::new(9, Tuning::default(), Viewport::default());
        let base_id = state.platforms[0].id;
        assert_eq!(state.actor.resting_on, Some(base_id));

        state.platforms[0].pos.y = state.viewport.height + RECYCLE_MARGIN + 1.0;
        recycle(&mut state);
        assert!(state.actor.resting_on.is_none());
        assert!(state.platforms.iter().all(|p| p.id != base_id));
    }
}
