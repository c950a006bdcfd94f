//! Landing detection between the falling jelly and platforms
//!
//! Platforms are one-way: the jelly passes through them going up and only
//! lands while moving down. A landing needs the jelly's bottom edge to have
//! *crossed* the surface this step, not merely to overlap it, so fast falls
//! can't tunnel through thin platforms.

use super::state::{Actor, Platform};
use crate::tuning::Tuning;

/// Did the bottom edge cross `surface_y` between two steps?
///
/// `forgiveness` lets a bottom edge that was already slightly below the
/// surface last step still count, which absorbs the snap from scrolling and
/// moving platforms.
#[inline]
pub fn crossed_surface(prev_bottom: f32, bottom: f32, surface_y: f32, forgiveness: f32) -> bool {
    prev_bottom <= surface_y + forgiveness && bottom >= surface_y
}

/// Horizontal overlap between a narrowed hitbox centered on `x` and a platform
#[inline]
pub fn overlaps_horizontally(x: f32, hitbox_half_width: f32, platform: &Platform) -> bool {
    x + hitbox_half_width > platform.pos.x && x - hitbox_half_width < platform.right()
}

/// Index of the platform the jelly lands on this step, if any
///
/// Scans in sequence order (bottom to top) and stops at the first match. When
/// several platforms qualify at once the lowest one wins, not the nearest.
pub fn find_landing(
    actor: &Actor,
    prev_bottom: f32,
    platforms: &[Platform],
    tuning: &Tuning,
) -> Option<usize> {
    if !actor.is_airborne() || actor.vel.y <= 0.0 {
        return None;
    }

    let bottom = actor.bottom();
    let half_width = tuning.hitbox_half_width();
    platforms.iter().position(|platform| {
        crossed_surface(
            prev_bottom,
            bottom,
            platform.pos.y,
            tuning.landing_forgiveness,
        ) && overlaps_horizontally(actor.pos.x, half_width, platform)
    })
}

/// Horizontal distance from the jelly's center to the platform's center
#[inline]
pub fn center_offset(actor: &Actor, platform: &Platform) -> f32 {
    (actor.pos.x - platform.center_x()).abs()
}

/// Landed close enough to the center for a perfect?
#[inline]
pub fn is_perfect(actor: &Actor, platform: &Platform, tolerance: f32) -> bool {
    center_offset(actor, platform) < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::PLATFORM_PALETTE;
    use glam::Vec2;

    fn platform(id: u32, x: f32, y: f32, width: f32) -> Platform {
        Platform {
            id,
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_HEIGHT,
            vel_x: 0.0,
            landed_on: false,
            color: PLATFORM_PALETTE[1],
        }
    }

    /// Jelly whose bottom edge is at `bottom`, falling at `vy`
    fn falling(x: f32, bottom: f32, vy: f32) -> Actor {
        let mut actor = Actor::new(Vec2::new(x, bottom - ACTOR_SIZE / 2.0), ACTOR_SIZE);
        actor.vel.y = vy;
        actor
    }

    #[test]
    fn test_crossing() {
        assert!(crossed_surface(95.0, 105.0, 100.0, 0.0));
        assert!(crossed_surface(100.0, 100.0, 100.0, 0.0));
        // Already below, rescued by forgiveness
        assert!(crossed_surface(110.0, 118.0, 100.0, 15.0));
        assert!(!crossed_surface(116.0, 120.0, 100.0, 15.0));
        // Not reached yet
        assert!(!crossed_surface(90.0, 99.0, 100.0, 15.0));
    }

    #[test]
    fn test_lands_when_crossing() {
        let tuning = Tuning::default();
        let platforms = [platform(1, 100.0, 300.0, 100.0)];
        let actor = falling(150.0, 305.0, 8.0);
        assert_eq!(find_landing(&actor, 297.0, &platforms, &tuning), Some(0));
    }

    #[test]
    fn test_ignores_rising() {
        let tuning = Tuning::default();
        let platforms = [platform(1, 100.0, 300.0, 100.0)];
        let actor = falling(150.0, 300.0, -8.0);
        assert_eq!(find_landing(&actor, 308.0, &platforms, &tuning), None);
    }

    #[test]
    fn test_ignores_resting() {
        let tuning = Tuning::default();
        let platforms = [platform(1, 100.0, 300.0, 100.0)];
        let mut actor = falling(150.0, 305.0, 8.0);
        actor.resting_on = Some(1);
        assert_eq!(find_landing(&actor, 297.0, &platforms, &tuning), None);
    }

    #[test]
    fn test_narrow_hitbox_misses_edge() {
        let tuning = Tuning::default();
        let platforms = [platform(1, 100.0, 300.0, 100.0)];
        // Full body would overlap by 5px; the narrowed hitbox (9px half-width) does not
        let actor = falling(210.0, 305.0, 8.0);
        assert_eq!(find_landing(&actor, 297.0, &platforms, &tuning), None);

        let actor = falling(205.0, 305.0, 8.0);
        assert_eq!(find_landing(&actor, 297.0, &platforms, &tuning), Some(0));
    }

    #[test]
    fn test_first_in_sequence_wins() {
        let tuning = Tuning::default();
        // Two overlapping surfaces; the later one is nearer the jelly's previous bottom
        let platforms = [
            platform(1, 100.0, 310.0, 100.0),
            platform(2, 100.0, 300.0, 100.0),
        ];
        let actor = falling(150.0, 312.0, 10.0);
        assert_eq!(find_landing(&actor, 299.0, &platforms, &tuning), Some(0));
    }

    #[test]
    fn test_perfect_tolerance() {
        let p = platform(1, 100.0, 300.0, 100.0);
        assert!(is_perfect(&falling(150.0, 300.0, 1.0), &p, PERFECT_TOLERANCE));
        assert!(is_perfect(&falling(164.9, 300.0, 1.0), &p, PERFECT_TOLERANCE));
        assert!(!is_perfect(&falling(165.0, 300.0, 1.0), &p, PERFECT_TOLERANCE));
        assert!(!is_perfect(&falling(120.0, 300.0, 1.0), &p, PERFECT_TOLERANCE));
    }
}
