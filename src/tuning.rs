//! Data-driven game balance
//!
//! Every gameplay knob lives here so a run can be reproduced from a seed plus
//! a tuning blob. Defaults mirror [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning set is rejected at startup
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("gravity must be positive (got {0})")]
    Gravity(f32),
    #[error("jump forces must be negative with the first jump stronger (first {first}, double {double})")]
    JumpForces { first: f32, double: f32 },
    #[error("{name} range is invalid ({min}..={max})")]
    Range {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("viewport width {viewport} is narrower than the widest platform {platform}")]
    ViewportTooNarrow { viewport: f32, platform: f32 },
    #[error("fever threshold must be at least 1")]
    FeverThreshold,
    #[error("fever multiplier must be at least 1")]
    FeverMultiplier,
    #[error("at least one platform must spawn above the base")]
    PlatformCount,
}

/// Gameplay parameters (all per fixed simulation step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub actor_size: f32,
    pub hitbox_scale: f32,
    pub detach_tolerance: f32,

    pub platform_height: f32,
    pub platform_min_width: f32,
    pub platform_max_width: f32,
    pub base_platform_width: f32,
    pub base_platform_offset: f32,
    pub platform_spacing: f32,
    pub platform_count: usize,
    pub platform_min_speed: f32,
    pub platform_max_speed: f32,
    pub speed_growth_per_point: f32,

    pub recycle_margin: f32,
    pub fall_margin: f32,
    pub scroll_fraction: f32,

    pub landing_forgiveness: f32,
    pub perfect_tolerance: f32,
    pub fever_threshold: u32,
    pub fever_multiplier: u64,

    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            double_jump_force: DOUBLE_JUMP_FORCE,
            actor_size: ACTOR_SIZE,
            hitbox_scale: HITBOX_SCALE,
            detach_tolerance: DETACH_TOLERANCE,

            platform_height: PLATFORM_HEIGHT,
            platform_min_width: PLATFORM_MIN_WIDTH,
            platform_max_width: PLATFORM_MAX_WIDTH,
            base_platform_width: BASE_PLATFORM_WIDTH,
            base_platform_offset: BASE_PLATFORM_OFFSET,
            platform_spacing: PLATFORM_SPACING,
            platform_count: PLATFORM_COUNT,
            platform_min_speed: PLATFORM_MIN_SPEED,
            platform_max_speed: PLATFORM_MAX_SPEED,
            speed_growth_per_point: SPEED_GROWTH_PER_POINT,

            recycle_margin: RECYCLE_MARGIN,
            fall_margin: FALL_MARGIN,
            scroll_fraction: SCROLL_FRACTION,

            landing_forgiveness: LANDING_FORGIVENESS,
            perfect_tolerance: PERFECT_TOLERANCE,
            fever_threshold: FEVER_THRESHOLD,
            fever_multiplier: FEVER_MULTIPLIER,

            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning blob; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the invariants the simulation relies on
    ///
    /// Run once at startup. The tick itself never re-checks these.
    pub fn validate(&self, viewport_width: f32) -> Result<(), TuningError> {
        if self.gravity <= 0.0 {
            return Err(TuningError::Gravity(self.gravity));
        }
        if self.jump_force >= 0.0
            || self.double_jump_force >= 0.0
            || self.jump_force > self.double_jump_force
        {
            return Err(TuningError::JumpForces {
                first: self.jump_force,
                double: self.double_jump_force,
            });
        }
        check_range(
            "platform width",
            self.platform_min_width,
            self.platform_max_width,
        )?;
        check_range(
            "platform speed",
            self.platform_min_speed,
            self.platform_max_speed,
        )?;
        if self.platform_min_width <= 0.0 {
            return Err(TuningError::NotPositive {
                name: "platform_min_width",
                value: self.platform_min_width,
            });
        }
        for (name, value) in [
            ("actor_size", self.actor_size),
            ("platform_height", self.platform_height),
            ("platform_spacing", self.platform_spacing),
            ("hitbox_scale", self.hitbox_scale),
            ("scroll_fraction", self.scroll_fraction),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { name, value });
            }
        }
        let widest = self.platform_max_width.max(self.base_platform_width);
        if viewport_width < widest {
            return Err(TuningError::ViewportTooNarrow {
                viewport: viewport_width,
                platform: widest,
            });
        }
        if self.fever_threshold == 0 {
            return Err(TuningError::FeverThreshold);
        }
        if self.fever_multiplier == 0 {
            return Err(TuningError::FeverMultiplier);
        }
        if self.platform_count == 0 {
            return Err(TuningError::PlatformCount);
        }
        Ok(())
    }

    /// Half-width of the forgiving landing hitbox
    #[inline]
    pub fn hitbox_half_width(&self) -> f32 {
        self.actor_size / 2.0 * self.hitbox_scale
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min < 0.0 || min > max {
        return Err(TuningError::Range { name, min, max });
    }
    Ok(())
}
