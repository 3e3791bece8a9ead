//! Locomotion configuration.
//!
//! One flat struct grouped by concern. Every field has a default (see [`crate::constants`]),
//! so a TOML file only needs to list the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Tuning for one controllable actor.
///
/// All values use metric units (meters, seconds); angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // ========================================================================
    // Body
    // ========================================================================
    /// Capsule radius.
    pub radius: f32,

    /// Standing capsule height (feet to top).
    pub standing_height: f32,

    /// Crouching capsule height (feet to top).
    pub crouch_height: f32,

    /// Contact skin kept between the body and the world.
    pub skin_width: f32,

    /// Camera height above the feet while standing.
    pub standing_camera_height: f32,

    /// Camera height above the feet while crouching.
    pub crouch_camera_height: f32,

    // ========================================================================
    // Speeds
    // ========================================================================
    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,

    /// Exponential smoothing rate toward the target planar velocity (1/s).
    pub speed_smoothing: f32,

    /// Planar speed multiplier while airborne.
    pub air_control: f32,

    // ========================================================================
    // Gravity & slopes
    // ========================================================================
    /// Signed gravity acceleration (negative = down).
    pub gravity: f32,

    pub gravity_multiplier: f32,

    /// Vertical velocity held while grounded (negative).
    pub grounded_gravity: f32,

    /// Maximum fall speed magnitude.
    pub terminal_fall_speed: f32,

    /// Timestep of the fixed gravity pass (seconds).
    pub fixed_dt: f32,

    pub slope_limit_deg: f32,

    /// Seconds on a too-steep surface before sliding starts.
    pub slope_slide_threshold: f32,

    pub slide_speed_per_degree: f32,
    pub max_slide_speed: f32,

    // ========================================================================
    // Steps
    // ========================================================================
    /// Step offset applied when a climbable step is ahead.
    pub max_step_offset: f32,

    /// Angle between the center step probe and each side probe.
    pub step_probe_spread_deg: f32,

    /// Extra probe reach beyond `radius + skin_width`.
    pub step_probe_offset: f32,

    // ========================================================================
    // Ground probing
    // ========================================================================
    /// Ground rays (out of 8) that must hit for the actor to be grounded.
    pub min_ground_hits: u8,

    /// Ray origin distance from the capsule axis, as a fraction of `radius`.
    pub ground_probe_spread: f32,

    /// Reach of the capsule-bottom overlap check below the feet.
    pub ground_check_distance: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    pub jump_impulse: f32,
    pub jump_cooldown: f32,
    pub coyote_time: f32,

    /// Window after a jump during which ground detection is ignored.
    pub jump_ground_suppress: f32,

    /// How long an ineligible jump press stays pending.
    pub jump_buffer_time: f32,

    // ========================================================================
    // Crouching
    // ========================================================================
    /// Interpolation rate for height, center and camera (1/s).
    pub crouch_interpolation_rate: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            standing_height: DEFAULT_STANDING_HEIGHT,
            crouch_height: DEFAULT_CROUCH_HEIGHT,
            skin_width: DEFAULT_SKIN_WIDTH,
            standing_camera_height: DEFAULT_STANDING_CAMERA_HEIGHT,
            crouch_camera_height: DEFAULT_CROUCH_CAMERA_HEIGHT,

            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            crouch_speed: DEFAULT_CROUCH_SPEED,
            speed_smoothing: DEFAULT_SPEED_SMOOTHING,
            air_control: DEFAULT_AIR_CONTROL,

            gravity: DEFAULT_GRAVITY,
            gravity_multiplier: DEFAULT_GRAVITY_MULTIPLIER,
            grounded_gravity: DEFAULT_GROUNDED_GRAVITY,
            terminal_fall_speed: DEFAULT_TERMINAL_FALL_SPEED,
            fixed_dt: DEFAULT_FIXED_DT,
            slope_limit_deg: DEFAULT_SLOPE_LIMIT_DEG,
            slope_slide_threshold: DEFAULT_SLOPE_SLIDE_THRESHOLD,
            slide_speed_per_degree: DEFAULT_SLIDE_SPEED_PER_DEGREE,
            max_slide_speed: DEFAULT_MAX_SLIDE_SPEED,

            max_step_offset: DEFAULT_MAX_STEP_OFFSET,
            step_probe_spread_deg: DEFAULT_STEP_PROBE_SPREAD_DEG,
            step_probe_offset: DEFAULT_STEP_PROBE_OFFSET,

            min_ground_hits: DEFAULT_MIN_GROUND_HITS,
            ground_probe_spread: DEFAULT_GROUND_PROBE_SPREAD,
            ground_check_distance: DEFAULT_GROUND_CHECK_DISTANCE,

            jump_impulse: DEFAULT_JUMP_IMPULSE,
            jump_cooldown: DEFAULT_JUMP_COOLDOWN,
            coyote_time: DEFAULT_COYOTE_TIME,
            jump_ground_suppress: DEFAULT_JUMP_GROUND_SUPPRESS,
            jump_buffer_time: DEFAULT_JUMP_BUFFER_TIME,

            crouch_interpolation_rate: DEFAULT_CROUCH_INTERPOLATION_RATE,
        }
    }
}

impl LocomotionConfig {
    /// Parse a (possibly partial) TOML document and validate the result.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("radius", self.radius)?;
        positive("standing_height", self.standing_height)?;
        positive("crouch_height", self.crouch_height)?;
        non_negative("skin_width", self.skin_width)?;

        if self.standing_height < 2.0 * self.radius {
            return Err(ConfigError::invalid(
                "standing_height",
                format!("must be at least 2 * radius ({})", 2.0 * self.radius),
            ));
        }
        if self.crouch_height < 2.0 * self.radius || self.crouch_height > self.standing_height {
            return Err(ConfigError::invalid(
                "crouch_height",
                "must lie between 2 * radius and standing_height",
            ));
        }
        if self.standing_camera_height <= 0.0 || self.standing_camera_height > self.standing_height
        {
            return Err(ConfigError::invalid(
                "standing_camera_height",
                "must lie in (0, standing_height]",
            ));
        }
        if self.crouch_camera_height <= 0.0 || self.crouch_camera_height > self.crouch_height {
            return Err(ConfigError::invalid(
                "crouch_camera_height",
                "must lie in (0, crouch_height]",
            ));
        }

        non_negative("walk_speed", self.walk_speed)?;
        non_negative("run_speed", self.run_speed)?;
        non_negative("crouch_speed", self.crouch_speed)?;
        positive("speed_smoothing", self.speed_smoothing)?;
        non_negative("air_control", self.air_control)?;

        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(ConfigError::invalid("gravity", "must be negative (down is -Y)"));
        }
        positive("gravity_multiplier", self.gravity_multiplier)?;
        if !(self.grounded_gravity.is_finite() && self.grounded_gravity < 0.0) {
            return Err(ConfigError::invalid("grounded_gravity", "must be negative"));
        }
        positive("terminal_fall_speed", self.terminal_fall_speed)?;
        positive("fixed_dt", self.fixed_dt)?;
        if !(self.slope_limit_deg > 0.0 && self.slope_limit_deg < 90.0) {
            return Err(ConfigError::invalid("slope_limit_deg", "must lie in (0, 90)"));
        }
        non_negative("slope_slide_threshold", self.slope_slide_threshold)?;
        non_negative("slide_speed_per_degree", self.slide_speed_per_degree)?;
        non_negative("max_slide_speed", self.max_slide_speed)?;

        non_negative("max_step_offset", self.max_step_offset)?;
        if self.max_step_offset >= self.crouch_height {
            return Err(ConfigError::invalid(
                "max_step_offset",
                "must be lower than crouch_height",
            ));
        }
        if !(self.step_probe_spread_deg >= 0.0 && self.step_probe_spread_deg < 90.0) {
            return Err(ConfigError::invalid("step_probe_spread_deg", "must lie in [0, 90)"));
        }
        non_negative("step_probe_offset", self.step_probe_offset)?;

        if self.min_ground_hits == 0 || self.min_ground_hits as usize > GROUND_RAY_COUNT {
            return Err(ConfigError::invalid(
                "min_ground_hits",
                format!("must lie in 1..={GROUND_RAY_COUNT}"),
            ));
        }
        if !(self.ground_probe_spread > 0.0 && self.ground_probe_spread <= 1.0) {
            return Err(ConfigError::invalid("ground_probe_spread", "must lie in (0, 1]"));
        }
        non_negative("ground_check_distance", self.ground_check_distance)?;

        non_negative("jump_impulse", self.jump_impulse)?;
        non_negative("jump_cooldown", self.jump_cooldown)?;
        non_negative("coyote_time", self.coyote_time)?;
        non_negative("jump_ground_suppress", self.jump_ground_suppress)?;
        non_negative("jump_buffer_time", self.jump_buffer_time)?;

        positive("crouch_interpolation_rate", self.crouch_interpolation_rate)?;

        Ok(())
    }

    #[inline]
    pub fn slope_limit_rad(&self) -> f32 {
        self.slope_limit_deg.to_radians()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_listed_fields() {
        let config = LocomotionConfig::from_toml_str(
            r#"
            walk_speed = 3.5
            coyote_time = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.walk_speed, 3.5);
        assert_eq!(config.coyote_time, 0.1);
        assert_eq!(config.run_speed, DEFAULT_RUN_SPEED);
    }

    #[test]
    fn crouch_taller_than_standing_is_rejected() {
        let config = LocomotionConfig {
            crouch_height: 2.5,
            ..LocomotionConfig::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "crouch_height"),
            other => panic!("expected crouch_height error, got {other:?}"),
        }
    }

    #[test]
    fn positive_gravity_is_rejected() {
        let err = LocomotionConfig::from_toml_str("gravity = 9.81").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));
    }

    #[test]
    fn zero_fixed_dt_is_rejected() {
        let err = LocomotionConfig::from_toml_str("fixed_dt = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "fixed_dt", .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = LocomotionConfig::from_toml_str("walk_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn min_ground_hits_must_fit_the_ray_count() {
        let config = LocomotionConfig {
            min_ground_hits: 9,
            ..LocomotionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
