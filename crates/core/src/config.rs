//! Viewport-dependent field configuration.
//!
//! Narrow viewports (at or below the mobile breakpoint) get a sparser
//! network with smaller interaction radii. [`NetworkConfig`] bundles both
//! profiles with the motion tunables and the per-frame time step, and can
//! be overridden from a JSON object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;
use crate::params::{param_f64, param_section, param_usize};
use crate::particle::MotionParams;
use crate::render::RenderStyle;

/// Viewport width (CSS pixels) at or below which the mobile profile applies.
pub const MOBILE_BREAKPOINT: f64 = 768.0;
/// Animation time added per frame.
pub const DEFAULT_TIME_STEP: f64 = 1.5;

/// Which density profile a viewport falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Mobile,
    Desktop,
}

impl Profile {
    /// Classifies a viewport width against the default breakpoint.
    pub fn for_width(width: f64) -> Self {
        Self::classify(width, MOBILE_BREAKPOINT)
    }

    fn classify(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            Profile::Mobile
        } else {
            Profile::Desktop
        }
    }
}

/// Particle density and interaction radii for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Particles closer than this are linked.
    pub max_distance: f64,
    /// Pointer interaction radius.
    pub mouse_radius: f64,
}

impl FieldConfig {
    pub const MOBILE: FieldConfig = FieldConfig {
        particle_count: 40,
        max_distance: 100.0,
        mouse_radius: 120.0,
    };

    pub const DESKTOP: FieldConfig = FieldConfig {
        particle_count: 100,
        max_distance: 150.0,
        mouse_radius: 180.0,
    };

    /// Default configuration for a viewport width.
    pub fn for_width(width: f64) -> Self {
        match Profile::for_width(width) {
            Profile::Mobile => Self::MOBILE,
            Profile::Desktop => Self::DESKTOP,
        }
    }

    fn from_json(params: &Value, default: FieldConfig) -> Self {
        Self {
            particle_count: param_usize(params, "particle_count", default.particle_count),
            max_distance: param_f64(params, "max_distance", default.max_distance),
            mouse_radius: param_f64(params, "mouse_radius", default.mouse_radius),
        }
    }

    fn validate(&self, label: &str) -> Result<(), EngineError> {
        for (name, value) in [
            ("max_distance", self.max_distance),
            ("mouse_radius", self.mouse_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{label}.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Drawing-surface size in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Everything the animation driver needs besides the viewport and seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub mobile_breakpoint: f64,
    pub mobile: FieldConfig,
    pub desktop: FieldConfig,
    pub motion: MotionParams,
    pub style: RenderStyle,
    /// Animation time added per frame; controls drift speed.
    pub time_step: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            mobile: FieldConfig::MOBILE,
            desktop: FieldConfig::DESKTOP,
            motion: MotionParams::default(),
            style: RenderStyle::default(),
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl NetworkConfig {
    /// Applies overrides from a JSON object such as
    /// `{"time_step": 3, "desktop": {"particle_count": 60}, "motion": {"move_range": 80}}`.
    ///
    /// Unknown keys are ignored and malformed values keep their defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            mobile_breakpoint: param_f64(params, "mobile_breakpoint", d.mobile_breakpoint),
            mobile: FieldConfig::from_json(param_section(params, "mobile"), d.mobile),
            desktop: FieldConfig::from_json(param_section(params, "desktop"), d.desktop),
            motion: MotionParams::from_json(param_section(params, "motion")),
            style: d.style,
            time_step: param_f64(params, "time_step", d.time_step),
        }
    }

    /// Rejects values that would make the animation meaningless.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.mobile.validate("mobile")?;
        self.desktop.validate("desktop")?;
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if !self.mobile_breakpoint.is_finite() {
            return Err(EngineError::InvalidConfig(
                "mobile_breakpoint must be finite".into(),
            ));
        }
        let m = &self.motion;
        for (name, value) in [
            ("noise_scale", m.noise_scale),
            ("noise_strength", m.noise_strength),
            ("move_range", m.move_range),
            ("repulsion_strength", m.repulsion_strength),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "motion.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Profile and field configuration for a viewport width.
    pub fn resolve(&self, width: f64) -> (Profile, FieldConfig) {
        match Profile::classify(width, self.mobile_breakpoint) {
            Profile::Mobile => (Profile::Mobile, self.mobile),
            Profile::Desktop => (Profile::Desktop, self.desktop),
        }
    }
}
