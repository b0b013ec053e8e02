//! Clamped quantities and the gravity step.
//!
//! The vessel's fullness and rotation are kept in newtypes that clamp on
//! construction, so every value the widget can observe is already in range.

use serde::Serialize;

/// Scales both drag-to-angle and angle-to-fill conversions.
pub const GRAVITY_FACTOR: f64 = 0.5;
/// Tilt magnitude (degrees) at or below which the liquid does not flow.
pub const REST_DEADZONE_DEG: f64 = 1.0;

pub const FILL_MIN: f64 = 0.0;
pub const FILL_MAX: f64 = 100.0;
pub const TILT_MIN: f64 = -90.0;
pub const TILT_MAX: f64 = 90.0;

/// How full the vessel is, in percent (0-100).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct FillLevel(f64);

impl FillLevel {
    pub const EMPTY: Self = Self(FILL_MIN);

    /// Create a fill level, clamping into [0, 100]. NaN becomes empty.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::EMPTY;
        }
        Self(value.clamp(FILL_MIN, FILL_MAX))
    }

    /// Raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Displayed percentage, rounded down.
    pub fn percent(self) -> u8 {
        self.0.floor() as u8
    }
}

/// Rotation of the vessel in degrees (-90 to 90).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct TiltAngle(f64);

impl TiltAngle {
    pub const LEVEL: Self = Self(0.0);

    /// Create a tilt angle, clamping into [-90, 90]. NaN becomes level.
    pub fn new(degrees: f64) -> Self {
        if degrees.is_nan() {
            return Self::LEVEL;
        }
        Self(degrees.clamp(TILT_MIN, TILT_MAX))
    }

    /// Degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Radians.
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Gravity model: sine of the tilt as a flow proxy, no damping or inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    /// Multiplier applied to both conversions
    pub gravity_factor: f64,
    /// Resting band around level, in degrees
    pub rest_deadzone: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity_factor: GRAVITY_FACTOR,
            rest_deadzone: REST_DEADZONE_DEG,
        }
    }
}

impl Physics {
    /// Create a model with custom tuning.
    pub fn new(gravity_factor: f64, rest_deadzone: f64) -> Self {
        Self {
            gravity_factor,
            rest_deadzone,
        }
    }

    /// Whether a vessel at this tilt counts as resting.
    pub fn is_resting(&self, tilt: TiltAngle) -> bool {
        tilt.degrees().abs() <= self.rest_deadzone
    }

    /// Per-frame change in fill for the given tilt.
    pub fn gravity_effect(&self, tilt: TiltAngle) -> f64 {
        tilt.radians().sin() * self.gravity_factor
    }

    /// Advance the fill level by one frame.
    ///
    /// Returns `None` when the vessel is resting, meaning no flow happened
    /// this frame.
    pub fn step(&self, fill: FillLevel, tilt: TiltAngle) -> Option<FillLevel> {
        if self.is_resting(tilt) {
            return None;
        }
        Some(FillLevel::new(fill.value() + self.gravity_effect(tilt)))
    }

    /// New tilt after a vertical pointer movement of `delta_y` pixels.
    pub fn drag(&self, tilt: TiltAngle, delta_y: f64) -> TiltAngle {
        TiltAngle::new(tilt.degrees() + delta_y * self.gravity_factor)
    }
}
