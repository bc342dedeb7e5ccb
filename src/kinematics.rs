//! Differential drive command to wheel duty cycle conversion.
//!
//! Maps a `(linear, angular)` driving command to left/right motor duty
//! cycles. The same converter instance backs the live review overlay and
//! offline log playback, so both produce identical numbers for a step.
//!
//! # Model
//!
//! For wheelbase `b`, wheel radius `r`, motor constant `k`, gain `g` and
//! trim `t`:
//!
//! ```text
//! omega_right = (v + 0.5 * w * b) / r
//! omega_left  = (v - 0.5 * w * b) / r
//! left_duty   = omega_left  * (g - t) / k
//! right_duty  = omega_right * (g + t) / k
//! ```
//!
//! Both duties are then clamped to `[-limit, limit]`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed vehicle and motor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsParameters {
    /// Overall motor gain
    pub gain: f64,
    /// Left/right balance (positive favours the right wheel)
    pub trim: f64,
    /// Wheel radius in meters
    pub radius: f64,
    /// Motor constant
    pub k: f64,
    /// Duty cycle magnitude limit
    pub limit: f64,
    /// Distance between wheel centers in meters
    pub wheel_distance: f64,
}

impl Default for KinematicsParameters {
    fn default() -> Self {
        // Duckiebot-class vehicle
        Self {
            gain: 1.0,
            trim: 0.0,
            radius: 0.0318,
            k: 27.0,
            limit: 1.0,
            wheel_distance: 0.102,
        }
    }
}

impl KinematicsParameters {
    /// Reject parameters that would divide by zero or invert the clamp.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("radius", self.radius),
            ("k", self.k),
            ("limit", self.limit),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!(
                    "kinematics.{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !(self.gain.is_finite() && self.trim.is_finite() && self.wheel_distance.is_finite()) {
            return Err(Error::Config(
                "kinematics gain, trim and wheel_distance must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Left and right wheel duty cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDuty {
    pub left: f64,
    pub right: f64,
}

impl WheelDuty {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Clamp both wheels to `[-limit, limit]`.
    ///
    /// NaN (from a non-finite command) maps to 0.0; infinities saturate.
    #[inline]
    pub fn clamped(self, limit: f64) -> Self {
        Self {
            left: clamp_duty(self.left, limit),
            right: clamp_duty(self.right, limit),
        }
    }
}

#[inline]
fn clamp_duty(duty: f64, limit: f64) -> f64 {
    if duty.is_nan() {
        0.0
    } else {
        duty.clamp(-limit, limit)
    }
}

/// Stateless converter holding validated parameters.
#[derive(Debug, Clone)]
pub struct KinematicsConverter {
    params: KinematicsParameters,
}

impl KinematicsConverter {
    /// Create a converter; fails on invalid parameters.
    pub fn new(params: KinematicsParameters) -> Result<Self> {
        params.validate()?;
        log::debug!(
            "KinematicsConverter: gain={:.3} trim={:.3} radius={:.4}m k={:.2} limit={:.2} wheelbase={:.3}m",
            params.gain,
            params.trim,
            params.radius,
            params.k,
            params.limit,
            params.wheel_distance
        );
        Ok(Self { params })
    }

    /// Parameters in use.
    pub fn params(&self) -> &KinematicsParameters {
        &self.params
    }

    /// Duty cycles before clamping.
    pub fn convert_unclamped(&self, linear: f64, angular: f64) -> WheelDuty {
        let p = &self.params;
        let half_turn = 0.5 * angular * p.wheel_distance;

        let omega_right = (linear + half_turn) / p.radius;
        let omega_left = (linear - half_turn) / p.radius;

        let k_left = (p.gain - p.trim) / p.k;
        let k_right = (p.gain + p.trim) / p.k;

        WheelDuty {
            left: omega_left * k_left,
            right: omega_right * k_right,
        }
    }

    /// Duty cycles clamped to `[-limit, limit]`.
    #[inline]
    pub fn convert(&self, linear: f64, angular: f64) -> WheelDuty {
        self.convert_unclamped(linear, angular)
            .clamped(self.params.limit)
    }
}

impl Default for KinematicsConverter {
    fn default() -> Self {
        Self {
            params: KinematicsParameters::default(),
        }
    }
}
