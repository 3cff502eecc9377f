use crate::error::CubeError;
use std::time::Duration;

/// Tunable parameters of the cube widget
#[derive(Debug, Clone, PartialEq)]
pub struct CubeConfig {
    /// Auto-rotation speed around the X-axis, in degrees per second
    pub auto_speed_x: f64,
    /// Auto-rotation speed around the Y-axis, in degrees per second
    pub auto_speed_y: f64,
    /// Degrees of rotation per pixel of drag
    pub deg_per_px: f64,
    /// Displacement from the down position beyond which a gesture is a drag
    pub touch_slop: f64,
    /// Longest press still classified as a tap
    pub tap_timeout: Duration,
    /// Pause between the end of a gesture and resumed auto-rotation
    pub recover_duration: Duration,
    /// Half edge length as a fraction of the viewport's smaller side
    pub half_ratio: f64,
    /// Perspective distance as a multiple of the half edge length
    pub persp_ratio: f64,
    /// Rotation around the X-axis at construction, in degrees
    pub initial_rot_x: f64,
    /// Rotation around the Y-axis at construction, in degrees
    pub initial_rot_y: f64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        CubeConfig {
            auto_speed_x: 10.0,
            auto_speed_y: 24.0,
            deg_per_px: 0.25,
            touch_slop: 30.0,
            tap_timeout: Duration::from_millis(250),
            recover_duration: Duration::from_millis(450),
            half_ratio: 0.28,
            persp_ratio: 8.0,
            initial_rot_x: 20.0,
            initial_rot_y: 0.0,
        }
    }
}

impl CubeConfig {
    /// Rejects values that would break projection or gesture classification.
    ///
    /// Auto speeds may be zero or negative (a still or reversed cube) but must
    /// be finite. `persp_ratio` must exceed √3 so no rotated vertex can reach
    /// the perspective singularity.
    pub fn validate(&self) -> Result<(), CubeError> {
        for (field, value) in [
            ("auto_speed_x", self.auto_speed_x),
            ("auto_speed_y", self.auto_speed_y),
            ("initial_rot_x", self.initial_rot_x),
            ("initial_rot_y", self.initial_rot_y),
        ] {
            if !value.is_finite() {
                return Err(CubeError::InvalidConfig { field, value });
            }
        }
        for (field, value) in [
            ("deg_per_px", self.deg_per_px),
            ("touch_slop", self.touch_slop),
            ("half_ratio", self.half_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CubeError::InvalidConfig { field, value });
            }
        }
        if !self.persp_ratio.is_finite() || self.persp_ratio <= 3f64.sqrt() {
            return Err(CubeError::InvalidConfig {
                field: "persp_ratio",
                value: self.persp_ratio,
            });
        }
        Ok(())
    }
}
