use crate::config::CubeConfig;
use crate::math::wrap_degrees;

/// Screen-space parameters derived from the viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Half edge length of the cube in pixels
    pub half: f64,
    /// Perspective distance; larger means a weaker perspective
    pub persp: f64,
    /// Horizontal center of the viewport
    pub cx: f64,
    /// Vertical center of the viewport
    pub cy: f64,
}

impl Viewport {
    /// Derives the viewport parameters for a `width` x `height` area.
    ///
    /// Returns `None` for degenerate sizes, which would give a zero-sized
    /// cube and a zero perspective distance.
    pub fn from_size(width: f64, height: f64, half_ratio: f64, persp_ratio: f64) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }
        let half = width.min(height) * half_ratio;
        Some(Viewport {
            half,
            persp: half * persp_ratio,
            cx: width / 2.0,
            cy: height / 2.0,
        })
    }
}

/// Rotation state of the cube
#[derive(Debug, Clone, PartialEq)]
pub struct CubeState {
    /// Current rotation angle around the X-axis, in degrees
    rot_x: f64,
    /// Current rotation angle around the Y-axis, in degrees
    rot_y: f64,
    /// Auto-rotation speed around the X-axis, in degrees per second
    pub auto_speed_x: f64,
    /// Auto-rotation speed around the Y-axis, in degrees per second
    pub auto_speed_y: f64,
    /// `None` until the first non-degenerate resize
    pub viewport: Option<Viewport>,
}

impl CubeState {
    pub fn new(config: &CubeConfig) -> Self {
        CubeState {
            rot_x: wrap_degrees(config.initial_rot_x),
            rot_y: wrap_degrees(config.initial_rot_y),
            auto_speed_x: config.auto_speed_x,
            auto_speed_y: config.auto_speed_y,
            viewport: None,
        }
    }

    pub fn rot_x(&self) -> f64 {
        self.rot_x
    }

    pub fn rot_y(&self) -> f64 {
        self.rot_y
    }

    /// Sets both angles, wrapping them into `[0, 360)`
    pub fn set_rotation(&mut self, rot_x: f64, rot_y: f64) {
        self.rot_x = wrap_degrees(rot_x);
        self.rot_y = wrap_degrees(rot_y);
    }

    /// Adds the given deltas (in degrees) to the current angles
    pub fn rotate_by(&mut self, delta_x: f64, delta_y: f64) {
        self.set_rotation(self.rot_x + delta_x, self.rot_y + delta_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_from_square() {
        let vp = Viewport::from_size(300.0, 300.0, 0.28, 8.0).unwrap();
        assert!((vp.half - 84.0).abs() < 1e-9, "half={}", vp.half);
        assert!((vp.persp - 672.0).abs() < 1e-9, "persp={}", vp.persp);
        assert_eq!((vp.cx, vp.cy), (150.0, 150.0));
    }

    #[test]
    fn viewport_uses_smaller_side() {
        let vp = Viewport::from_size(400.0, 100.0, 0.28, 8.0).unwrap();
        assert!((vp.half - 28.0).abs() < 1e-9, "half={}", vp.half);
        assert_eq!((vp.cx, vp.cy), (200.0, 50.0));
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        assert_eq!(Viewport::from_size(0.0, 300.0, 0.28, 8.0), None);
        assert_eq!(Viewport::from_size(300.0, 0.0, 0.28, 8.0), None);
        assert_eq!(Viewport::from_size(f64::NAN, 300.0, 0.28, 8.0), None);
    }

    #[test]
    fn rotation_is_wrapped() {
        let mut state = CubeState::new(&CubeConfig::default());
        assert_eq!((state.rot_x(), state.rot_y()), (20.0, 0.0));
        state.rotate_by(-50.0, 370.0);
        assert!((state.rot_x() - 330.0).abs() < 1e-9);
        assert!((state.rot_y() - 10.0).abs() < 1e-9);
    }
}
