use crate::state::CubeState;
use std::time::Instant;

/// Integrates auto-rotation from wall-clock time, independent of frame rate
#[derive(Debug, Clone)]
pub struct RotationDriver {
    active: bool,
    /// Timestamp of the previous advance, cleared whenever the driver stops
    last_frame: Option<Instant>,
}

impl Default for RotationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationDriver {
    /// Creates an active driver with no time baseline
    pub fn new() -> Self {
        RotationDriver {
            active: true,
            last_frame: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts or stops auto-rotation.
    ///
    /// Either transition drops the time baseline, so the first advance after
    /// resuming only records a timestamp instead of integrating the pause.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.last_frame = None;
    }

    /// Advances the cube's rotation to `now`.
    ///
    /// Returns `true` if the angles changed.
    pub fn advance(&mut self, now: Instant, state: &mut CubeState) -> bool {
        if !self.active {
            return false;
        }
        let Some(last) = self.last_frame.replace(now) else {
            return false;
        };
        let dt = now.saturating_duration_since(last).as_secs_f64();
        if dt == 0.0 {
            return false;
        }
        state.rotate_by(state.auto_speed_x * dt, state.auto_speed_y * dt);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CubeConfig;
    use std::time::Duration;

    #[test]
    fn first_advance_only_records_baseline() {
        let mut state = CubeState::new(&CubeConfig::default());
        let mut driver = RotationDriver::new();
        let t0 = Instant::now();
        assert!(!driver.advance(t0, &mut state));
        assert_eq!((state.rot_x(), state.rot_y()), (20.0, 0.0));
    }

    #[test]
    fn one_second_of_rotation() {
        let mut state = CubeState::new(&CubeConfig::default());
        let mut driver = RotationDriver::new();
        let t0 = Instant::now();
        driver.advance(t0, &mut state);
        assert!(driver.advance(t0 + Duration::from_secs(1), &mut state));
        assert!((state.rot_y() - 24.0).abs() < 1e-9, "rot_y={}", state.rot_y());
        assert!((state.rot_x() - 30.0).abs() < 1e-9, "rot_x={}", state.rot_x());
    }

    #[test]
    fn rotation_is_frame_rate_independent() {
        let t0 = Instant::now();
        let mut coarse = CubeState::new(&CubeConfig::default());
        let mut fine = coarse.clone();

        let mut driver = RotationDriver::new();
        driver.advance(t0, &mut coarse);
        driver.advance(t0 + Duration::from_millis(500), &mut coarse);

        let mut driver = RotationDriver::new();
        for ms in (0..=500).step_by(16).chain([500]) {
            driver.advance(t0 + Duration::from_millis(ms), &mut fine);
        }
        assert!((coarse.rot_y() - fine.rot_y()).abs() < 1e-9);
        assert!((coarse.rot_x() - fine.rot_x()).abs() < 1e-9);
    }

    #[test]
    fn long_runs_stay_in_range() {
        let mut state = CubeState::new(&CubeConfig::default());
        let mut driver = RotationDriver::new();
        let t0 = Instant::now();
        driver.advance(t0, &mut state);
        driver.advance(t0 + Duration::from_secs(3600 * 24), &mut state);
        assert!((0.0..360.0).contains(&state.rot_x()));
        assert!((0.0..360.0).contains(&state.rot_y()));
    }

    #[test]
    fn inactive_driver_ignores_time_and_restarts_fresh() {
        let mut state = CubeState::new(&CubeConfig::default());
        let mut driver = RotationDriver::new();
        let t0 = Instant::now();
        driver.advance(t0, &mut state);

        driver.set_active(false);
        assert!(!driver.advance(t0 + Duration::from_secs(1), &mut state));

        driver.set_active(true);
        // A ten second gap must not be integrated
        assert!(!driver.advance(t0 + Duration::from_secs(10), &mut state));
        driver.advance(t0 + Duration::from_secs(11), &mut state);
        assert!((state.rot_y() - 24.0).abs() < 1e-9, "rot_y={}", state.rot_y());
    }

    #[test]
    fn time_going_backwards_is_ignored() {
        let mut state = CubeState::new(&CubeConfig::default());
        let mut driver = RotationDriver::new();
        let t0 = Instant::now() + Duration::from_secs(5);
        driver.advance(t0, &mut state);
        assert!(!driver.advance(t0 - Duration::from_secs(1), &mut state));
        assert_eq!(state.rot_y(), 0.0);
    }
}
