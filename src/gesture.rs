//! Pointer gesture handling: drag-to-rotate, tap detection and the pause
//! before auto-rotation resumes.
//!
//! ```text
//!                  down                      up / cancel
//! AutoRotating ----------> Dragging ----------------------> Recovering
//!      ^                      ^                                 |
//!      |                      |   down (cancels the timer)      |
//!      |                      +---------------------------------+
//!      |              recovery timer elapsed                    |
//!      +--------------------------------------------------------+
//! ```

use crate::config::CubeConfig;
use crate::state::CubeState;
use kurbo::Point;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which part of the interaction cycle the cube is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    /// The timing driver rotates the cube
    AutoRotating,
    /// A pointer is down; rotation follows the pointer
    Dragging,
    /// The pointer was released; auto-rotation resumes when the timer ends
    Recovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A raw pointer event forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Monotonic timestamp of the event
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, time: Instant) -> Self {
        PointerEvent {
            kind,
            position,
            time,
        }
    }
}

/// Bookkeeping for a single down..up touch sequence
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub down_position: Point,
    pub down_time: Instant,
    pub last_position: Point,
    /// Set once the pointer strays past the slop threshold
    pub moved: bool,
}

/// Fixed-length timer that delays the return to auto-rotation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Recovery {
    started: Instant,
    duration: Duration,
}

impl Recovery {
    fn linear(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Interaction state machine driven by pointer events and frame time
#[derive(Debug, Clone)]
pub struct Interaction {
    phase: InteractionPhase,
    gesture: Option<GestureState>,
    recovery: Option<Recovery>,
    deg_per_px: f64,
    touch_slop: f64,
    tap_timeout: Duration,
    recover_duration: Duration,
}

impl Interaction {
    pub fn new(config: &CubeConfig) -> Self {
        Interaction {
            phase: InteractionPhase::AutoRotating,
            gesture: None,
            recovery: None,
            deg_per_px: config.deg_per_px,
            touch_slop: config.touch_slop,
            tap_timeout: config.tap_timeout,
            recover_duration: config.recover_duration,
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    /// The touch sequence in progress, if any
    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    /// Starts a drag, cancelling any pending recovery
    pub fn pointer_down(&mut self, position: Point, time: Instant) {
        if self.recovery.take().is_some() {
            debug!("recovery cancelled by new touch");
        }
        self.gesture = Some(GestureState {
            down_position: position,
            down_time: time,
            last_position: position,
            moved: false,
        });
        self.set_phase(InteractionPhase::Dragging);
    }

    /// Rotates the cube by the pointer's motion since the previous event.
    ///
    /// Horizontal motion yaws and vertical motion pitches, so the face under
    /// the pointer follows it. Returns `true` if a drag was in progress.
    pub fn pointer_move(&mut self, position: Point, state: &mut CubeState) -> bool {
        if self.phase != InteractionPhase::Dragging {
            return false;
        }
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        let delta = position - gesture.last_position;
        state.rotate_by(-delta.y * self.deg_per_px, delta.x * self.deg_per_px);
        gesture.last_position = position;
        if exceeds_slop(gesture.down_position, position, self.touch_slop) {
            gesture.moved = true;
        }
        true
    }

    /// Ends the drag and starts the recovery timer.
    ///
    /// Returns the release position when the gesture counts as a tap: the
    /// pointer never left the slop area and was released before the tap
    /// timeout.
    pub fn pointer_up(&mut self, position: Point, time: Instant) -> Option<Point> {
        if self.phase != InteractionPhase::Dragging {
            return None;
        }
        let gesture = self.gesture.take()?;
        let moved = gesture.moved || exceeds_slop(gesture.down_position, position, self.touch_slop);
        let held = time.saturating_duration_since(gesture.down_time);
        let is_tap = !moved && held < self.tap_timeout;

        self.recovery = Some(Recovery {
            started: time,
            duration: self.recover_duration,
        });
        self.set_phase(InteractionPhase::Recovering);

        is_tap.then_some(position)
    }

    /// Completes the recovery once its timer has elapsed.
    ///
    /// Returns `true` on the transition back to auto-rotation.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(recovery) = self.recovery else {
            return false;
        };
        if recovery.linear(now) < 1.0 {
            return false;
        }
        self.recovery = None;
        self.set_phase(InteractionPhase::AutoRotating);
        true
    }

    /// Decelerating progress of the recovery timer in `[0, 1]`, or `None`
    /// when not recovering
    pub fn recovery_progress(&self, now: Instant) -> Option<f64> {
        let t = self.recovery?.linear(now);
        Some(1.0 - (1.0 - t) * (1.0 - t))
    }

    /// Drops any gesture and pending timer without reporting anything
    pub fn reset(&mut self) {
        self.gesture = None;
        self.recovery = None;
        self.set_phase(InteractionPhase::AutoRotating);
    }

    fn set_phase(&mut self, phase: InteractionPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "interaction phase changed");
            self.phase = phase;
        }
    }
}

fn exceeds_slop(from: Point, to: Point, slop: f64) -> bool {
    (to.x - from.x).abs() >= slop || (to.y - from.y).abs() >= slop
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Interaction, CubeState, Instant) {
        let config = CubeConfig::default();
        (Interaction::new(&config), CubeState::new(&config), Instant::now())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn quick_still_press_is_a_tap() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::new(150.0, 150.0), t0);
        assert_eq!(interaction.phase(), InteractionPhase::Dragging);
        let tap = interaction.pointer_up(Point::new(152.0, 151.0), t0 + ms(100));
        assert_eq!(tap, Some(Point::new(152.0, 151.0)));
        assert_eq!(interaction.phase(), InteractionPhase::Recovering);
    }

    #[test]
    fn long_press_is_not_a_tap() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::new(150.0, 150.0), t0);
        assert_eq!(interaction.pointer_up(Point::new(150.0, 150.0), t0 + ms(250)), None);
    }

    #[test]
    fn drag_past_slop_is_not_a_tap_even_if_it_returns() {
        let (mut interaction, mut state, t0) = setup();
        interaction.pointer_down(Point::new(100.0, 100.0), t0);
        interaction.pointer_move(Point::new(140.0, 100.0), &mut state);
        assert!(interaction.gesture().unwrap().moved);
        interaction.pointer_move(Point::new(100.0, 100.0), &mut state);
        assert_eq!(interaction.pointer_up(Point::new(100.0, 100.0), t0 + ms(50)), None);
    }

    #[test]
    fn release_far_from_down_is_not_a_tap() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::new(100.0, 100.0), t0);
        assert_eq!(interaction.pointer_up(Point::new(100.0, 130.0), t0 + ms(50)), None);
    }

    #[test]
    fn drag_rotates_by_delta_from_previous_move() {
        let (mut interaction, mut state, t0) = setup();
        state.set_rotation(20.0, 0.0);
        interaction.pointer_down(Point::new(100.0, 100.0), t0);
        assert!(interaction.pointer_move(Point::new(120.0, 100.0), &mut state));
        assert!((state.rot_y() - 5.0).abs() < 1e-9, "rot_y={}", state.rot_y());
        assert!(interaction.pointer_move(Point::new(120.0, 140.0), &mut state));
        assert!((state.rot_y() - 5.0).abs() < 1e-9, "rot_y={}", state.rot_y());
        // Dragging down pitches backwards and wraps below zero
        assert!((state.rot_x() - 10.0).abs() < 1e-9, "rot_x={}", state.rot_x());
        interaction.pointer_move(Point::new(120.0, 200.0), &mut state);
        assert!((state.rot_x() - 355.0).abs() < 1e-9, "rot_x={}", state.rot_x());
    }

    #[test]
    fn moves_outside_a_drag_are_ignored() {
        let (mut interaction, mut state, _) = setup();
        assert!(!interaction.pointer_move(Point::new(10.0, 10.0), &mut state));
        assert_eq!((state.rot_x(), state.rot_y()), (20.0, 0.0));
    }

    #[test]
    fn recovery_returns_to_auto_rotation_after_timer() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::ZERO, t0);
        interaction.pointer_up(Point::ZERO, t0 + ms(100));
        assert!(!interaction.poll(t0 + ms(400)));
        assert_eq!(interaction.phase(), InteractionPhase::Recovering);
        assert!(interaction.poll(t0 + ms(550)));
        assert_eq!(interaction.phase(), InteractionPhase::AutoRotating);
        assert!(!interaction.poll(t0 + ms(600)));
    }

    #[test]
    fn recovery_progress_decelerates() {
        let (mut interaction, _, t0) = setup();
        assert_eq!(interaction.recovery_progress(t0), None);
        interaction.pointer_down(Point::ZERO, t0);
        interaction.pointer_up(Point::ZERO, t0);
        let half = interaction.recovery_progress(t0 + Duration::from_micros(225_000)).unwrap();
        assert!((half - 0.75).abs() < 1e-9, "progress={half}");
        assert_eq!(interaction.recovery_progress(t0 + ms(900)), Some(1.0));
    }

    #[test]
    fn new_touch_cancels_recovery() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::ZERO, t0);
        interaction.pointer_up(Point::ZERO, t0 + ms(10));
        interaction.pointer_down(Point::ZERO, t0 + ms(100));
        assert_eq!(interaction.phase(), InteractionPhase::Dragging);
        assert!(!interaction.poll(t0 + ms(1000)), "cancelled timer must not fire");
        assert_eq!(interaction.phase(), InteractionPhase::Dragging);
    }

    #[test]
    fn reset_discards_everything() {
        let (mut interaction, _, t0) = setup();
        interaction.pointer_down(Point::ZERO, t0);
        interaction.reset();
        assert_eq!(interaction.phase(), InteractionPhase::AutoRotating);
        assert!(interaction.gesture().is_none());
        assert_eq!(interaction.pointer_up(Point::ZERO, t0 + ms(10)), None);
    }
}
