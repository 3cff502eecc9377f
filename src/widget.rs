use crate::compositor::{compose, hit_test, Surface};
use crate::config::CubeConfig;
use crate::driver::RotationDriver;
use crate::error::CubeError;
use crate::geometry::{CubeGeometry, CubeProjection, FaceId, FaceTextures};
use crate::gesture::{Interaction, InteractionPhase, PointerEvent, PointerKind};
use crate::state::{CubeState, Viewport};
use kurbo::Size;
use std::time::Instant;
use tracing::{debug, trace};

/// Effects a pointer event can request from the hosting container
pub trait PointerHost {
    /// Captures (or releases) the pointer so ancestors do not steal moves
    fn set_active(&mut self, active: bool);
    /// Asks for a repaint outside the regular frame cadence
    fn request_paint(&mut self);
}

/// A host that ignores every request
impl PointerHost for () {
    fn set_active(&mut self, _active: bool) {}
    fn request_paint(&mut self) {}
}

/// Six-faced photo cube widget
///
/// The host drives it: [`resize`](Self::resize) on layout,
/// [`frame`](Self::frame) on every display refresh while
/// [`has_pending_work`](Self::has_pending_work) holds, and
/// [`pointer_event`](Self::pointer_event) for raw input.
#[derive(Debug)]
pub struct CubeAlbum<T> {
    config: CubeConfig,
    textures: FaceTextures<T>,
    state: CubeState,
    /// Built on the first non-degenerate resize
    geometry: Option<CubeGeometry>,
    driver: RotationDriver,
    interaction: Interaction,
    attached: bool,
    /// Widget size
    size: Size,
}

impl<T> CubeAlbum<T> {
    /// Creates a cube with no face textures yet
    pub fn new(config: CubeConfig) -> Result<Self, CubeError> {
        config.validate()?;
        Ok(CubeAlbum {
            state: CubeState::new(&config),
            interaction: Interaction::new(&config),
            config,
            textures: FaceTextures::default(),
            geometry: None,
            driver: RotationDriver::new(),
            attached: false,
            size: Size::ZERO,
        })
    }

    /// Creates a cube and assigns its six face textures
    pub fn with_faces(config: CubeConfig, textures: Vec<T>) -> Result<Self, CubeError> {
        let mut album = Self::new(config)?;
        album.set_faces(textures)?;
        Ok(album)
    }

    /// Assigns textures to faces 0..5; textures past the sixth are ignored.
    ///
    /// Fewer than six textures is rejected and leaves the current faces
    /// untouched.
    pub fn set_faces(&mut self, textures: Vec<T>) -> Result<(), CubeError> {
        let supplied = textures.len();
        self.textures = FaceTextures::from_vec(textures)?;
        debug!(supplied, "face textures assigned");
        Ok(())
    }

    /// Replaces or clears a single face's texture, returning the old one
    pub fn set_face(&mut self, face: FaceId, texture: Option<T>) -> Option<T> {
        self.textures.set(face, texture)
    }

    pub fn faces(&self) -> &FaceTextures<T> {
        &self.textures
    }

    pub fn config(&self) -> &CubeConfig {
        &self.config
    }

    pub fn state(&self) -> &CubeState {
        &self.state
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.state.viewport.as_ref()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.interaction.phase()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Sets the rotation angles directly, in degrees
    pub fn set_rotation(&mut self, rot_x: f64, rot_y: f64) {
        self.state.set_rotation(rot_x, rot_y);
    }

    /// Changes the auto-rotation speeds, in degrees per second
    pub fn set_auto_speed(&mut self, speed_x: f64, speed_y: f64) {
        if speed_x.is_finite() && speed_y.is_finite() {
            self.state.auto_speed_x = speed_x;
            self.state.auto_speed_y = speed_y;
        }
    }

    /// Re-derives the cube size, perspective and center for a new viewport.
    ///
    /// A zero or non-finite size is ignored; the previous geometry (if any)
    /// stays in place until a usable size arrives.
    pub fn resize(&mut self, width: f64, height: f64) {
        let Some(viewport) =
            Viewport::from_size(width, height, self.config.half_ratio, self.config.persp_ratio)
        else {
            debug!(width, height, "ignoring degenerate viewport");
            return;
        };
        self.size = Size::new(width, height);
        self.geometry = Some(CubeGeometry::new(viewport.half));
        self.state.viewport = Some(viewport);
        debug!(width, height, half = viewport.half, persp = viewport.persp, "viewport resized");
    }

    /// Starts the frame loop; the next frame only records a time baseline
    pub fn attach(&mut self) {
        self.attached = true;
        self.driver
            .set_active(self.interaction.phase() == InteractionPhase::AutoRotating);
        debug!("cube attached");
    }

    /// Stops the frame loop and abandons any gesture or pending recovery
    /// without reporting it
    pub fn detach(&mut self) {
        self.attached = false;
        self.interaction.reset();
        self.driver.set_active(false);
        debug!("cube detached");
    }

    /// Whether the host should keep scheduling frames.
    ///
    /// The cube animates for as long as it is attached.
    pub fn has_pending_work(&self) -> bool {
        self.attached
    }

    /// Projects all faces with the current rotation, if the viewport is known
    pub fn projection(&self) -> Option<CubeProjection> {
        let viewport = self.state.viewport.as_ref()?;
        let geometry = self.geometry.as_ref()?;
        Some(geometry.project(self.state.rot_x(), self.state.rot_y(), viewport))
    }

    /// Face under `point`, nearest to the viewer
    pub fn face_at(&self, point: kurbo::Point) -> Option<FaceId> {
        hit_test(&self.projection()?, point)
    }

    /// Advances time to `now` and paints the cube back to front.
    ///
    /// Returns the number of faces drawn.
    pub fn frame<S: Surface<T>>(&mut self, now: Instant, surface: &mut S) -> usize {
        if !self.attached {
            return 0;
        }
        if self.interaction.poll(now) {
            self.driver.set_active(true);
        }
        self.driver.advance(now, &mut self.state);

        let Some(projection) = self.projection() else {
            return 0;
        };
        let drawn = compose(surface, &self.textures, &projection);
        trace!(
            rot_x = self.state.rot_x(),
            rot_y = self.state.rot_y(),
            drawn,
            "frame"
        );
        drawn
    }

    /// Decelerating progress of the pause after a gesture, if one is running
    pub fn recovery_progress(&self, now: Instant) -> Option<f64> {
        self.interaction.recovery_progress(now)
    }

    /// Feeds a raw pointer event through the interaction state machine.
    ///
    /// Returns the face that was tapped, at most once per completed gesture.
    pub fn pointer_event(
        &mut self,
        host: &mut impl PointerHost,
        event: PointerEvent,
    ) -> Option<FaceId> {
        if !self.attached {
            return None;
        }
        match event.kind {
            PointerKind::Down => {
                self.interaction.pointer_down(event.position, event.time);
                self.driver.set_active(false);
                host.set_active(true);
                None
            }
            PointerKind::Move => {
                if self.interaction.pointer_move(event.position, &mut self.state) {
                    host.request_paint();
                }
                None
            }
            PointerKind::Up | PointerKind::Cancel => {
                if self.interaction.phase() != InteractionPhase::Dragging {
                    return None;
                }
                let tap = self.interaction.pointer_up(event.position, event.time);
                host.set_active(false);
                host.request_paint();
                let face = self.face_at(tap?);
                if let Some(face) = face {
                    debug!(%face, index = face.index(), "face tapped");
                }
                face
            }
        }
    }
}
