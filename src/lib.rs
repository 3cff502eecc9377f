//! An interactive photo cube: six textured faces, auto-rotation, perspective
//! projection, painter's-algorithm compositing and drag/tap input.
//!
//! The crate does not own a window or a frame loop. A host feeds it
//! viewport sizes, frame timestamps and pointer events, and supplies a
//! [`Surface`] that can paint one texture onto one quadrilateral.

pub mod compositor;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod graphics;
pub mod math;
pub mod state;
pub mod vertex;
pub mod widget;

pub use compositor::Surface;
pub use config::CubeConfig;
pub use error::CubeError;
pub use geometry::FaceId;
pub use gesture::{InteractionPhase, PointerEvent, PointerKind};
pub use widget::{CubeAlbum, PointerHost};
