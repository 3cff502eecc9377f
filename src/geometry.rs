//! Static cube geometry and its per-frame projection.
//!
//! Cube-local space has x pointing right, y pointing down and z pointing out
//! of the screen towards the viewer, matching screen coordinates. Every face
//! lists its corners as top-left, top-right, bottom-right, bottom-left when
//! seen from outside the cube, so a texture's corners map onto them in order.

use crate::error::CubeError;
use crate::math::{rotate_and_project, rotation_matrix};
use crate::state::Viewport;
use kurbo::Point;
use std::fmt;

/// Number of faces on the cube
pub const FACE_COUNT: usize = 6;

/// Identity of one cube face; the discriminant is its fixed index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceId {
    Front = 0,
    Right = 1,
    Back = 2,
    Left = 3,
    Top = 4,
    Bottom = 5,
}

impl FaceId {
    /// All faces in index order
    pub const ALL: [FaceId; FACE_COUNT] = [
        FaceId::Front,
        FaceId::Right,
        FaceId::Back,
        FaceId::Left,
        FaceId::Top,
        FaceId::Bottom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The face on the other side of the cube
    pub fn opposite(self) -> FaceId {
        match self {
            FaceId::Front => FaceId::Back,
            FaceId::Back => FaceId::Front,
            FaceId::Right => FaceId::Left,
            FaceId::Left => FaceId::Right,
            FaceId::Top => FaceId::Bottom,
            FaceId::Bottom => FaceId::Top,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceId::Front => "front",
            FaceId::Right => "right",
            FaceId::Back => "back",
            FaceId::Left => "left",
            FaceId::Top => "top",
            FaceId::Bottom => "bottom",
        }
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<usize> for FaceId {
    type Error = usize;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        FaceId::ALL.get(index).copied().ok_or(index)
    }
}

/// Textures for the six faces, indexed by [`FaceId`]
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTextures<T> {
    slots: [Option<T>; FACE_COUNT],
}

impl<T> Default for FaceTextures<T> {
    fn default() -> Self {
        FaceTextures {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> FaceTextures<T> {
    /// Assigns the first six textures to faces 0..5 in order.
    ///
    /// Extra textures are dropped; fewer than six is an error and leaves
    /// nothing assigned.
    pub fn from_vec(textures: Vec<T>) -> Result<Self, CubeError> {
        let supplied = textures.len();
        if supplied < FACE_COUNT {
            return Err(CubeError::NotEnoughFaces { supplied });
        }
        let mut textures = textures.into_iter();
        Ok(FaceTextures {
            slots: std::array::from_fn(|_| textures.next()),
        })
    }

    pub fn get(&self, face: FaceId) -> Option<&T> {
        self.slots[face.index()].as_ref()
    }

    /// Replaces one face's texture, returning the previous one
    pub fn set(&mut self, face: FaceId, texture: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.slots[face.index()], texture)
    }
}

/// The six faces' corners in cube-local space
#[derive(Debug, Clone, PartialEq)]
pub struct CubeGeometry {
    faces: [[[f64; 3]; 4]; FACE_COUNT],
}

impl CubeGeometry {
    /// Builds an axis-aligned cube centered on the origin with the given half
    /// edge length
    pub fn new(half: f64) -> Self {
        let h = half;
        let faces = [
            // front, z = +h
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            // right, x = +h
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            // back, z = -h
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            // left, x = -h
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
            // top, y = -h
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            // bottom, y = +h
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        ];
        CubeGeometry { faces }
    }

    pub fn face(&self, face: FaceId) -> &[[f64; 3]; 4] {
        &self.faces[face.index()]
    }

    /// Rotates every face by the given angles (degrees) and projects it onto
    /// the viewport
    pub fn project(&self, rot_x: f64, rot_y: f64, viewport: &Viewport) -> CubeProjection {
        let rotation = rotation_matrix(rot_x, rot_y);
        let faces = std::array::from_fn(|i| {
            let mut quad = [Point::ZERO; 4];
            let mut depth_sum = 0.0;
            for (corner, position) in quad.iter_mut().zip(self.faces[i].iter()) {
                let vertex = rotate_and_project(&rotation, position, viewport);
                *corner = vertex.screen_position;
                depth_sum += vertex.depth;
            }
            FaceProjection {
                quad,
                depth: depth_sum / 4.0,
            }
        });
        CubeProjection { faces }
    }
}

/// One face after rotation and projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceProjection {
    /// Screen-space corners, in the same order as the face's 3D corners
    pub quad: [Point; 4],
    /// Mean rotated z of the corners; larger is nearer the viewer
    pub depth: f64,
}

/// All six faces after rotation and projection, indexed by [`FaceId`]
#[derive(Debug, Clone, PartialEq)]
pub struct CubeProjection {
    faces: [FaceProjection; FACE_COUNT],
}

impl CubeProjection {
    pub fn face(&self, face: FaceId) -> &FaceProjection {
        &self.faces[face.index()]
    }

    pub fn depths(&self) -> [f64; FACE_COUNT] {
        self.faces.map(|face| face.depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FaceId, &FaceProjection)> {
        FaceId::ALL.into_iter().zip(self.faces.iter())
    }
}
