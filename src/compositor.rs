//! Painter's-algorithm compositing and hit-testing of projected faces.

use crate::geometry::{CubeProjection, FaceId, FaceTextures, FACE_COUNT};
use crate::math::point_in_convex_quad;
use kurbo::Point;

/// A drawing surface that can paint one texture onto one quadrilateral.
///
/// The quad's corners correspond, in order, to the texture's top-left,
/// top-right, bottom-right and bottom-left corners.
pub trait Surface<T> {
    fn draw_textured_quad(&mut self, texture: &T, quad: &[Point; 4]);
}

/// Orders faces from farthest to nearest.
///
/// The sort is stable but callers should not depend on the order of faces
/// with equal depth.
pub fn draw_order(depths: &[f64; FACE_COUNT]) -> [FaceId; FACE_COUNT] {
    let mut order = FaceId::ALL;
    order.sort_by(|a, b| depths[a.index()].total_cmp(&depths[b.index()]));
    order
}

/// Draws every textured face back to front and returns how many draw calls
/// were issued
pub fn compose<T, S: Surface<T>>(
    surface: &mut S,
    textures: &FaceTextures<T>,
    projection: &CubeProjection,
) -> usize {
    let mut drawn = 0;
    for face in draw_order(&projection.depths()) {
        let Some(texture) = textures.get(face) else {
            continue;
        };
        surface.draw_textured_quad(texture, &projection.face(face).quad);
        drawn += 1;
    }
    drawn
}

/// Finds the nearest face whose projected quad contains `point`
pub fn hit_test(projection: &CubeProjection, point: Point) -> Option<FaceId> {
    projection
        .iter()
        .filter(|(_, face)| point_in_convex_quad(point, &face.quad))
        .max_by(|(_, a), (_, b)| a.depth.total_cmp(&b.depth))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CubeGeometry;
    use crate::math::quad_centroid;
    use crate::state::Viewport;

    /// Records draw calls instead of painting
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<(u32, [Point; 4])>,
    }

    impl Surface<u32> for RecordingSurface {
        fn draw_textured_quad(&mut self, texture: &u32, quad: &[Point; 4]) {
            self.calls.push((*texture, *quad));
        }
    }

    fn project(rot_x: f64, rot_y: f64) -> CubeProjection {
        let vp = Viewport::from_size(300.0, 300.0, 0.28, 8.0).unwrap();
        CubeGeometry::new(vp.half).project(rot_x, rot_y, &vp)
    }

    #[test]
    fn order_is_back_to_front() {
        let depths = [3.0, -1.0, -3.0, 1.0, 0.5, -0.5];
        assert_eq!(
            draw_order(&depths),
            [
                FaceId::Back,
                FaceId::Right,
                FaceId::Bottom,
                FaceId::Top,
                FaceId::Left,
                FaceId::Front
            ]
        );
    }

    #[test]
    fn compose_draws_nearest_face_last() {
        let projection = project(20.0, 30.0);
        let textures = FaceTextures::from_vec((0..6).collect()).unwrap();
        let mut surface = RecordingSurface::default();
        assert_eq!(compose(&mut surface, &textures, &projection), 6);

        let depths: Vec<f64> = surface
            .calls
            .iter()
            .map(|(texture, _)| projection.depths()[*texture as usize])
            .collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
        assert_eq!(surface.calls.last().unwrap().0, FaceId::Front.index() as u32);
    }

    #[test]
    fn compose_skips_faces_without_texture() {
        let projection = project(20.0, 0.0);
        let mut textures = FaceTextures::from_vec((0..6).collect()).unwrap();
        textures.set(FaceId::Front, None);
        let mut surface = RecordingSurface::default();
        assert_eq!(compose(&mut surface, &textures, &projection), 5);
        assert!(surface.calls.iter().all(|(texture, _)| *texture != 0));
        // An untextured face still hit-tests
        let center = quad_centroid(&projection.face(FaceId::Front).quad);
        assert_eq!(hit_test(&projection, center), Some(FaceId::Front));
    }

    #[test]
    fn centroid_hits_visible_face() {
        let projection = project(20.0, 30.0);
        // Yawing right brings the left face into view; pitching shows the bottom
        for face in [FaceId::Front, FaceId::Left, FaceId::Bottom] {
            let center = quad_centroid(&projection.face(face).quad);
            assert_eq!(hit_test(&projection, center), Some(face), "{face}");
        }
    }

    #[test]
    fn overlap_resolves_to_nearest() {
        // Back face is directly behind the front one: its centroid hits front
        let projection = project(0.0, 0.0);
        let center = quad_centroid(&projection.face(FaceId::Back).quad);
        assert_eq!(hit_test(&projection, center), Some(FaceId::Front));
    }

    #[test]
    fn miss_outside_cube() {
        let projection = project(20.0, 30.0);
        assert_eq!(hit_test(&projection, Point::new(1.0, 1.0)), None);
    }
}
