use crate::state::Viewport;
use crate::vertex::ProjectedVertex;
use kurbo::Point;

/// Edge function used in rasterization and hit-testing.
///
/// Signed doubled area of the triangle `a`, `b`, `c`; the sign tells which
/// side of the edge `a -> b` the point `c` lies on.
pub fn edge_function(a: Point, b: Point, c: Point) -> f64 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Non-finite input collapses to `0.0` so rotation state can never turn NaN.
pub fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Builds the rotation that turns about X by `rot_x` and then about the
/// resulting frame's Y-axis by `rot_y` (both in degrees).
pub fn rotation_matrix(rot_x: f64, rot_y: f64) -> [[f64; 3]; 3] {
    let (sin_x, cos_x) = rot_x.to_radians().sin_cos();
    let (sin_y, cos_y) = rot_y.to_radians().sin_cos();

    let rotation_x = [[1.0, 0.0, 0.0], [0.0, cos_x, -sin_x], [0.0, sin_x, cos_x]];
    let rotation_y = [[cos_y, 0.0, sin_y], [0.0, 1.0, 0.0], [-sin_y, 0.0, cos_y]];

    // Column vectors: the X rotation is applied first
    multiply_matrices(&rotation_y, &rotation_x)
}

/// Rotates a cube-local vertex and projects it with a perspective divide.
///
/// The rotated z is returned alongside the screen position so callers can
/// average it into a face depth.
pub fn rotate_and_project(
    rotation: &[[f64; 3]; 3],
    position: &[f64; 3],
    viewport: &Viewport,
) -> ProjectedVertex {
    let [x, y, z] = multiply_matrix_vector(rotation, position);
    let scale = viewport.persp / (viewport.persp - z);
    ProjectedVertex {
        screen_position: Point::new(viewport.cx + x * scale, viewport.cy + y * scale),
        depth: z,
    }
}

/// Tests whether `point` lies inside (or on the edge of) a convex quad.
///
/// Works for either winding: the point is outside only when the four edge
/// functions disagree in strict sign.
pub fn point_in_convex_quad(point: Point, quad: &[Point; 4]) -> bool {
    let mut has_negative = false;
    let mut has_positive = false;
    for i in 0..4 {
        let side = edge_function(quad[i], quad[(i + 1) % 4], point);
        has_negative |= side < 0.0;
        has_positive |= side > 0.0;
    }
    !(has_negative && has_positive)
}

/// Average of the four corners of a quad
pub fn quad_centroid(quad: &[Point; 4]) -> Point {
    let (sx, sy) = quad
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / 4.0, sy / 4.0)
}
