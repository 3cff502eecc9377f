use kurbo::Point;

/// Vertex structure with screen position and rotated depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    pub screen_position: Point,
    /// Rotated z before the perspective divide; larger is nearer the viewer
    pub depth: f64,
}
