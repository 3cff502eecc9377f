//! Software rasterizer that paints textures onto projected quads.

use crate::compositor::Surface;
use crate::math::point_in_convex_quad;
use kurbo::Point;

/// 24-bit color
pub type Rgb = [u8; 3];

/// An owned RGB image used as a face texture
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Image {
    /// Builds an image by evaluating `f(x, y)` for every pixel.
    ///
    /// Zero dimensions are bumped to one pixel so sampling always succeeds.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Image {
            width,
            height,
            pixels,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y.min(self.height - 1) * self.width + x.min(self.width - 1)]
    }

    /// Nearest-neighbour sample at normalized coordinates in `[0, 1]`
    pub fn sample(&self, u: f64, v: f64) -> Rgb {
        let x = (u.clamp(0.0, 1.0) * self.width as f64) as usize;
        let y = (v.clamp(0.0, 1.0) * self.height as f64) as usize;
        self.get(x, y)
    }
}

/// Projective mapping between the unit square and a quadrilateral.
///
/// Row-major 3x3 matrix with the bottom-right element fixed at one before
/// inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    m: [[f64; 3]; 3],
}

impl Homography {
    /// Maps the unit square's corners (0,0), (1,0), (1,1), (0,1) onto the
    /// quad's corners in order.
    ///
    /// Returns `None` when the quad is degenerate (e.g. a face seen edge-on).
    pub fn square_to_quad(quad: &[Point; 4]) -> Option<Self> {
        let [p0, p1, p2, p3] = *quad;
        let sx = p0.x - p1.x + p2.x - p3.x;
        let sy = p0.y - p1.y + p2.y - p3.y;
        let (g, h) = if sx == 0.0 && sy == 0.0 {
            (0.0, 0.0)
        } else {
            let (dx1, dx2) = (p1.x - p2.x, p3.x - p2.x);
            let (dy1, dy2) = (p1.y - p2.y, p3.y - p2.y);
            let det = dx1 * dy2 - dx2 * dy1;
            if det.abs() < f64::EPSILON {
                return None;
            }
            ((sx * dy2 - dx2 * sy) / det, (dx1 * sy - sx * dy1) / det)
        };
        let homography = Homography {
            m: [
                [p1.x - p0.x + g * p1.x, p3.x - p0.x + h * p3.x, p0.x],
                [p1.y - p0.y + g * p1.y, p3.y - p0.y + h * p3.y, p0.y],
                [g, h, 1.0],
            ],
        };
        (homography.determinant().abs() > f64::EPSILON).then_some(homography)
    }

    fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// The inverse mapping, via the adjugate (scale does not matter for a
    /// homography)
    pub fn inverse(&self) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.m;
        Homography {
            m: [
                [e * i - f * h, c * h - b * i, b * f - c * e],
                [f * g - d * i, a * i - c * g, c * d - a * f],
                [d * h - e * g, b * g - a * h, a * e - b * d],
            ],
        }
    }

    /// Applies the mapping; `None` for points on the line at infinity
    pub fn map(&self, point: Point) -> Option<Point> {
        let m = &self.m;
        let w = m[2][0] * point.x + m[2][1] * point.y + m[2][2];
        if w.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(
            (m[0][0] * point.x + m[0][1] * point.y + m[0][2]) / w,
            (m[1][0] * point.x + m[1][1] * point.y + m[1][2]) / w,
        ))
    }
}

/// An RGB frame buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    background: Rgb,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![background; width * height],
            background,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fills the whole buffer with the background color
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Resizes the buffer, discarding its contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![self.background; width * height];
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }
}

impl Surface<Image> for PixelBuffer {
    /// Draws a texture warped onto a convex quad
    fn draw_textured_quad(&mut self, texture: &Image, quad: &[Point; 4]) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let Some(to_texture) = Homography::square_to_quad(quad).map(|h| h.inverse()) else {
            return;
        };

        // Compute bounding box of the quad
        let min_x = quad.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = quad.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = quad.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = quad.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        if max_x < 0.0 || max_y < 0.0 || !(min_x.is_finite() && min_y.is_finite()) {
            return;
        }
        let min_x = min_x.floor().max(0.0) as usize;
        let max_x = max_x.ceil().min(self.width as f64 - 1.0) as usize;
        let min_y = min_y.floor().max(0.0) as usize;
        let max_y = max_y.ceil().min(self.height as f64 - 1.0) as usize;

        // For each pixel in the bounding box
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if !point_in_convex_quad(p, quad) {
                    continue;
                }
                if let Some(uv) = to_texture.map(p) {
                    self.pixels[y * self.width + x] = texture.sample(uv.x, uv.y);
                }
            }
        }
    }
}
