use crate::effect::Lighting;
use crate::math::{apply_lighting, calculate_light_intensity, edge_function};
use crate::model::MeshPart;
use crate::vertex::Vertex;
use glam::{Vec2, Vec4};

/// An opaque RGB colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const WHITE: Color = Color::rgb8(255, 255, 255);
    pub const CORNFLOWER_BLUE: Color = Color::rgb8(100, 149, 237);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn as_rgb8(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Colour and depth buffers
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixel_data: Vec<Color>,
    z_buffer: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixel_data: vec![Color::BLACK; width * height],
            z_buffer: vec![f32::INFINITY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Framebuffer::new(width, height);
    }

    /// Fills the colour buffer and resets depth
    pub fn clear(&mut self, color: Color) {
        self.pixel_data.fill(color);
        self.z_buffer.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixel_data[y * self.width + x])
        } else {
            None
        }
    }

    /// Maps a clip space position to pixel coordinates and depth.
    ///
    /// Returns `None` at or behind the eye plane.
    pub fn project(&self, clip: Vec4) -> Option<(Vec2, f32)> {
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        );
        Some((screen, ndc.z))
    }
}

/// Transforms and rasterizes every triangle of a mesh part with its effect
pub fn draw_mesh_part(part: &MeshPart, framebuffer: &mut Framebuffer) {
    let effect = &part.effect;
    let transform = effect.world_view_projection();

    let projected: Vec<Option<Vertex>> = part
        .vertices
        .iter()
        .zip(&part.normals)
        .map(|(position, normal)| {
            let (screen_position, depth) = framebuffer.project(transform * position.extend(1.0))?;
            Some(Vertex {
                screen_position,
                depth,
                normal: effect.world.transform_vector3(*normal).normalize_or_zero(),
            })
        })
        .collect();
    let corner = |index: usize| projected.get(index).copied().flatten();

    for &[a, b, c] in &part.triangles {
        // Triangles reaching behind the camera are dropped whole
        if let (Some(v0), Some(v1), Some(v2)) = (corner(a), corner(b), corner(c)) {
            draw_triangle(
                &v0,
                &v1,
                &v2,
                framebuffer,
                effect.lighting.as_ref(),
                effect.diffuse_color,
            );
        }
    }
}

/// Draws a triangle with per-pixel lighting.
///
/// Pixels whose depth falls outside `0.0..=1.0` lie beyond the near or far
/// plane and are discarded.
pub fn draw_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    framebuffer: &mut Framebuffer,
    lighting: Option<&Lighting>,
    base_color: Color,
) {
    let width = framebuffer.width;
    let height = framebuffer.height;
    if width == 0 || height == 0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0
        .screen_position
        .x
        .min(v1.screen_position.x)
        .min(v2.screen_position.x)
        .floor()
        .max(0.0) as usize;
    let max_x = v0
        .screen_position
        .x
        .max(v1.screen_position.x)
        .max(v2.screen_position.x)
        .ceil()
        .min(width as f32 - 1.0) as usize;
    let min_y = v0
        .screen_position
        .y
        .min(v1.screen_position.y)
        .min(v2.screen_position.y)
        .floor()
        .max(0.0) as usize;
    let max_y = v0
        .screen_position
        .y
        .max(v1.screen_position.y)
        .max(v2.screen_position.y)
        .ceil()
        .min(height as f32 - 1.0) as usize;

    // Signed area; either winding is accepted
    let area = edge_function(v0.screen_position, v1.screen_position, v2.screen_position);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            // Barycentric weights, all non-negative inside the triangle
            let w0 = edge_function(v1.screen_position, v2.screen_position, p) / area;
            let w1 = edge_function(v2.screen_position, v0.screen_position, p) / area;
            let w2 = edge_function(v0.screen_position, v1.screen_position, p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // Depth is affine in screen space after the perspective divide
            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            // Depth test
            let offset = y * width + x;
            if depth >= framebuffer.z_buffer[offset] {
                continue;
            }
            framebuffer.z_buffer[offset] = depth;

            framebuffer.pixel_data[offset] = match lighting {
                Some(lighting) => {
                    let normal =
                        (v0.normal * w0 + v1.normal * w1 + v2.normal * w2).normalize_or_zero();
                    apply_lighting(base_color, calculate_light_intensity(normal, lighting))
                }
                None => base_color,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn vertex(x: f32, y: f32, depth: f32) -> Vertex {
        Vertex {
            screen_position: Vec2::new(x, y),
            depth,
            normal: Vec3::Z,
        }
    }

    fn covered(framebuffer: &Framebuffer, color: Color) -> usize {
        framebuffer
            .pixel_data
            .iter()
            .filter(|&&pixel| pixel == color)
            .count()
    }

    #[test]
    fn triangle_fills_regardless_of_winding() {
        let red = Color::rgb8(255, 0, 0);
        let mut clockwise = Framebuffer::new(8, 8);
        draw_triangle(
            &vertex(0.0, 0.0, 0.5),
            &vertex(8.0, 0.0, 0.5),
            &vertex(0.0, 8.0, 0.5),
            &mut clockwise,
            None,
            red,
        );
        let mut counter = Framebuffer::new(8, 8);
        draw_triangle(
            &vertex(0.0, 0.0, 0.5),
            &vertex(0.0, 8.0, 0.5),
            &vertex(8.0, 0.0, 0.5),
            &mut counter,
            None,
            red,
        );
        assert!(covered(&clockwise, red) > 20);
        assert_eq!(covered(&clockwise, red), covered(&counter, red));
    }

    #[test]
    fn nearer_triangle_wins_depth_test() {
        let near = Color::rgb8(0, 255, 0);
        let far = Color::rgb8(0, 0, 255);
        let mut framebuffer = Framebuffer::new(4, 4);
        let quad = |depth| {
            [
                vertex(-1.0, -1.0, depth),
                vertex(9.0, -1.0, depth),
                vertex(-1.0, 9.0, depth),
            ]
        };
        let [a, b, c] = quad(0.2);
        draw_triangle(&a, &b, &c, &mut framebuffer, None, near);
        let [a, b, c] = quad(0.6);
        draw_triangle(&a, &b, &c, &mut framebuffer, None, far);
        assert_eq!(covered(&framebuffer, far), 0);
        assert_eq!(framebuffer.pixel(0, 0), Some(near));
    }

    #[test]
    fn pixels_beyond_far_plane_are_clipped() {
        let color = Color::rgb8(9, 9, 9);
        let mut framebuffer = Framebuffer::new(4, 4);
        draw_triangle(
            &vertex(-1.0, -1.0, 1.2),
            &vertex(9.0, -1.0, 1.2),
            &vertex(-1.0, 9.0, 1.2),
            &mut framebuffer,
            None,
            color,
        );
        assert_eq!(covered(&framebuffer, color), 0);
    }

    #[test]
    fn offscreen_and_degenerate_triangles_are_ignored() {
        let color = Color::WHITE;
        let mut framebuffer = Framebuffer::new(4, 4);
        draw_triangle(
            &vertex(10.0, 10.0, 0.5),
            &vertex(20.0, 10.0, 0.5),
            &vertex(10.0, 20.0, 0.5),
            &mut framebuffer,
            None,
            color,
        );
        draw_triangle(
            &vertex(0.0, 0.0, 0.5),
            &vertex(2.0, 2.0, 0.5),
            &vertex(4.0, 4.0, 0.5),
            &mut framebuffer,
            None,
            color,
        );
        assert_eq!(covered(&framebuffer, color), 0);

        let mut empty = Framebuffer::new(0, 0);
        draw_triangle(
            &vertex(0.0, 0.0, 0.5),
            &vertex(8.0, 0.0, 0.5),
            &vertex(0.0, 8.0, 0.5),
            &mut empty,
            None,
            color,
        );
    }

    #[test]
    fn project_rejects_points_behind_eye() {
        let framebuffer = Framebuffer::new(10, 20);
        assert!(framebuffer.project(Vec4::new(0.0, 0.0, 0.5, 0.0)).is_none());
        assert!(framebuffer.project(Vec4::new(0.0, 0.0, 0.5, -1.0)).is_none());

        let (center, depth) = framebuffer
            .project(Vec4::new(0.0, 0.0, 1.0, 2.0))
            .unwrap();
        assert_eq!(center, Vec2::new(5.0, 10.0));
        assert_eq!(depth, 0.5);

        let (corner, _) = framebuffer
            .project(Vec4::new(-1.0, 1.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(corner, Vec2::ZERO);
    }

    #[test]
    fn clear_resets_colour_and_depth() {
        let mut framebuffer = Framebuffer::new(3, 2);
        draw_triangle(
            &vertex(-1.0, -1.0, 0.1),
            &vertex(9.0, -1.0, 0.1),
            &vertex(-1.0, 9.0, 0.1),
            &mut framebuffer,
            None,
            Color::WHITE,
        );
        framebuffer.clear(Color::CORNFLOWER_BLUE);
        assert_eq!(covered(&framebuffer, Color::CORNFLOWER_BLUE), 6);
        assert!(framebuffer.z_buffer.iter().all(|depth| depth.is_infinite()));
    }
}
